//! Status Effect Tracking
//!
//! Status effects are appended when applied and only pruned during clash
//! resolution: every living hero's effects tick once at the start of each
//! clash, and an effect lasts until its holder dies or is healed to full.

use tracing::debug;

use crate::combat::log::{LogColor, LogEntry, LogEventType};
use crate::states::play_match::components::*;
use crate::states::play_match::Battle;

/// Append `effect` to a living hero. Returns false for dead heroes.
pub fn apply_status(hero: &mut Hero, effect: StatusEffect) -> bool {
    if !hero.is_alive() || effect.magnitude == 0 {
        return false;
    }
    hero.status_effects.push(effect);
    true
}

impl Battle {
    /// Start-of-clash upkeep.
    ///
    /// Every living hero takes the sum of its effects' magnitudes. Ticks
    /// bypass on-damage-received hooks. Dead heroes lose any leftover
    /// effects. Returns HP lost by `(player1, player2)`.
    pub fn tick_status_effects(&mut self) -> (u32, u32) {
        let mut ticks = Vec::new();
        for hero in self.player1.members.iter_mut().chain(self.player2.members.iter_mut()) {
            if !hero.is_alive() {
                hero.status_effects.clear();
                continue;
            }
            let pending = hero.pending_status_damage();
            if pending > 0 {
                let lost = hero.lose_hp(pending);
                ticks.push((hero.uuid, lost, !hero.is_alive()));
            }
        }

        let mut lost_by_side = (0, 0);
        for (uuid, lost, died) in ticks {
            debug!("{} bleeds for {}", uuid, lost);
            match self.side_of(uuid) {
                Some(Side::Player1) => lost_by_side.0 += lost,
                Some(Side::Player2) => lost_by_side.1 += lost,
                None => {}
            }
            let mut entry = LogEntry::new(LogEventType::StatusTick)
                .colored(self.name_of(uuid), self.name_color(uuid))
                .text(" bleeds for ")
                .colored(lost.to_string(), LogColor::Status)
                .text(".");
            entry.target = Some(uuid);
            entry.amount = Some(lost);
            self.log.push(entry);
            if died {
                self.log_death(uuid);
            }
        }
        lost_by_side
    }
}
