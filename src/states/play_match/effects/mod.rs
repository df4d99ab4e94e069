//! Effect Processing
//!
//! Effects that live outside a single strike:
//!
//! - [`status`]: lingering status effects and the start-of-clash upkeep
//! - [`area`]: active abilities that hit several heroes (Fireball, Overload)
//!
//! ## Pattern
//!
//! Each module adds methods to [`Battle`](super::Battle) and routes every
//! damage instance through `Battle::apply_damage`, so on-damage-received
//! hooks behave the same no matter where the damage came from.

pub mod area;
pub mod status;

pub use area::AbilityResult;
pub use status::apply_status;
