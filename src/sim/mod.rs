//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame callback
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod state;
pub mod tick;

pub use collision::{inside_portal, player_hits_enemy};
pub use state::{Enemy, GamePhase, GameState, Player, PortalParticle, Star};
pub use tick::{InputState, tick};
