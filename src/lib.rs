//! The Amazing Looperman - a portal-hopping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `renderer`: Canvas-2D render pass
//! - `settings`: Quality presets persisted to LocalStorage

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Portal footprint radius (before the width/height flattening)
    pub const PORTAL_RADIUS: f32 = 70.0;
    /// Horizontal semi-axis of the portal ellipse, as a fraction of the radius
    pub const PORTAL_WIDTH_RATIO: f32 = 0.5;
    /// Vertical semi-axis of the portal ellipse, as a fraction of the radius
    pub const PORTAL_HEIGHT_RATIO: f32 = 1.5;
    /// Normalized-ellipse threshold for the teleport trigger. Kept below 1.0
    /// so the warp fires slightly before the sprite visually fills the portal.
    pub const PORTAL_TRIGGER: f32 = 0.7;

    /// Portal placement as fractions of the surface size
    pub const ENTRY_PORTAL_X: f32 = 0.05;
    pub const EXIT_PORTAL_X: f32 = 0.95;
    pub const PORTAL_Y: f32 = 0.5;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Horizontal speed in pixels per tick
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;
    pub const ENEMY_COUNT: usize = 4;
    /// Patrol speed range at roster creation, pixels per tick
    pub const ENEMY_MIN_SPEED: f32 = 1.0;
    pub const ENEMY_MAX_SPEED: f32 = 3.0;
    /// Global enemy speed multiplier applied on every completed loop
    pub const ENEMY_SPEEDUP: f32 = 1.1;

    /// Collidable rectangles are inset by this fraction on each side
    pub const HITBOX_INSET: f32 = 0.2;

    /// Portal particle populations (per portal)
    pub const INNER_PARTICLES: usize = 100;
    pub const GLOW_PARTICLES: usize = 120;
    /// Inner particles are the ones at or below this size
    pub const INNER_SIZE_MAX: f32 = 4.0;
    /// Shared glow pulse phase advance per tick
    pub const PULSE_STEP: f32 = 0.05;
    /// The pulse phase wraps at 4PI (two full sine periods)
    pub const PULSE_WRAP: f32 = 4.0 * std::f32::consts::PI;
}

/// Entry (blue) portal center for the current surface size.
///
/// Portal centers are always derived from the live dimensions so a resize is
/// picked up on the very next tick.
#[inline]
pub fn entry_portal_center(surface_w: f32, surface_h: f32) -> Vec2 {
    Vec2::new(
        surface_w * consts::ENTRY_PORTAL_X,
        surface_h * consts::PORTAL_Y,
    )
}

/// Exit (orange) portal center for the current surface size.
#[inline]
pub fn exit_portal_center(surface_w: f32, surface_h: f32) -> Vec2 {
    Vec2::new(
        surface_w * consts::EXIT_PORTAL_X,
        surface_h * consts::PORTAL_Y,
    )
}
