//! Collision and teleport rules
//!
//! Two pure geometry tests: the normalized-ellipse check deciding whether
//! the player is inside a portal, and the shrunk-hitbox rectangle overlap
//! deciding whether an enemy ended the run.

use glam::Vec2;

use super::state::{Enemy, Player};
use crate::consts::*;

/// Normalized-ellipse containment test against a portal footprint.
///
/// The semi-axes are the portal's flattened radius (0.5R wide, 1.5R tall)
/// and the threshold sits below the visual boundary, so the teleport fires
/// slightly before the sprite fills the portal.
pub fn inside_portal(point: Vec2, portal_center: Vec2, portal_radius: f32) -> bool {
    let pw = portal_radius * PORTAL_WIDTH_RATIO;
    let ph = portal_radius * PORTAL_HEIGHT_RATIO;
    let d = point - portal_center;
    (d.x * d.x) / (pw * pw) + (d.y * d.y) / (ph * ph) <= PORTAL_TRIGGER
}

/// Collidable rectangle: the bounding box inset by `HITBOX_INSET` on each
/// side, so collisions read as visually forgiving.
#[derive(Debug, Clone, Copy)]
struct Hitbox {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Hitbox {
    fn shrunk(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: pos.x + width * HITBOX_INSET,
            y: pos.y + height * HITBOX_INSET,
            w: width * (1.0 - 2.0 * HITBOX_INSET),
            h: height * (1.0 - 2.0 * HITBOX_INSET),
        }
    }

    fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Axis-aligned overlap test on the shrunk hitboxes
pub fn player_hits_enemy(player: &Player, enemy: &Enemy) -> bool {
    let a = Hitbox::shrunk(player.pos, player.width, player.height);
    let b = Hitbox::shrunk(enemy.pos, enemy.width, enemy.height);
    a.overlaps(&b)
}
