//! Game state and core simulation types
//!
//! Entity records are plain data: constructed here and in `field`, mutated
//! only by the tick, read by the renderer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::field;
use crate::consts::*;
use crate::{entry_portal_center, exit_portal_center};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended by an enemy collision; waiting for reset
    GameOver,
}

/// A background star
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Base brightness in [0.3, 1.0]; the drawn value oscillates around it
    pub base_brightness: f32,
    pub pulse_speed: f32,
    pub pulse_phase: f32,
}

impl Star {
    /// Current brightness, modulated by the twinkle phase
    pub fn brightness(&self) -> f32 {
        self.base_brightness * (0.7 + 0.3 * self.pulse_phase.sin())
    }
}

/// A decorative particle orbiting one portal.
///
/// Two regimes share the type: inner particles (size <= 4) orbit tightly and
/// cycle their depth, glow particles (size > 4) pulse with the shared phase.
#[derive(Debug, Clone)]
pub struct PortalParticle {
    pub pos: Vec2,
    /// Simulated distance-from-viewer in [0, 1); drives alpha falloff
    pub z: f32,
    /// Fixed creation size; also the regime discriminator
    pub size: f32,
    /// Angular speed; inner particles advance depth with it too
    pub speed: f32,
    pub angle: f32,
    pub age: f32,
    /// Last sampled value of the shared pulse sine (glow particles only)
    pub pulse: f32,
}

impl PortalParticle {
    pub fn is_glow(&self) -> bool {
        self.size > INNER_SIZE_MAX
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed in pixels per tick
    pub speed: f32,
}

impl Player {
    /// Spawn centered inside the given portal
    pub fn at_portal(center: Vec2) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
        };
        player.place_at(center);
        player
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    /// Move so the bounding box is centered on `center`
    pub fn place_at(&mut self, center: Vec2) {
        self.pos = center - Vec2::new(self.width, self.height) * 0.5;
    }
}

/// A vertically patrolling enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Patrol speed in pixels per tick; scaled up on every completed loop
    pub speed: f32,
    /// +1.0 down, -1.0 up; flips exactly when a vertical clamp occurs
    pub dir: f32,
}

impl Enemy {
    /// Horizontal stagger of the roster, as fractions of the surface width.
    /// Keeps every enemy strictly between the portals at any aspect ratio.
    const STAGGER: [f32; ENEMY_COUNT] = [0.30, 0.45, 0.60, 0.75];

    /// Fresh roster with randomized speeds and directions
    pub fn roster(rng: &mut Pcg32, surface_w: f32, surface_h: f32) -> Vec<Enemy> {
        Self::STAGGER
            .iter()
            .map(|&frac| Enemy {
                pos: Vec2::new(
                    surface_w * frac,
                    rng.random_range(0.0..(surface_h - ENEMY_HEIGHT).max(1.0)),
                ),
                width: ENEMY_WIDTH,
                height: ENEMY_HEIGHT,
                speed: rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED),
                dir: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            })
            .collect()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current logical surface size; updated by resize before the next tick
    pub surface_w: f32,
    pub surface_h: f32,
    pub phase: GamePhase,
    /// Completed entry-to-exit traversals this run
    pub loops: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub stars: Vec<Star>,
    /// Particles of the blue (entry) portal
    pub entry_particles: Vec<PortalParticle>,
    /// Particles of the orange (exit) portal
    pub exit_particles: Vec<PortalParticle>,
    /// Shared glow pulse phase; both portals pulse in lockstep
    pub pulse_phase: f32,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed and surface size
    pub fn new(seed: u64, surface_w: f32, surface_h: f32, star_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let entry = entry_portal_center(surface_w, surface_h);
        let exit = exit_portal_center(surface_w, surface_h);

        Self {
            seed,
            surface_w,
            surface_h,
            phase: GamePhase::Playing,
            loops: 0,
            time_ticks: 0,
            player: Player::at_portal(entry),
            enemies: Enemy::roster(&mut rng, surface_w, surface_h),
            stars: field::stars(&mut rng, surface_w, surface_h, star_count),
            entry_particles: field::portal_particles(&mut rng, entry),
            exit_particles: field::portal_particles(&mut rng, exit),
            pulse_phase: 0.0,
            rng,
        }
    }

    /// Snapshot accessor for the game-over overlay
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Snapshot accessor for the score display
    pub fn loop_count(&self) -> u32 {
        self.loops
    }

    /// Restart the run: back to Playing with a zeroed loop counter, the
    /// player re-centered on the entry portal and a fresh enemy roster.
    /// Star and particle fields are left intact (they only follow resizes).
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.loops = 0;
        self.player
            .place_at(entry_portal_center(self.surface_w, self.surface_h));
        self.enemies = Enemy::roster(&mut self.rng, self.surface_w, self.surface_h);
        log::info!("run reset");
    }

    /// Adopt a new surface size. All size-relative populations are rebuilt
    /// from the new dimensions; the player is clamped into the new bounds.
    pub fn handle_resize(&mut self, surface_w: f32, surface_h: f32, star_count: usize) {
        self.surface_w = surface_w;
        self.surface_h = surface_h;

        let entry = entry_portal_center(surface_w, surface_h);
        let exit = exit_portal_center(surface_w, surface_h);
        self.stars = field::stars(&mut self.rng, surface_w, surface_h, star_count);
        self.entry_particles = field::portal_particles(&mut self.rng, entry);
        self.exit_particles = field::portal_particles(&mut self.rng, exit);
        self.enemies = Enemy::roster(&mut self.rng, surface_w, surface_h);

        self.player.pos.x = self
            .player
            .pos
            .x
            .clamp(0.0, (surface_w - self.player.width).max(0.0));
        self.player.pos.y = self
            .player
            .pos
            .y
            .clamp(0.0, (surface_h - self.player.height).max(0.0));

        log::info!("surface resized to {surface_w}x{surface_h}");
    }

    /// Scale every enemy's patrol speed; called once per completed loop
    pub fn speed_up_enemies(&mut self) {
        for enemy in &mut self.enemies {
            enemy.speed *= ENEMY_SPEEDUP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_places_player_at_entry_portal() {
        let state = GameState::new(7, 1000.0, 800.0, 200);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.loops, 0);
        // Entry portal center (50, 400), player 60x80 -> top-left (20, 360)
        assert!((state.player.pos.x - 20.0).abs() < 1e-4);
        assert!((state.player.pos.y - 360.0).abs() < 1e-4);
    }

    #[test]
    fn test_roster_shape() {
        let mut state = GameState::new(7, 1000.0, 800.0, 200);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        for enemy in &state.enemies {
            assert!(enemy.speed >= ENEMY_MIN_SPEED && enemy.speed < ENEMY_MAX_SPEED);
            assert!(enemy.dir == 1.0 || enemy.dir == -1.0);
            assert!(enemy.pos.y >= 0.0 && enemy.pos.y <= 800.0 - ENEMY_HEIGHT);
        }
        // Staggered strictly between the portals
        for enemy in &state.enemies {
            assert!(enemy.pos.x > 1000.0 * ENTRY_PORTAL_X);
            assert!(enemy.pos.x < 1000.0 * EXIT_PORTAL_X - ENEMY_WIDTH);
        }

        state.phase = GamePhase::GameOver;
        state.loops = 9;
        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.loops, 0);
        assert!((state.player.pos.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_rebuilds_populations_and_clamps_player() {
        let mut state = GameState::new(7, 1000.0, 800.0, 200);
        state.player.pos.x = 900.0;
        state.handle_resize(500.0, 400.0, 100);
        assert_eq!(state.stars.len(), 100);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        assert!(state.player.pos.x <= 500.0 - state.player.width);
        for enemy in &state.enemies {
            assert!(enemy.pos.y <= 400.0 - ENEMY_HEIGHT);
        }
    }

    #[test]
    fn test_speed_up_scales_whole_roster() {
        let mut state = GameState::new(7, 1000.0, 800.0, 200);
        let before: Vec<f32> = state.enemies.iter().map(|e| e.speed).collect();
        state.speed_up_enemies();
        for (enemy, old) in state.enemies.iter().zip(before) {
            assert!((enemy.speed - old * ENEMY_SPEEDUP).abs() < 1e-5);
        }
    }
}
