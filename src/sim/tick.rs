//! Per-frame simulation tick
//!
//! One tick per scheduled frame callback. All entity mutation happens
//! synchronously in here; the renderer only ever reads the result.

use glam::Vec2;

use super::collision::{inside_portal, player_hits_enemy};
use super::field;
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::{entry_portal_center, exit_portal_center};

/// Held-key flags written by the input callbacks and read by the tick.
///
/// Two physical keys map to the one logical "move right" action. The flags
/// are per-key because an enemy collision clears them: a key still held
/// through a restart stays inert until released and pressed again.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub arrow_right: bool,
    pub key_d: bool,
}

impl InputState {
    pub fn move_right(&self) -> bool {
        self.arrow_right || self.key_d
    }

    pub fn clear(&mut self) {
        self.arrow_right = false;
        self.key_d = false;
    }
}

/// Advance the game by one tick.
///
/// Takes the input mutably so a fatal collision can drop the held keys.
/// The decorative layer (stars, portal particles) animates in every phase;
/// gameplay only advances while `Playing`.
pub fn tick(state: &mut GameState, input: &mut InputState) {
    state.time_ticks += 1;

    let entry = entry_portal_center(state.surface_w, state.surface_h);
    let exit = exit_portal_center(state.surface_w, state.surface_h);

    state.pulse_phase = (state.pulse_phase + PULSE_STEP) % PULSE_WRAP;
    field::advance_stars(&mut state.stars);
    field::advance_particles(&mut state.entry_particles, entry, state.pulse_phase);
    field::advance_particles(&mut state.exit_particles, exit, state.pulse_phase);

    if state.phase == GamePhase::GameOver {
        return;
    }

    // Candidate horizontal move, clamped to the surface
    let mut candidate_x = state.player.pos.x;
    if input.move_right() {
        candidate_x += state.player.speed;
    }
    candidate_x = candidate_x.clamp(0.0, (state.surface_w - state.player.width).max(0.0));

    // Teleport takes precedence over the normal translation for this tick
    let candidate_center = Vec2::new(
        candidate_x + state.player.width * 0.5,
        state.player.pos.y + state.player.height * 0.5,
    );
    if inside_portal(candidate_center, exit, PORTAL_RADIUS) {
        state.player.place_at(entry);
        state.loops += 1;
        state.speed_up_enemies();
        log::info!("loop {} complete", state.loops);
    } else {
        state.player.pos.x = candidate_x;
    }

    // Bounce patrol: clamp at either vertical bound and flip on the same tick
    let max_y = (state.surface_h - ENEMY_HEIGHT).max(0.0);
    for enemy in &mut state.enemies {
        enemy.pos.y += enemy.speed * enemy.dir;
        if enemy.pos.y <= 0.0 {
            enemy.pos.y = 0.0;
            enemy.dir = 1.0;
        } else if enemy.pos.y >= max_y {
            enemy.pos.y = max_y;
            enemy.dir = -1.0;
        }
    }

    // First hit ends the run and drops the held keys
    for enemy in &state.enemies {
        if player_hits_enemy(&state.player, enemy) {
            state.phase = GamePhase::GameOver;
            input.clear();
            log::info!("run over after {} loops", state.loops);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;
    use glam::Vec2;
    use proptest::prelude::*;

    const W: f32 = 1000.0;
    const H: f32 = 800.0;

    fn state() -> GameState {
        GameState::new(12345, W, H, 200)
    }

    /// A state whose enemies can never reach the player's row, so portal
    /// traversal can be exercised without a stray game over.
    fn state_without_threats() -> GameState {
        let mut state = state();
        for enemy in &mut state.enemies {
            enemy.speed = 0.0;
            enemy.pos.y = 0.0;
        }
        state
    }

    fn held() -> InputState {
        InputState {
            arrow_right: true,
            key_d: false,
        }
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let mut state = state_without_threats();
        let mut input = held();
        for _ in 0..1000 {
            tick(&mut state, &mut input);
            assert!(state.player.pos.x >= 0.0);
            assert!(state.player.pos.x <= W - state.player.width);
        }
    }

    #[test]
    fn test_idle_player_does_not_move() {
        let mut state = state_without_threats();
        let mut input = InputState::default();
        let x = state.player.pos.x;
        tick(&mut state, &mut input);
        assert_eq!(state.player.pos.x, x);
    }

    #[test]
    fn test_traversal_teleports_and_counts() {
        let mut state = state_without_threats();
        let mut input = held();

        // Hold right until the exit portal at (950, 400) triggers
        let mut ticks = 0;
        while state.loops == 0 {
            tick(&mut state, &mut input);
            ticks += 1;
            assert!(ticks < 1000, "never reached the exit portal");
        }

        assert_eq!(state.loops, 1);
        // Back at the entry portal: center (50, 400), body 60x80
        assert!((state.player.pos.x - 20.0).abs() < 1e-3);
        assert!((state.player.pos.y - 360.0).abs() < 1e-3);
        assert!((state.player.center() - entry_portal_center(W, H)).length() < 1e-3);
    }

    #[test]
    fn test_no_double_increment_after_teleport() {
        let mut state = state_without_threats();
        let mut input = held();
        while state.loops == 0 {
            tick(&mut state, &mut input);
        }
        let x_after_warp = state.player.pos.x;

        // The next tick starts far outside the exit region; it must be a
        // plain move, not another loop
        tick(&mut state, &mut input);
        assert_eq!(state.loops, 1);
        assert!((state.player.pos.x - (x_after_warp + PLAYER_SPEED)).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_speed_compounds_per_loop() {
        let mut state = state_without_threats();
        // A tiny but nonzero patrol speed keeps the roster drifting near the
        // ceiling, well clear of the player's row, while the multiplier works
        for enemy in &mut state.enemies {
            enemy.speed = 0.1;
            enemy.dir = 1.0;
        }
        let initial: Vec<f32> = state.enemies.iter().map(|e| e.speed).collect();

        let mut input = held();
        let mut completed = 0;
        while completed < 3 {
            let before = state.loops;
            tick(&mut state, &mut input);
            if state.loops > before {
                completed += 1;
            }
        }

        for (enemy, speed) in state.enemies.iter().zip(&initial) {
            assert!((enemy.speed - speed * ENEMY_SPEEDUP.powi(3)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_enemy_bounces_at_floor_and_ceiling() {
        let mut state = state_without_threats();
        state.enemies = vec![Enemy {
            pos: Vec2::new(500.0, 0.0),
            width: ENEMY_WIDTH,
            height: ENEMY_HEIGHT,
            speed: 3.0,
            dir: -1.0,
        }];
        let mut input = InputState::default();

        // Advancing past the ceiling clamps and flips on the same tick
        tick(&mut state, &mut input);
        assert_eq!(state.enemies[0].pos.y, 0.0);
        assert_eq!(state.enemies[0].dir, 1.0);

        state.enemies[0].pos.y = H - ENEMY_HEIGHT - 1.0;
        tick(&mut state, &mut input);
        assert_eq!(state.enemies[0].pos.y, H - ENEMY_HEIGHT);
        assert_eq!(state.enemies[0].dir, -1.0);
    }

    #[test]
    fn test_collision_ends_run_and_clears_held_keys() {
        let mut state = state();
        state.enemies = vec![Enemy {
            pos: Vec2::new(state.player.pos.x + 10.0, state.player.pos.y + 10.0),
            width: ENEMY_WIDTH,
            height: ENEMY_HEIGHT,
            speed: 0.0,
            dir: 1.0,
        }];
        let mut input = InputState {
            arrow_right: true,
            key_d: true,
        };

        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!input.arrow_right);
        assert!(!input.key_d);
    }

    #[test]
    fn test_game_over_freezes_gameplay() {
        let mut state = state();
        state.phase = GamePhase::GameOver;
        let player_pos = state.player.pos;
        let enemy_pos: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        let loops = state.loops;

        let mut input = held();
        for _ in 0..50 {
            tick(&mut state, &mut input);
        }

        assert_eq!(state.player.pos, player_pos);
        assert_eq!(state.loops, loops);
        for (enemy, pos) in state.enemies.iter().zip(enemy_pos) {
            assert_eq!(enemy.pos, pos);
        }
        // Held keys are untouched by game-over ticks (only the collision
        // itself clears them)
        assert!(input.move_right());
    }

    #[test]
    fn test_decorative_layer_animates_during_game_over() {
        let mut state = state();
        state.phase = GamePhase::GameOver;
        let pulse = state.pulse_phase;
        let star_phase = state.stars[0].pulse_phase;

        let mut input = InputState::default();
        tick(&mut state, &mut input);

        assert!(state.pulse_phase != pulse);
        assert!(state.stars[0].pulse_phase != star_phase);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = state();
        let mut input = held();
        state.enemies[0].pos = state.player.pos;
        state.enemies[0].speed = 0.0;
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.loops, 0);
        assert!((state.player.pos.x - 20.0).abs() < 1e-3);
        assert!((state.player.pos.y - 360.0).abs() < 1e-3);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        for enemy in &state.enemies {
            assert!(enemy.speed >= ENEMY_MIN_SPEED && enemy.speed < ENEMY_MAX_SPEED);
            assert!(enemy.dir == 1.0 || enemy.dir == -1.0);
        }
    }

    proptest! {
        /// Random input sequences never push the player out of bounds
        #[test]
        fn prop_player_clamped(moves in proptest::collection::vec(any::<bool>(), 1..300)) {
            let mut state = state_without_threats();
            for held in moves {
                let mut input = InputState { arrow_right: held, key_d: false };
                tick(&mut state, &mut input);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= W - state.player.width);
            }
        }

        /// Any roster stays inside the vertical bounds, and a direction flip
        /// happens exactly when a clamp does
        #[test]
        fn prop_enemy_bounce(
            y in 0.0f32..750.0,
            speed in 1.0f32..3.0,
            down in any::<bool>(),
        ) {
            let mut state = state_without_threats();
            state.enemies = vec![Enemy {
                pos: Vec2::new(500.0, y),
                width: ENEMY_WIDTH,
                height: ENEMY_HEIGHT,
                speed,
                dir: if down { 1.0 } else { -1.0 },
            }];
            let mut input = InputState::default();

            for _ in 0..500 {
                let before_y = state.enemies[0].pos.y;
                let before_dir = state.enemies[0].dir;
                tick(&mut state, &mut input);
                let enemy = &state.enemies[0];

                prop_assert!(enemy.pos.y >= 0.0);
                prop_assert!(enemy.pos.y <= H - ENEMY_HEIGHT);

                let clamped = enemy.pos.y != before_y + speed * before_dir;
                let flipped = enemy.dir != before_dir;
                let on_bound = enemy.pos.y == 0.0 || enemy.pos.y == H - ENEMY_HEIGHT;
                prop_assert!(!clamped || flipped);
                prop_assert!(!flipped || on_bound);
            }
        }
    }
}
