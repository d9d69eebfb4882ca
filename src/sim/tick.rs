//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::box_collision;
use super::state::{GameEvent, GameOverCause, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held: move toward -x
    pub left: bool,
    /// Held: move toward +x
    pub right: bool,
    /// Held: move toward -z (away from the camera)
    pub forward: bool,
    /// Held: move toward +z
    pub back: bool,
    /// One-shot: kick the player upward
    pub jump: bool,
    /// One-shot: pause toggle
    pub pause: bool,
    /// One-shot: start a new run
    pub restart: bool,
}

impl TickInput {
    /// Clear one-shot inputs after they have been consumed by a tick
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.pause = false;
        self.restart = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        let seed = state.seed.wrapping_add(1);
        let tuning = state.tuning.clone();
        *state = GameState::with_tuning(seed, tuning);
        log::info!("Run restarted with seed {}", seed);
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if input.jump {
        state.player.velocity.y = state.tuning.jump_speed;
        state.events.push(GameEvent::Jumped);
    }

    // Integrate the player; velocity from held keys lands next tick
    if state.player.update(&state.ground, &state.tuning, dt) {
        state.events.push(GameEvent::Bounced);
    }

    state.player.velocity.x = 0.0;
    state.player.velocity.z = 0.0;
    if input.left {
        state.player.velocity.x = -state.tuning.strafe_speed;
    }
    if input.right {
        state.player.velocity.x = state.tuning.strafe_speed;
    }
    if input.forward {
        state.player.velocity.z = -state.tuning.advance_speed;
    }
    if input.back {
        state.player.velocity.z = state.tuning.advance_speed;
    }

    // Spawn cadence
    if state
        .time_ticks
        .is_multiple_of(u64::from(state.tuning.spawn_interval_ticks))
    {
        state.spawn_enemy();
    }

    // Move enemies, then test each against the player
    let mut hit = None;
    for enemy in &mut state.enemies {
        enemy.body.update(&state.ground, &state.tuning, dt);
        if hit.is_none() && box_collision(&state.player, &enemy.body, dt) {
            hit = Some(enemy.id);
        }
    }
    if let Some(enemy_id) = hit {
        log::info!(
            "Hit by enemy {} after {:.1}s",
            enemy_id,
            state.survived_secs()
        );
        state.end_run(GameOverCause::Hit { enemy_id });
    }

    if state.phase == GamePhase::Playing {
        despawn_passed_enemies(state);
    }

    if state.phase == GamePhase::Playing && state.player.position.y < state.tuning.fall_limit_y {
        log::info!("Fell off after {:.1}s", state.survived_secs());
        state.end_run(GameOverCause::Fell);
    }

    state.time_ticks += 1;
}

/// Remove enemies that have run past the ground or fallen out of the world
fn despawn_passed_enemies(state: &mut GameState) {
    let exit_z = state.ground.bounds().back + state.tuning.despawn_margin;
    let fall_limit = state.tuning.fall_limit_y;
    let events = &mut state.events;
    let dodged = &mut state.dodged;

    state.enemies.retain(|enemy| {
        let gone = enemy.body.bounds().front > exit_z || enemy.body.position.y < fall_limit;
        if gone {
            *dodged += 1;
            events.push(GameEvent::Dodged { id: enemy.id });
        }
        !gone
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::BoxBody;
    use crate::sim::state::Enemy;
    use glam::Vec3;

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = GameState::new(1);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = GameState::new(1);
        // Keep enemies from reaching the player: stop them before they leave spawn
        state.tuning.enemy_z_acceleration = 0.0;
        for _ in 0..61 {
            tick(&mut state, &idle(), SIM_DT);
        }
        // Ticks 0, 20, 40, 60
        assert_eq!(state.enemies.len(), 4);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_held_keys_apply_next_tick() {
        let mut state = GameState::new(1);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        // Velocity set after integration
        assert_eq!(state.player.position.x, 0.0);
        assert_eq!(state.player.velocity.x, state.tuning.strafe_speed);

        tick(&mut state, &input, SIM_DT);
        assert!((state.player.position.x - state.tuning.strafe_speed * SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_keys_later_wins() {
        let mut state = GameState::new(1);
        let input = TickInput {
            left: true,
            right: true,
            forward: true,
            back: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.velocity.x, state.tuning.strafe_speed);
        assert_eq!(state.player.velocity.z, state.tuning.advance_speed);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.player.velocity.x, 0.0);
        assert_eq!(state.player.velocity.z, 0.0);
    }

    #[test]
    fn test_jump_sets_vertical_speed_then_gravity() {
        let mut state = GameState::new(1);
        let y0 = state.player.position.y;
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let expected_vy = state.tuning.jump_speed + state.tuning.gravity * SIM_DT;
        assert!((state.player.velocity.y - expected_vy).abs() < 1e-5);
        assert!(state.player.position.y > y0);
        assert!(state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut state = GameState::new(1);
        tick(&mut state, &idle(), SIM_DT);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen = state.player.clone();
        let ticks = state.time_ticks;

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.player, frozen);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_enemy_hit_ends_run() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        // Park an enemy on top of the player
        let body = BoxBody::new(
            Vec3::splat(1.5),
            state.player.position,
            Vec3::ZERO,
            0xff0000,
        );
        state.enemies.push(Enemy { id, body });

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.game_over_cause,
            Some(GameOverCause::Hit { enemy_id: id })
        );

        // Frozen after game over, even with pause pressed
        let ticks = state.time_ticks;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_oncoming_enemy_eventually_hits_idle_player() {
        let mut state = GameState::new(5);
        // Spawn only in the player's lane
        state.tuning.spawn_x_spread = 0.01;
        for _ in 0..600 {
            tick(&mut state, &idle(), SIM_DT);
            if state.is_over() {
                break;
            }
        }
        assert!(matches!(
            state.game_over_cause,
            Some(GameOverCause::Hit { .. })
        ));
    }

    #[test]
    fn test_enemies_past_ground_are_dodged() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        let body = BoxBody::new(
            Vec3::splat(1.5),
            Vec3::new(8.0, 0.0, 41.0),
            Vec3::ZERO,
            0xff0000,
        );
        state.enemies.push(Enemy { id, body });

        tick(&mut state, &idle(), SIM_DT);
        assert!(state.enemies.iter().all(|e| e.id != id));
        assert_eq!(state.dodged, 1);
        assert!(state.drain_events().contains(&GameEvent::Dodged { id }));
    }

    #[test]
    fn test_enemy_leaving_on_the_losing_tick_is_not_dodged() {
        let mut state = GameState::new(1);
        let hitter = state.next_entity_id();
        let body = BoxBody::new(
            Vec3::splat(1.5),
            state.player.position,
            Vec3::ZERO,
            0xff0000,
        );
        state.enemies.push(Enemy { id: hitter, body });

        // Past the ground's back edge on the same tick
        let leaver = state.next_entity_id();
        let body = BoxBody::new(
            Vec3::splat(1.5),
            Vec3::new(8.0, 0.0, 41.0),
            Vec3::ZERO,
            0xff0000,
        );
        state.enemies.push(Enemy { id: leaver, body });

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(
            state.game_over_cause,
            Some(GameOverCause::Hit { enemy_id: hitter })
        );
        assert_eq!(state.dodged, 0);
        assert!(state.enemies.iter().any(|e| e.id == leaver));
        assert!(
            !state
                .drain_events()
                .contains(&GameEvent::Dodged { id: leaver })
        );
    }

    #[test]
    fn test_falling_off_ends_run() {
        let mut state = GameState::new(1);
        state.tuning.enemy_z_acceleration = 0.0;
        state.player.position = Vec3::new(15.0, 0.0, 3.0);
        for _ in 0..300 {
            tick(&mut state, &idle(), SIM_DT);
            if state.is_over() {
                break;
            }
        }
        assert_eq!(state.game_over_cause, Some(GameOverCause::Fell));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = GameState::new(10);
        state.tuning.spawn_interval_ticks = 5;
        for _ in 0..30 {
            tick(&mut state, &idle(), SIM_DT);
        }
        state.end_run(GameOverCause::Fell);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.seed, 11);
        // Tuning survives the restart
        assert_eq!(state.tuning.spawn_interval_ticks, 5);
    }

    #[test]
    fn test_clear_one_shots_keeps_held_keys() {
        let mut input = TickInput {
            left: true,
            jump: true,
            pause: true,
            restart: true,
            ..Default::default()
        };
        input.clear_one_shots();
        assert!(input.left);
        assert!(!input.jump && !input.pause && !input.restart);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                forward: true,
                right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player, state2.player);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.phase, state2.phase);
    }
}
