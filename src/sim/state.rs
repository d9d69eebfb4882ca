//! Game state and core simulation types
//!
//! Everything a run needs lives here; the host only feeds input and reads it.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::BoxBody;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;

/// Player cube color (brown)
pub const PLAYER_COLOR: u32 = 0x8b4513;
/// Ground slab color (forest green)
pub const GROUND_COLOR: u32 = 0x228b22;
/// Enemy cube color (red)
pub const ENEMY_COLOR: u32 = 0xff0000;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; the scene stays frozen until restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Player touched an enemy
    Hit { enemy_id: u32 },
    /// Player fell off the ground
    Fell,
}

/// Things that happened during a tick, for logging and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    EnemySpawned { id: u32 },
    Jumped,
    /// Player touched the ground
    Bounced,
    /// Enemy left the play area without hitting the player
    Dodged { id: u32 },
    GameOver(GameOverCause),
}

/// An oncoming box
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub body: BoxBody,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn position RNG
    rng: Pcg32,
    /// Gameplay constants for this run
    pub tuning: Tuning,
    /// Simulation tick counter (also the score)
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Set once the run ends
    pub game_over_cause: Option<GameOverCause>,
    /// The player's cube
    pub player: BoxBody,
    /// The floor everything bounces on
    pub ground: BoxBody,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Enemies that passed without a hit
    pub dodged: u32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new run with the given tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let player = BoxBody::new(
            tuning.player_size,
            tuning.player_start,
            tuning.player_start_velocity,
            PLAYER_COLOR,
        );
        let ground = BoxBody::new(
            tuning.ground_size,
            tuning.ground_position,
            Vec3::ZERO,
            GROUND_COLOR,
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time_ticks: 0,
            phase: GamePhase::Playing,
            game_over_cause: None,
            player,
            ground,
            enemies: Vec::new(),
            dodged: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one enemy at a random x across the far end of the ground
    pub fn spawn_enemy(&mut self) -> u32 {
        let id = self.next_entity_id();
        let r: f32 = self.rng.random();
        let position = Vec3::new(
            (r - 0.5) * self.tuning.spawn_x_spread,
            self.tuning.spawn_y,
            self.tuning.spawn_z,
        );
        let body = BoxBody::new(self.tuning.enemy_size, position, Vec3::ZERO, ENEMY_COLOR)
            .with_z_acceleration(true);
        self.enemies.push(Enemy { id, body });
        self.events.push(GameEvent::EnemySpawned { id });
        log::debug!("Spawned enemy {} at x={:.2}", id, position.x);
        id
    }

    /// End the run
    pub fn end_run(&mut self, cause: GameOverCause) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_cause = Some(cause);
        self.events.push(GameEvent::GameOver(cause));
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds survived so far
    pub fn survived_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.position, Vec3::new(0.0, 2.0, 3.0));
        assert_eq!(state.player.velocity, Vec3::new(0.0, -1.2, 0.0));
        assert_eq!(state.player.color, PLAYER_COLOR);
        assert_eq!(state.ground.size, Vec3::new(20.0, 0.5, 70.0));
        assert_eq!(state.ground.position.y, -2.0);
        assert!(state.enemies.is_empty());
        assert!(!state.player.z_acceleration);
    }

    #[test]
    fn test_spawn_enemy_in_band() {
        let mut state = GameState::new(42);
        for _ in 0..100 {
            state.spawn_enemy();
        }
        assert_eq!(state.enemies.len(), 100);
        for enemy in &state.enemies {
            let p = enemy.body.position;
            assert!(p.x >= -7.5 && p.x < 7.5, "x out of band: {}", p.x);
            assert_eq!(p.y, 0.0);
            assert_eq!(p.z, -30.0);
            assert_eq!(enemy.body.velocity, Vec3::ZERO);
            assert!(enemy.body.z_acceleration);
            assert_eq!(enemy.body.color, ENEMY_COLOR);
        }
    }

    #[test]
    fn test_spawn_ids_are_unique_and_increasing() {
        let mut state = GameState::new(7);
        let a = state.spawn_enemy();
        let b = state.spawn_enemy();
        assert!(b > a);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::EnemySpawned { id: a },
                GameEvent::EnemySpawned { id: b }
            ]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut s1 = GameState::new(2024);
        let mut s2 = GameState::new(2024);
        for _ in 0..10 {
            s1.spawn_enemy();
            s2.spawn_enemy();
        }
        assert_eq!(s1.enemies, s2.enemies);
    }

    #[test]
    fn test_end_run_is_sticky() {
        let mut state = GameState::new(3);
        state.end_run(GameOverCause::Fell);
        state.end_run(GameOverCause::Hit { enemy_id: 9 });
        assert_eq!(state.game_over_cause, Some(GameOverCause::Fell));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GameOver(GameOverCause::Fell)]
        );
    }
}
