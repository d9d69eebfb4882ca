//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-balanced from JSON
//! without touching the simulation. Units are per second, so the values
//! stay meaningful if `SIM_DT` changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, TuningError};

/// Gameplay constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical acceleration (u/s², negative is down)
    pub gravity: f32,
    /// Fraction of vertical speed kept when bouncing off the ground
    pub bounce: f32,
    /// Player sideways speed (u/s)
    pub strafe_speed: f32,
    /// Player forward/back speed (u/s)
    pub advance_speed: f32,
    /// Vertical speed set by a jump (u/s)
    pub jump_speed: f32,
    /// Enemy acceleration toward the player along +z (u/s²)
    pub enemy_z_acceleration: f32,
    /// Ticks between enemy spawns
    pub spawn_interval_ticks: u32,
    /// Width of the band enemies spawn in, centered on x = 0
    pub spawn_x_spread: f32,
    /// Enemy spawn depth
    pub spawn_z: f32,
    /// Enemy spawn height
    pub spawn_y: f32,
    /// Player cube size
    pub player_size: Vec3,
    /// Player start position
    pub player_start: Vec3,
    /// Player start velocity
    pub player_start_velocity: Vec3,
    /// Enemy cube size
    pub enemy_size: Vec3,
    /// Ground slab size
    pub ground_size: Vec3,
    /// Ground slab center
    pub ground_position: Vec3,
    /// How far past the ground's back edge an enemy travels before removal
    pub despawn_margin: f32,
    /// Anything below this height has fallen out of the world
    pub fall_limit_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -28.8,
            bounce: 0.8,
            strafe_speed: 5.94,
            advance_speed: 3.0,
            jump_speed: 12.0,
            enemy_z_acceleration: 10.8,
            spawn_interval_ticks: 20,
            spawn_x_spread: 15.0,
            spawn_z: -30.0,
            spawn_y: 0.0,
            player_size: Vec3::splat(1.5),
            player_start: Vec3::new(0.0, 2.0, 3.0),
            player_start_velocity: Vec3::new(0.0, -1.2, 0.0),
            enemy_size: Vec3::splat(1.5),
            ground_size: Vec3::new(20.0, 0.5, 70.0),
            ground_position: Vec3::new(0.0, -2.0, 0.0),
            despawn_margin: 5.0,
            fall_limit_y: -30.0,
        }
    }
}

impl Tuning {
    /// LocalStorage key for an optional override
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cube_dodge_tuning";

    /// Parse and validate tuning from JSON; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.spawn_interval_ticks == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }
        if !(0.0..=1.0).contains(&self.bounce) {
            return Err(TuningError::BounceOutOfRange(self.bounce));
        }
        if self.gravity >= 0.0 {
            return Err(TuningError::GravityNotDownward(self.gravity));
        }
        if self.spawn_x_spread <= 0.0 {
            return Err(TuningError::NonPositive {
                name: "spawn_x_spread",
                value: self.spawn_x_spread,
            });
        }
        let sizes = [
            ("player_size", self.player_size),
            ("enemy_size", self.enemy_size),
            ("ground_size", self.ground_size),
        ];
        for (name, size) in sizes {
            let value = size.min_element();
            if value <= 0.0 {
                return Err(TuningError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_defaults_match_per_frame_constants() {
        let t = Tuning::default();
        assert!((t.gravity * SIM_DT * SIM_DT - (-0.008)).abs() < 1e-6);
        assert!((t.strafe_speed * SIM_DT - 0.099).abs() < 1e-6);
        assert!((t.advance_speed * SIM_DT - 0.05).abs() < 1e-6);
        assert!((t.jump_speed * SIM_DT - 0.2).abs() < 1e-6);
        assert!((t.enemy_z_acceleration * SIM_DT * SIM_DT - 0.003).abs() < 1e-6);
    }

    #[test]
    fn test_from_json_partial_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "spawn_interval_ticks": 10, "bounce": 0.5 }"#).unwrap();
        assert_eq!(t.spawn_interval_ticks, 10);
        assert_eq!(t.bounce, 0.5);
        assert_eq!(t.gravity, Tuning::default().gravity);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(Error::TuningJson(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let err = Tuning::from_json(r#"{ "spawn_interval_ticks": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Tuning(TuningError::ZeroSpawnInterval)));
    }

    #[test]
    fn test_validate_rules() {
        let mut t = Tuning::default();
        t.bounce = 1.5;
        assert_eq!(t.validate(), Err(TuningError::BounceOutOfRange(1.5)));

        let mut t = Tuning::default();
        t.gravity = 0.0;
        assert_eq!(t.validate(), Err(TuningError::GravityNotDownward(0.0)));

        let mut t = Tuning::default();
        t.enemy_size = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(
            t.validate(),
            Err(TuningError::NonPositive {
                name: "enemy_size",
                value: 0.0
            })
        );
    }
}
