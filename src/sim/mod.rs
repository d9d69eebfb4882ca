//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod state;
pub mod tick;

pub use body::{Aabb, BoxBody};
pub use collision::{aabb_overlap, box_collision};
pub use state::{
    ENEMY_COLOR, Enemy, GROUND_COLOR, GameEvent, GameOverCause, GamePhase, GameState,
    PLAYER_COLOR,
};
pub use tick::{TickInput, tick};
