//! Axis-aligned box bodies
//!
//! Every entity in the game is a box:
//! - position: center of the box
//! - size: full extent along x (width), y (height), z (depth)
//! - velocity: units per second
//!
//! The z axis points toward the camera, so "front" is the far face
//! (smaller z) and "back" the near one.

use glam::Vec3;

use super::collision::box_collision;
use crate::tuning::Tuning;

/// The six sides of a box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    /// Far face (min z)
    pub front: f32,
    /// Near face (max z)
    pub back: f32,
}

/// A moving (or static) box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: Vec3,
    /// Accelerates along +z every step (enemies)
    pub z_acceleration: bool,
    /// `0xRRGGBB` sRGB color
    pub color: u32,
}

impl BoxBody {
    pub fn new(size: Vec3, position: Vec3, velocity: Vec3, color: u32) -> Self {
        Self {
            position,
            velocity,
            size,
            z_acceleration: false,
            color,
        }
    }

    pub fn with_z_acceleration(mut self, enabled: bool) -> Self {
        self.z_acceleration = enabled;
        self
    }

    /// Half extents along each axis
    #[inline]
    pub fn half_size(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Current sides, derived from position and size
    pub fn bounds(&self) -> Aabb {
        let half = self.half_size();
        Aabb {
            left: self.position.x - half.x,
            right: self.position.x + half.x,
            bottom: self.position.y - half.y,
            top: self.position.y + half.y,
            front: self.position.z - half.z,
            back: self.position.z + half.z,
        }
    }

    /// Advance one Euler step, bouncing off `ground`
    ///
    /// Horizontal motion is applied first, then gravity. When the look-ahead
    /// test says the next vertical step would land on the ground, the vertical
    /// velocity is damped and flipped instead of moving.
    ///
    /// Returns true if the body touched the ground this step.
    pub fn update(&mut self, ground: &BoxBody, tuning: &Tuning, dt: f32) -> bool {
        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;
        if self.z_acceleration {
            self.velocity.z += tuning.enemy_z_acceleration * dt;
        }
        self.apply_gravity(ground, tuning, dt)
    }

    fn apply_gravity(&mut self, ground: &BoxBody, tuning: &Tuning, dt: f32) -> bool {
        self.velocity.y += tuning.gravity * dt;
        if box_collision(self, ground, dt) {
            self.velocity.y = -(self.velocity.y * tuning.bounce);
            true
        } else {
            self.position.y += self.velocity.y * dt;
            false
        }
    }
}
