//! Damped orbit camera
//!
//! Orbits a target point on a sphere. Mouse drags add pending rotation,
//! and `update` (once per rendered frame) applies the damping fraction of
//! it and keeps the rest, so the view eases into the full drag angle.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Keep the camera off the poles so `look_at` stays well defined
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
/// Closest and farthest zoom distances
pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 60.0;
/// Zoom step per wheel notch (100 delta units)
const ZOOM_STEP: f32 = 0.95;

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation about +y (0 = looking down -z from +z)
    pub yaw: f32,
    /// Elevation above the target's horizontal plane
    pub pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    /// Fraction of angular velocity lost per update (0..1)
    pub damping: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_eye(Vec3::new(4.61, 2.74, 8.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Place the camera at `eye`, orbiting `target`
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(MIN_DISTANCE);
        Self {
            target,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            damping: 0.05,
            fov_y: 75f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Feed a pointer drag (pixels) on a viewport `viewport_height` pixels tall
    ///
    /// Dragging the full viewport height turns the view a full circle.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.yaw_velocity -= TAU * dx / h;
        self.pitch_velocity += TAU * dy / h;
    }

    /// Dolly in (negative delta) or out (positive delta)
    pub fn zoom(&mut self, wheel_delta: f32) {
        let notches = wheel_delta / 100.0;
        self.distance =
            (self.distance * ZOOM_STEP.powf(-notches)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Apply a damped share of the pending rotation
    ///
    /// Each update applies `damping` of what is left, so the shares of one
    /// drag sum to the drag angle. A damping of 0 applies it all at once.
    pub fn update(&mut self) {
        let damping = self.damping.clamp(0.0, 1.0);
        let step = if damping > 0.0 { damping } else { 1.0 };

        self.yaw += self.yaw_velocity * step;
        self.pitch = (self.pitch + self.pitch_velocity * step).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.yaw_velocity *= 1.0 - step;
        self.pitch_velocity *= 1.0 - step;
    }

    /// Pending rotation (yaw, pitch) in radians not yet applied
    pub fn angular_velocity(&self) -> (f32, f32) {
        (self.yaw_velocity, self.pitch_velocity)
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn inverse_view_proj(&self) -> Mat4 {
        self.view_proj().inverse()
    }
}
