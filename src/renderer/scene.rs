//! CPU-side scene packing
//!
//! Turns the game state, camera and settings into the plain-old-data
//! structs the shader reads. No GPU access here.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::camera::OrbitCamera;
use crate::settings::Settings;
use crate::sim::{BoxBody, GameState};
use crate::srgb_hex_to_linear;

/// Maximum number of boxes uploaded per frame
pub const MAX_BOXES: usize = 256;

/// Scene background (sky blue)
pub const SKY_COLOR: u32 = 0x87ceeb;
/// Sun position; it shines toward the origin
pub const SUN_POSITION: Vec3 = Vec3::new(10.0, 15.0, 10.0);
pub const SUN_INTENSITY: f32 = 3.0;
pub const AMBIENT_INTENSITY: f32 = 0.6;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub inv_view_proj: [[f32; 4]; 4], // offset 0
    pub eye: [f32; 4],                // offset 64
    pub sun_dir: [f32; 4],            // offset 80 - xyz toward the sun, w = intensity
    pub sky: [f32; 4],                // offset 96 - linear rgb, w = ambient intensity
    pub resolution: [f32; 2],         // offset 112
    pub exposure: f32,                // offset 120
    pub box_count: u32,               // offset 124
    pub shadows: u32,                 // offset 128
    pub _pad: [u32; 3],               // pad to 144 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BoxData {
    pub center: [f32; 4],
    pub half_size: [f32; 4],
    /// Linear rgb, a = 1
    pub color: [f32; 4],
}

impl BoxData {
    pub fn from_body(body: &BoxBody) -> Self {
        let c = body.position;
        let h = body.half_size();
        let [r, g, b] = srgb_hex_to_linear(body.color);
        Self {
            center: [c.x, c.y, c.z, 0.0],
            half_size: [h.x, h.y, h.z, 0.0],
            color: [r, g, b, 1.0],
        }
    }
}

/// Pack every visible box: ground, player, then enemies by id
pub fn pack_boxes(state: &GameState) -> Vec<BoxData> {
    let mut boxes = Vec::with_capacity((state.enemies.len() + 2).min(MAX_BOXES));
    boxes.push(BoxData::from_body(&state.ground));
    boxes.push(BoxData::from_body(&state.player));
    boxes.extend(
        state
            .enemies
            .iter()
            .take(MAX_BOXES - 2)
            .map(|e| BoxData::from_body(&e.body)),
    );
    boxes
}

/// Build the per-frame uniforms
pub fn pack_globals(
    camera: &OrbitCamera,
    settings: &Settings,
    resolution: (u32, u32),
    box_count: usize,
) -> Globals {
    let eye = camera.eye();
    let sun = SUN_POSITION.normalize();
    let [sr, sg, sb] = srgb_hex_to_linear(SKY_COLOR);
    Globals {
        inv_view_proj: camera.inverse_view_proj().to_cols_array_2d(),
        eye: [eye.x, eye.y, eye.z, 1.0],
        sun_dir: [sun.x, sun.y, sun.z, SUN_INTENSITY],
        sky: [sr, sg, sb, AMBIENT_INTENSITY],
        resolution: [resolution.0 as f32, resolution.1 as f32],
        exposure: settings.exposure,
        box_count: box_count.min(MAX_BOXES) as u32,
        shadows: u32::from(settings.shadows_enabled()),
        _pad: [0; 3],
    }
}
