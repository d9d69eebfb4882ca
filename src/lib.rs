//! Cube Dodge - dodge the oncoming boxes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, AABB collisions, enemy spawns)
//! - `tuning`: Data-driven gameplay constants
//! - `input`: Keyboard controls to tick input
//! - `camera`: Damped orbit camera
//! - `renderer`: WebGPU ray-cast scene pipeline

pub mod camera;
pub mod error;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use camera::OrbitCamera;
pub use error::{Error, TuningError};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Convert a `0xRRGGBB` sRGB color to linear RGB
#[inline]
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}
