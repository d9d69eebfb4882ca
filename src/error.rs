//! Error types for the fallible edges of the game
//!
//! The simulation itself never fails; errors come from WebGPU setup,
//! the DOM, and user-supplied tuning.

use thiserror::Error;

/// Top-level crate error
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create WebGPU surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("missing DOM element: {0}")]
    Dom(&'static str),

    #[error("invalid tuning JSON: {0}")]
    TuningJson(#[from] serde_json::Error),

    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Rejected gameplay tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("spawn interval must be at least one tick")]
    ZeroSpawnInterval,

    #[error("bounce factor {0} is outside [0, 1]")]
    BounceOutOfRange(f32),

    #[error("gravity {0} must pull downward")]
    GravityNotDownward(f32),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}
