//! WebGPU rendering module
//!
//! The scene is ray-cast in the fragment shader: `scene` packs boxes and
//! camera into GPU structs, `scene_pipeline` owns the device and draws.

pub mod scene;
pub mod scene_pipeline;

pub use scene_pipeline::SceneRenderState;
