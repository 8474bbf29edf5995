//! Simulation: scene construction and the per-frame loop.
//!
//! A [`SimulationLoop`] owns one scene: its registry, meshes, camera and RNG.
//! Hosts write input, call [`SimulationLoop::tick`] once per displayed frame
//! and hand [`SimulationLoop::render_frame`] to a renderer.
//!
//! # Invariants
//! - Stages run in a fixed order every tick; later stages see the results
//!   of earlier ones from the same tick.
//! - The player is boosted by triggers detected on the previous tick.
//! - Scenes built from the same config and fed the same input and deltas
//!   evolve bit-identically.

mod error;
mod frame_loop;
pub mod presets;
mod scene;

pub use error::SceneError;
pub use frame_loop::{FrameReport, SimulationLoop};
pub use scene::{CameraConfig, CameraModeConfig, EntityConfig, MeshConfig, MeshSource, SceneConfig};

pub fn crate_info() -> &'static str {
    "framecore-sim v0.1.0"
}
