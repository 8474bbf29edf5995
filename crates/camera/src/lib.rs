//! Camera rig: tracking and free-fly viewpoints plus an optional orbiting light.
//!
//! Camera state lives outside the entity registry. It reads entity transforms
//! but never writes them.
//!
//! # Invariants
//! - Pitch stays inside `[-90, 90]` degrees no matter the pointer input.
//! - A tracking camera never takes on a non-finite orientation.

mod light;
mod projection;
mod rig;

pub use light::OrbitLight;
pub use projection::Projection;
pub use rig::{CameraFrame, CameraMode, CameraRig, FreeFlyConfig, OffsetSpace, TrackingConfig};

pub fn crate_info() -> &'static str {
    "framecore-camera v0.1.0"
}
