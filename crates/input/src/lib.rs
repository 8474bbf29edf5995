//! Input: held-symbol state and pointer deltas written by the host each frame.
//!
//! # Invariants
//! - Unknown symbols read as not held; they are never an error.
//! - A pointer delta is consumed at most once per frame.

mod bindings;
mod state;

pub use bindings::InputBindings;
pub use state::InputState;

/// Symbol names understood by the movement controller and camera rig.
pub mod symbols {
    pub const FORWARD: &str = "forward";
    pub const BACKWARD: &str = "backward";
    pub const TURN_LEFT: &str = "turn_left";
    pub const TURN_RIGHT: &str = "turn_right";
    pub const FLY_FORWARD: &str = "fly_forward";
    pub const FLY_BACKWARD: &str = "fly_backward";
    pub const FLY_LEFT: &str = "fly_left";
    pub const FLY_RIGHT: &str = "fly_right";
}

pub fn crate_info() -> &'static str {
    "framecore-input v0.1.0"
}
