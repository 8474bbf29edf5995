//! Physics-lite: input-driven movement, scripted actors and trigger volumes.
//!
//! There is no collision response here. Walls and obstacles are static
//! entities the player passes through; only trigger overlap is detected.
//!
//! # Invariants
//! - Player motion depends only on input, dt and the boost flag.
//! - Scripted actors draw randomness from a caller-owned seeded RNG.
//! - Overlap is symmetric and a non-degenerate box always overlaps itself.

mod movement;
mod scripted;
mod trigger;

pub use movement::{MovementConfig, MovementController};
pub use scripted::{Axis, PatrolPath, PulseSpin, Script};
pub use trigger::{TriggerDetector, TriggerEdge, TriggerTracker, overlap};

pub fn crate_info() -> &'static str {
    "framecore-physics v0.1.0"
}
