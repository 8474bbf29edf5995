//! Kernel: entity registry, frame clock and transform hierarchy.
//!
//! # Invariants
//! - The registry is the single owner of every transform in a scene.
//! - Parent links never form a cycle; violations are rejected at assignment.
//! - Static entities are frozen after spawn.
//! - Iteration order is deterministic (BTreeMap keyed by sequential ids).

mod clock;
mod error;
mod registry;

pub use clock::Clock;
pub use error::KernelError;
pub use registry::{EntityRecord, EntityRegistry, EntitySpec};

pub fn crate_info() -> &'static str {
    "framecore-kernel v0.1.0"
}
