//! Shared types for the framecore simulation core.
//!
//! # Invariants
//! - Orientation angles are always finite and wrapped to `[-180, 180)`.
//! - Bounding boxes are described in local space; world placement is derived.

mod bounds;
mod types;

pub use bounds::{Aabb, Bounds};
pub use types::{EntityId, EntityKind, Orientation, Transform, VelocityParams, wrap_degrees};
