//! Procedural meshes: triangulated buffers built from hand-specified polyhedra.
//!
//! Meshes are built once at scene construction and handed to the renderer by
//! content-addressed handle. Animation happens on entity transforms, never by
//! deforming a built mesh.
//!
//! # Invariants
//! - Building is pure: identical descriptors give identical buffers.
//! - Face indices reference the descriptor's vertex order exactly.
//! - Malformed geometry is rejected at build time.

mod builder;
pub mod primitives;
mod store;

pub use builder::{GeometryError, MeshBuffer, MeshBuilder, MeshDescriptor, NormalMode};
pub use store::{MeshHandle, MeshStore};

pub fn crate_info() -> &'static str {
    "framecore-mesh v0.1.0"
}
