//! Rendering adapter: renderer-agnostic frame description.
//!
//! # Invariants
//! - A renderer only sees a finished [`RenderFrame`]; it cannot reach the
//!   registry or mutate simulation state.
//! - Meshes are referenced by handle. Buffers stay in the mesh store.
//!
//! The debug text renderer stands in for a GPU backend in headless hosts and
//! tests. Swap in a real backend by implementing [`Renderer`].

mod frame;
mod renderer;

pub use frame::{CameraView, RenderFrame, RenderItem};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "framecore-render v0.1.0"
}
