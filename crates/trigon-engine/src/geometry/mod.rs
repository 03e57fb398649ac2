//! Vertex records, their buffer layout, and the device buffer that holds them.
//!
//! Convention:
//! - positions are already in clip space (no transform in the vertex stage)
//! - colors are straight RGBA in [0, 1]

mod buffer;
mod layout;
mod vertex;

pub use buffer::{GeometryBuffer, GeometryError};
pub use layout::{LayoutError, VertexLayout};
pub use vertex::{Vertex, TRIANGLE};
