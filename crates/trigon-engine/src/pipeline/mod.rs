//! Render pipeline construction.
//!
//! A descriptor is validated when it is built, then validated again against the
//! compiled program and the surface before any GPU object is created.

mod build;
mod descriptor;
mod error;

pub use build::{validate, RenderPipeline};
pub use descriptor::PipelineDescriptor;
pub use error::PipelineLayoutError;
