//! Trigon engine crate.
//!
//! One-shot GPU bring-up: acquire a device, compile the triangle program,
//! upload its vertices, build the pipeline and submit a single frame.

pub mod bringup;
pub mod device;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod shader;

pub use bringup::{bring_up, bring_up_with, Bringup};
pub use error::BringupError;
