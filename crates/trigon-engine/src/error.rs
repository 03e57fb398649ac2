use thiserror::Error;

use crate::frame::{FrameError, PresentError};
use crate::geometry::GeometryError;
use crate::pipeline::PipelineLayoutError;
use crate::shader::ShaderCompileError;

/// Every way the bring-up sequence can stop.
///
/// None of these is retried. Each stage only allocates after its dependencies
/// succeeded, so an error never leaves a half-built stage behind.
#[derive(Debug, Error)]
pub enum BringupError {
    /// No adapter could be obtained from the capability.
    #[error("no compatible GPU capability: {0}")]
    CapabilityUnavailable(String),

    /// An adapter exists but refused to hand out a logical device.
    #[error("GPU device request failed: {0}")]
    NoCompatibleDevice(String),

    #[error(transparent)]
    ShaderCompile(#[from] ShaderCompileError),

    #[error(transparent)]
    PipelineLayout(#[from] PipelineLayoutError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Present(#[from] PresentError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl BringupError {
    /// True when the host should take its no-GPU fallback path instead of
    /// treating the failure as fatal.
    pub fn is_capability_absent(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_))
    }
}
