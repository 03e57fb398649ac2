use thiserror::Error;

use crate::shader::ScalarClass;

/// Mismatch between the shader, the vertex layout, and the output target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineLayoutError {
    #[error("pipeline targets {pipeline:?} but the surface is configured for {surface:?}")]
    FormatMismatch {
        pipeline: wgpu::TextureFormat,
        surface: wgpu::TextureFormat,
    },

    #[error("{0:?} is not a color format")]
    NotColorFormat(wgpu::TextureFormat),

    #[error("topology {0:?} needs an index format, which this pipeline does not configure")]
    UnsupportedTopology(wgpu::PrimitiveTopology),

    #[error("{0} entry point name is empty")]
    EmptyEntryPoint(&'static str),

    #[error("pipeline wants {stage} entry '{requested}' but the program exposes '{available}'")]
    EntryPointMismatch {
        stage: &'static str,
        requested: String,
        available: String,
    },

    #[error("shader reads location {0} but the vertex layout has no attribute there")]
    MissingAttribute(u32),

    #[error("location {location} is {format:?} in the layout but {shader:?} in the shader")]
    AttributeClass {
        location: u32,
        format: wgpu::VertexFormat,
        shader: ScalarClass,
    },

    #[error("vertex format {format:?} at location {location} is not supported")]
    UnsupportedFormat {
        location: u32,
        format: wgpu::VertexFormat,
    },

    #[error("fragment stage does not write color location 0")]
    MissingColorOutput,

    #[error("shader declares {0} resource bindings; an inferred layout cannot bind them")]
    ExternalResources(usize),

    #[error("device rejected pipeline '{label}': {diagnostic}")]
    Device { label: String, diagnostic: String },
}
