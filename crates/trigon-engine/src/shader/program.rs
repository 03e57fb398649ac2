use thiserror::Error;

use super::{reflect, ShaderEntryPoints, ShaderInterface, ShaderSource};
use crate::device::DeviceContext;

/// A compiled module exposing a vertex and a fragment entry point.
pub struct ShaderProgram {
    label: String,
    module: wgpu::ShaderModule,
    interface: ShaderInterface,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderCompileError {
    #[error("shader '{label}' failed to parse:\n{diagnostic}")]
    Parse { label: String, diagnostic: String },

    #[error("shader '{label}' failed validation: {diagnostic}")]
    Validation { label: String, diagnostic: String },

    #[error("shader '{label}' has no {stage} entry point named '{name}'")]
    MissingEntryPoint {
        label: String,
        name: String,
        stage: &'static str,
    },
}

impl ShaderCompileError {
    /// Compiler output, when the compiler produced any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Parse { diagnostic, .. } | Self::Validation { diagnostic, .. } => {
                Some(diagnostic)
            }
            Self::MissingEntryPoint { .. } => None,
        }
    }
}

impl ShaderProgram {
    /// Compiles `source` in one step for both stages.
    ///
    /// The source is checked and reflected before the device sees it, so a bad
    /// program never produces a module. Anything the device still refuses comes
    /// back as [`ShaderCompileError::Validation`].
    pub fn compile(
        ctx: &DeviceContext,
        source: &ShaderSource,
        entry_points: &ShaderEntryPoints,
    ) -> Result<Self, ShaderCompileError> {
        let interface = reflect(source, entry_points)?;

        let module = ctx
            .validated(|device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(source.label()),
                    source: wgpu::ShaderSource::Wgsl(source.code().into()),
                })
            })
            .map_err(|diagnostic| ShaderCompileError::Validation {
                label: source.label().to_owned(),
                diagnostic,
            })?;
        log::debug!(
            "compiled '{}': {} vertex inputs, {} fragment outputs",
            source.label(),
            interface.vertex_inputs.len(),
            interface.fragment_outputs.len()
        );

        Ok(Self {
            label: source.label().to_owned(),
            module,
            interface,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn interface(&self) -> &ShaderInterface {
        &self.interface
    }

    pub fn entry_points(&self) -> &ShaderEntryPoints {
        &self.interface.entry_points
    }
}
