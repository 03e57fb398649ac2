//! Shader programs: WGSL source, reflection, and the compiled module.
//!
//! Source text is treated as opaque until it is handed to the compiler. The
//! reflected interface is what the pipeline checks the vertex layout against.

mod program;
mod reflect;
mod source;

pub use program::{ShaderCompileError, ShaderProgram};
pub use reflect::{reflect, ScalarClass, ShaderInterface, StageInput};
pub use source::{ShaderEntryPoints, ShaderSource};
