use naga::{Binding, ScalarKind, ShaderStage, TypeInner};

use super::{ShaderCompileError, ShaderEntryPoints, ShaderSource};

/// Numeric family of a stage input, as far as vertex fetch cares.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScalarClass {
    Float,
    Sint,
    Uint,
    Other,
}

/// One `@location` input of the vertex stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StageInput {
    pub location: u32,
    pub class: ScalarClass,
}

/// What the pipeline needs to know about a compiled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderInterface {
    pub entry_points: ShaderEntryPoints,
    /// Sorted by location.
    pub vertex_inputs: Vec<StageInput>,
    /// Sorted `@location` outputs of the fragment stage.
    pub fragment_outputs: Vec<u32>,
    /// Uniforms, storage buffers, textures and samplers declared by the module.
    pub resource_bindings: usize,
}

/// Parses and validates `source`, then reflects the two entry points.
///
/// Pure CPU work; no device is involved. Every failure carries the compiler's
/// diagnostic text.
pub fn reflect(
    source: &ShaderSource,
    entry_points: &ShaderEntryPoints,
) -> Result<ShaderInterface, ShaderCompileError> {
    let module = naga::front::wgsl::parse_str(source.code()).map_err(|e| {
        ShaderCompileError::Parse {
            label: source.label().to_owned(),
            diagnostic: e.emit_to_string(source.code()),
        }
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| ShaderCompileError::Validation {
        label: source.label().to_owned(),
        diagnostic: describe(&e.into_inner()),
    })?;

    let vertex = find_entry(&module, source, &entry_points.vertex, ShaderStage::Vertex)?;
    let fragment = find_entry(&module, source, &entry_points.fragment, ShaderStage::Fragment)?;

    let mut vertex_inputs = Vec::new();
    for arg in &vertex.function.arguments {
        collect_locations(&module, arg.ty, arg.binding.as_ref(), &mut vertex_inputs);
    }
    vertex_inputs.sort_by_key(|i| i.location);

    let mut outputs = Vec::new();
    if let Some(result) = &fragment.function.result {
        collect_locations(&module, result.ty, result.binding.as_ref(), &mut outputs);
    }
    let mut fragment_outputs: Vec<u32> = outputs.iter().map(|o| o.location).collect();
    fragment_outputs.sort_unstable();

    let resource_bindings = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.binding.is_some())
        .count();

    Ok(ShaderInterface {
        entry_points: entry_points.clone(),
        vertex_inputs,
        fragment_outputs,
        resource_bindings,
    })
}

fn find_entry<'m>(
    module: &'m naga::Module,
    source: &ShaderSource,
    name: &str,
    stage: ShaderStage,
) -> Result<&'m naga::EntryPoint, ShaderCompileError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| ShaderCompileError::MissingEntryPoint {
            label: source.label().to_owned(),
            name: name.to_owned(),
            stage: if stage == ShaderStage::Vertex { "vertex" } else { "fragment" },
        })
}

/// Walks a binding, descending into struct members that carry their own bindings.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<StageInput>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => {
            if let Some(class) = class_of_type(inner) {
                out.push(StageInput {
                    location: *location,
                    class,
                });
            }
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn class_of_type(inner: &TypeInner) -> Option<ScalarClass> {
    match *inner {
        TypeInner::Scalar(scalar) | TypeInner::Vector { scalar, .. } => Some(class_of(scalar.kind)),
        _ => None,
    }
}

fn class_of(kind: ScalarKind) -> ScalarClass {
    match kind {
        ScalarKind::Float | ScalarKind::AbstractFloat => ScalarClass::Float,
        ScalarKind::Sint | ScalarKind::AbstractInt => ScalarClass::Sint,
        ScalarKind::Uint => ScalarClass::Uint,
        _ => ScalarClass::Other,
    }
}

/// Flattens an error and its sources into one line.
fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
