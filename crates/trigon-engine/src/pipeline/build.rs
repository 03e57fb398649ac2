use super::{PipelineDescriptor, PipelineLayoutError};
use crate::device::DeviceContext;
use crate::shader::{ScalarClass, ShaderInterface, ShaderProgram};

/// Immutable render pipeline; reusable for any number of draws.
#[derive(Debug)]
pub struct RenderPipeline {
    label: String,
    pipeline: wgpu::RenderPipeline,
    target_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
}

/// Checks `descriptor` against the reflected program and the surface format.
///
/// Order of checks: output format, entry points, vertex inputs, color output,
/// external resources. The first failure is returned.
pub fn validate(
    interface: &ShaderInterface,
    descriptor: &PipelineDescriptor,
    surface_format: wgpu::TextureFormat,
) -> Result<(), PipelineLayoutError> {
    if descriptor.target_format() != surface_format {
        return Err(PipelineLayoutError::FormatMismatch {
            pipeline: descriptor.target_format(),
            surface: surface_format,
        });
    }

    let wanted = descriptor.entry_points();
    let have = &interface.entry_points;
    if wanted.vertex != have.vertex {
        return Err(PipelineLayoutError::EntryPointMismatch {
            stage: "vertex",
            requested: wanted.vertex.clone(),
            available: have.vertex.clone(),
        });
    }
    if wanted.fragment != have.fragment {
        return Err(PipelineLayoutError::EntryPointMismatch {
            stage: "fragment",
            requested: wanted.fragment.clone(),
            available: have.fragment.clone(),
        });
    }

    let layout = descriptor.layout();
    for input in &interface.vertex_inputs {
        let attr = layout
            .attribute(input.location)
            .ok_or(PipelineLayoutError::MissingAttribute(input.location))?;
        let class = format_class(attr.format).ok_or(PipelineLayoutError::UnsupportedFormat {
            location: input.location,
            format: attr.format,
        })?;
        if class != input.class {
            return Err(PipelineLayoutError::AttributeClass {
                location: input.location,
                format: attr.format,
                shader: input.class,
            });
        }
    }

    if !interface.fragment_outputs.contains(&0) {
        return Err(PipelineLayoutError::MissingColorOutput);
    }

    if interface.resource_bindings > 0 {
        return Err(PipelineLayoutError::ExternalResources(interface.resource_bindings));
    }

    Ok(())
}

/// Numeric family vertex fetch produces for `format`.
///
/// Normalized formats read as floats. 64-bit floats have no WGSL counterpart.
fn format_class(format: wgpu::VertexFormat) -> Option<ScalarClass> {
    use wgpu::VertexFormat as F;
    match format {
        F::Float16x2
        | F::Float16x4
        | F::Float32
        | F::Float32x2
        | F::Float32x3
        | F::Float32x4
        | F::Unorm8x2
        | F::Unorm8x4
        | F::Snorm8x2
        | F::Snorm8x4
        | F::Unorm16x2
        | F::Unorm16x4
        | F::Snorm16x2
        | F::Snorm16x4 => Some(ScalarClass::Float),
        F::Uint8x2
        | F::Uint8x4
        | F::Uint16x2
        | F::Uint16x4
        | F::Uint32
        | F::Uint32x2
        | F::Uint32x3
        | F::Uint32x4 => Some(ScalarClass::Uint),
        F::Sint8x2
        | F::Sint8x4
        | F::Sint16x2
        | F::Sint16x4
        | F::Sint32
        | F::Sint32x2
        | F::Sint32x3
        | F::Sint32x4 => Some(ScalarClass::Sint),
        _ => None,
    }
}

impl RenderPipeline {
    /// Validates, then creates the pipeline.
    ///
    /// The bind group layout is inferred from the shader (`layout: None`); this
    /// is sound only because [`validate`] rejects modules with resources.
    /// Whatever the device rejects beyond [`validate`] (output types the target
    /// cannot hold, unmatched stage interfaces, device limits) is returned as
    /// [`PipelineLayoutError::Device`].
    pub fn build(
        ctx: &DeviceContext,
        program: &ShaderProgram,
        descriptor: &PipelineDescriptor,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineLayoutError> {
        validate(program.interface(), descriptor, surface_format)?;

        let buffers = [descriptor.layout().to_wgpu()];
        let entry_points = descriptor.entry_points();

        let descriptor_wgpu = wgpu::RenderPipelineDescriptor {
            label: Some(descriptor.label()),
            layout: None,

            vertex: wgpu::VertexState {
                module: program.module(),
                entry_point: Some(entry_points.vertex.as_str()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: program.module(),
                entry_point: Some(entry_points.fragment.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: descriptor.target_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: descriptor.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        };
        let pipeline = ctx
            .validated(|device| device.create_render_pipeline(&descriptor_wgpu))
            .map_err(|diagnostic| PipelineLayoutError::Device {
                label: descriptor.label().to_owned(),
                diagnostic,
            })?;
        log::debug!(
            "built '{}' for {:?}",
            descriptor.label(),
            descriptor.target_format()
        );

        Ok(Self {
            label: descriptor.label().to_owned(),
            pipeline,
            target_format: descriptor.target_format(),
            topology: descriptor.topology(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::headless_context;
    use crate::geometry::{Vertex, VertexLayout};
    use crate::shader::{reflect, ShaderEntryPoints, ShaderSource, StageInput};

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn triangle_interface() -> ShaderInterface {
        reflect(&ShaderSource::triangle(), &ShaderEntryPoints::default()).unwrap()
    }

    fn descriptor_with(layout: VertexLayout) -> PipelineDescriptor {
        PipelineDescriptor::new(
            "test",
            ShaderEntryPoints::default(),
            layout,
            wgpu::PrimitiveTopology::TriangleList,
            FORMAT,
        )
        .unwrap()
    }

    // ── validate ──────────────────────────────────────────────────────────

    #[test]
    fn matching_format_passes() {
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        assert_eq!(validate(&triangle_interface(), &desc, FORMAT), Ok(()));
    }

    #[test]
    fn format_mismatch_fails() {
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        let err = validate(&triangle_interface(), &desc, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(
            err,
            Err(PipelineLayoutError::FormatMismatch {
                pipeline: FORMAT,
                surface: wgpu::TextureFormat::Bgra8Unorm
            })
        );
    }

    #[test]
    fn missing_color_attribute_fails() {
        let layout = VertexLayout::new(
            12,
            vec![wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        )
        .unwrap();
        let err = validate(&triangle_interface(), &descriptor_with(layout), FORMAT);
        assert_eq!(err, Err(PipelineLayoutError::MissingAttribute(1)));
    }

    #[test]
    fn integer_attribute_for_float_input_fails() {
        let layout = VertexLayout::new(
            28,
            vec![
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Uint32x4,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        )
        .unwrap();
        let err = validate(&triangle_interface(), &descriptor_with(layout), FORMAT);
        assert_eq!(
            err,
            Err(PipelineLayoutError::AttributeClass {
                location: 1,
                format: wgpu::VertexFormat::Uint32x4,
                shader: ScalarClass::Float
            })
        );
    }

    #[test]
    fn renamed_entry_point_fails() {
        let names = ShaderEntryPoints {
            fragment: "fs_main".into(),
            ..Default::default()
        };
        let desc = PipelineDescriptor::new(
            "renamed",
            names,
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            FORMAT,
        )
        .unwrap();
        let err = validate(&triangle_interface(), &desc, FORMAT).unwrap_err();
        assert!(matches!(
            err,
            PipelineLayoutError::EntryPointMismatch { stage: "fragment", .. }
        ));
    }

    #[test]
    fn shader_resources_fail() {
        let mut iface = triangle_interface();
        iface.resource_bindings = 1;
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        assert_eq!(
            validate(&iface, &desc, FORMAT),
            Err(PipelineLayoutError::ExternalResources(1))
        );
    }

    #[test]
    fn fragment_without_location_zero_fails() {
        let mut iface = triangle_interface();
        iface.fragment_outputs = vec![1];
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        assert_eq!(
            validate(&iface, &desc, FORMAT),
            Err(PipelineLayoutError::MissingColorOutput)
        );
    }

    #[test]
    fn extra_layout_attributes_are_allowed() {
        let mut iface = triangle_interface();
        iface.vertex_inputs = vec![StageInput {
            location: 0,
            class: ScalarClass::Float,
        }];
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        assert_eq!(validate(&iface, &desc, FORMAT), Ok(()));
    }

    #[test]
    fn normalized_formats_read_as_float() {
        assert_eq!(format_class(wgpu::VertexFormat::Unorm8x4), Some(ScalarClass::Float));
        assert_eq!(format_class(wgpu::VertexFormat::Sint16x2), Some(ScalarClass::Sint));
        assert_eq!(format_class(wgpu::VertexFormat::Float64x2), None);
    }

    // ── build ─────────────────────────────────────────────────────────────

    #[test]
    fn builds_on_headless_device() {
        let ctx = headless_context();
        let program =
            ShaderProgram::compile(&ctx, &ShaderSource::triangle(), &ShaderEntryPoints::default())
                .unwrap();
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        let pipeline = RenderPipeline::build(&ctx, &program, &desc, FORMAT).unwrap();
        assert_eq!(pipeline.target_format(), FORMAT);
        assert_eq!(pipeline.topology(), wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn build_refuses_surface_mismatch() {
        let ctx = headless_context();
        let program =
            ShaderProgram::compile(&ctx, &ShaderSource::triangle(), &ShaderEntryPoints::default())
                .unwrap();
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();
        let err = RenderPipeline::build(&ctx, &program, &desc, wgpu::TextureFormat::Bgra8UnormSrgb)
            .unwrap_err();
        assert!(matches!(err, PipelineLayoutError::FormatMismatch { .. }));
    }

    const INTEGER_OUTPUT: &str = r#"
        struct VertexOut {
          @builtin(position) position: vec4<f32>,
          @location(0) color: vec4<f32>,
        };
        @vertex
        fn vertex_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VertexOut {
          var out: VertexOut;
          out.position = vec4<f32>(position, 1.0);
          out.color = color;
          return out;
        }
        @fragment
        fn fragment_main(in: VertexOut) -> @location(0) vec4<i32> {
          return vec4<i32>(in.color);
        }
    "#;

    #[test]
    fn integer_output_into_float_target_is_an_error() {
        let ctx = headless_context();
        let source = ShaderSource::wgsl("integer output", INTEGER_OUTPUT);
        let program = ShaderProgram::compile(&ctx, &source, &ShaderEntryPoints::default()).unwrap();
        let desc = PipelineDescriptor::triangle(FORMAT).unwrap();

        let err = RenderPipeline::build(&ctx, &program, &desc, FORMAT).unwrap_err();
        match err {
            PipelineLayoutError::Device { label, diagnostic } => {
                assert_eq!(label, "trigon triangle pipeline");
                assert!(!diagnostic.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stride_over_device_limit_is_an_error() {
        let ctx = headless_context();
        let program =
            ShaderProgram::compile(&ctx, &ShaderSource::triangle(), &ShaderEntryPoints::default())
                .unwrap();
        let stride = u64::from(ctx.device().limits().max_vertex_buffer_array_stride) + 4;
        let layout = VertexLayout::new(stride, Vertex::layout().attributes().to_vec()).unwrap();

        let err = RenderPipeline::build(&ctx, &program, &descriptor_with(layout), FORMAT).unwrap_err();
        assert!(matches!(err, PipelineLayoutError::Device { .. }));
    }
}
