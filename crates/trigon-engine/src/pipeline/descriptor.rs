use super::PipelineLayoutError;
use crate::geometry::{Vertex, VertexLayout};
use crate::shader::ShaderEntryPoints;

/// Everything a render pipeline is built from.
///
/// Fields are checked once in [`PipelineDescriptor::new`] and immutable after.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDescriptor {
    label: String,
    entry_points: ShaderEntryPoints,
    layout: VertexLayout,
    topology: wgpu::PrimitiveTopology,
    target_format: wgpu::TextureFormat,
}

impl PipelineDescriptor {
    pub fn new(
        label: impl Into<String>,
        entry_points: ShaderEntryPoints,
        layout: VertexLayout,
        topology: wgpu::PrimitiveTopology,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineLayoutError> {
        if entry_points.vertex.is_empty() {
            return Err(PipelineLayoutError::EmptyEntryPoint("vertex"));
        }
        if entry_points.fragment.is_empty() {
            return Err(PipelineLayoutError::EmptyEntryPoint("fragment"));
        }
        if topology.is_strip() {
            return Err(PipelineLayoutError::UnsupportedTopology(topology));
        }
        if !is_color_renderable(target_format) {
            return Err(PipelineLayoutError::NotColorFormat(target_format));
        }

        Ok(Self {
            label: label.into(),
            entry_points,
            layout,
            topology,
            target_format,
        })
    }

    /// Triangle list over [`Vertex`] with the default entry points.
    pub fn triangle(target_format: wgpu::TextureFormat) -> Result<Self, PipelineLayoutError> {
        Self::new(
            "trigon triangle pipeline",
            ShaderEntryPoints::default(),
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            target_format,
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entry_points(&self) -> &ShaderEntryPoints {
        &self.entry_points
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }
}

/// Color formats every device can render to without optional features.
fn is_color_renderable(format: wgpu::TextureFormat) -> bool {
    !format.is_depth_stencil_format()
        && !format.is_compressed()
        && format
            .guaranteed_format_features(wgpu::Features::empty())
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_descriptor_is_a_triangle_list() {
        let desc = PipelineDescriptor::triangle(wgpu::TextureFormat::Bgra8Unorm).unwrap();
        assert_eq!(desc.topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(desc.layout().stride(), 28);
        assert_eq!(desc.target_format(), wgpu::TextureFormat::Bgra8Unorm);
    }

    #[test]
    fn rejects_depth_target() {
        let err = PipelineDescriptor::triangle(wgpu::TextureFormat::Depth32Float).unwrap_err();
        assert_eq!(
            err,
            PipelineLayoutError::NotColorFormat(wgpu::TextureFormat::Depth32Float)
        );
    }

    #[test]
    fn rejects_compressed_target() {
        let err = PipelineDescriptor::triangle(wgpu::TextureFormat::Bc1RgbaUnorm).unwrap_err();
        assert_eq!(
            err,
            PipelineLayoutError::NotColorFormat(wgpu::TextureFormat::Bc1RgbaUnorm)
        );
    }

    #[test]
    fn rejects_sample_only_target() {
        let err = PipelineDescriptor::triangle(wgpu::TextureFormat::Rgb9e5Ufloat).unwrap_err();
        assert_eq!(
            err,
            PipelineLayoutError::NotColorFormat(wgpu::TextureFormat::Rgb9e5Ufloat)
        );
    }

    #[test]
    fn accepts_common_surface_formats() {
        for format in [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Rgba16Float,
        ] {
            assert!(PipelineDescriptor::triangle(format).is_ok(), "{format:?}");
        }
    }

    #[test]
    fn rejects_strip_topology() {
        let err = PipelineDescriptor::new(
            "strip",
            ShaderEntryPoints::default(),
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleStrip,
            wgpu::TextureFormat::Rgba8Unorm,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PipelineLayoutError::UnsupportedTopology(wgpu::PrimitiveTopology::TriangleStrip)
        );
    }

    #[test]
    fn rejects_empty_entry_name() {
        let names = ShaderEntryPoints {
            vertex: String::new(),
            ..Default::default()
        };
        let err = PipelineDescriptor::new(
            "nameless",
            names,
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::TextureFormat::Rgba8Unorm,
        )
        .unwrap_err();
        assert_eq!(err, PipelineLayoutError::EmptyEntryPoint("vertex"));
    }
}
