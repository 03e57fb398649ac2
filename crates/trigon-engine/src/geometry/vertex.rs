use bytemuck::{Pod, Zeroable};

use super::VertexLayout;

/// Interleaved vertex: clip-space position followed by RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Layout matching the `#[repr(C)]` field order.
    pub fn layout() -> VertexLayout {
        let layout = VertexLayout::from_parts(
            std::mem::size_of::<Vertex>() as u64,
            Self::ATTRS.to_vec(),
        );
        debug_assert!(layout.check().is_ok(), "Vertex layout is valid by construction");
        layout
    }
}

/// Apex red, bottom-left green, bottom-right blue.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new([0.0, 1.0, 1.0], [1.0, 0.0, 0.0, 1.0]),
    Vertex::new([-1.0, -1.0, 1.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::new([1.0, -1.0, 1.0], [0.0, 0.0, 1.0, 1.0]),
];
