use thiserror::Error;

/// wgpu requires vertex strides and attribute offsets to be 4-byte aligned.
const VERTEX_ALIGNMENT: u64 = 4;

/// Per-vertex layout of one interleaved buffer.
///
/// Invariants, checked by [`VertexLayout::new`]:
/// - the stride is non-zero and 4-byte aligned
/// - every attribute location is unique
/// - every attribute lies inside the stride, and no two attributes overlap
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("vertex stride must be non-zero")]
    ZeroStride,

    #[error("vertex stride {0} is not a multiple of 4")]
    UnalignedStride(u64),

    #[error("attribute offset {offset} at location {location} is not a multiple of 4")]
    UnalignedOffset { location: u32, offset: u64 },

    #[error("shader location {0} is declared more than once")]
    DuplicateLocation(u32),

    #[error("attribute at location {location} ends at byte {end}, past stride {stride}")]
    OutsideStride { location: u32, end: u64, stride: u64 },

    #[error("attributes at locations {first} and {second} overlap")]
    Overlap { first: u32, second: u32 },

    #[error("attribute at location {location} ends past the addressable range (offset {offset})")]
    AttributeOverflow { location: u32, offset: u64 },

    #[error("{vertex_count} vertices of stride {stride} overflow a buffer size")]
    SizeOverflow { stride: u64, vertex_count: u32 },
}

impl VertexLayout {
    pub fn new(stride: u64, attributes: Vec<wgpu::VertexAttribute>) -> Result<Self, LayoutError> {
        let layout = Self::from_parts(stride, attributes);
        layout.check()?;
        Ok(layout)
    }

    pub(super) fn from_parts(stride: u64, attributes: Vec<wgpu::VertexAttribute>) -> Self {
        Self { stride, attributes }
    }

    pub(super) fn check(&self) -> Result<(), LayoutError> {
        if self.stride == 0 {
            return Err(LayoutError::ZeroStride);
        }
        if self.stride % VERTEX_ALIGNMENT != 0 {
            return Err(LayoutError::UnalignedStride(self.stride));
        }

        let mut spans: Vec<(u64, u64, u32)> = Vec::with_capacity(self.attributes.len());
        for a in &self.attributes {
            if a.offset % VERTEX_ALIGNMENT != 0 {
                return Err(LayoutError::UnalignedOffset {
                    location: a.shader_location,
                    offset: a.offset,
                });
            }
            let end = a.offset.checked_add(a.format.size()).ok_or(
                LayoutError::AttributeOverflow {
                    location: a.shader_location,
                    offset: a.offset,
                },
            )?;
            if end > self.stride {
                return Err(LayoutError::OutsideStride {
                    location: a.shader_location,
                    end,
                    stride: self.stride,
                });
            }
            spans.push((a.offset, end, a.shader_location));
        }

        spans.sort_unstable();
        for pair in spans.windows(2) {
            let (_, end, first) = pair[0];
            let (start, _, second) = pair[1];
            if start < end {
                return Err(LayoutError::Overlap { first, second });
            }
        }

        let mut locations: Vec<u32> = self.attributes.iter().map(|a| a.shader_location).collect();
        locations.sort_unstable();
        if let Some(dup) = locations.windows(2).find(|w| w[0] == w[1]) {
            return Err(LayoutError::DuplicateLocation(dup[0]));
        }

        Ok(())
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    /// Attribute bound to `location`, if any.
    pub fn attribute(&self, location: u32) -> Option<&wgpu::VertexAttribute> {
        self.attributes.iter().find(|a| a.shader_location == location)
    }

    /// Byte length of a buffer holding `vertex_count` vertices.
    pub fn buffer_size(&self, vertex_count: u32) -> Result<u64, LayoutError> {
        self.stride
            .checked_mul(u64::from(vertex_count))
            .ok_or(LayoutError::SizeOverflow {
                stride: self.stride,
                vertex_count,
            })
    }

    /// Number of whole vertices that fit in `byte_len` bytes.
    pub fn capacity(&self, byte_len: u64) -> u64 {
        byte_len / self.stride
    }

    pub fn to_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
