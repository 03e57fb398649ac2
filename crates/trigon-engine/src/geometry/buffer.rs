use bytemuck::Pod;
use thiserror::Error;

use super::{LayoutError, VertexLayout};
use crate::device::{DeviceContext, SubmissionQueue};

/// Fixed-size vertex buffer in device memory.
///
/// The byte length is `stride * vertex_count`, fixed at allocation. Contents are
/// written exactly once through the submission queue, before any pass reads them.
pub struct GeometryBuffer {
    label: String,
    buffer: wgpu::Buffer,
    layout: VertexLayout,
    vertex_count: u32,
    uploaded: bool,
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("vertex buffer must hold at least one vertex")]
    NoVertices,

    #[error("upload to '{0}' carries no data")]
    EmptyWrite(String),

    #[error("vertex data was already uploaded to '{0}'")]
    AlreadyUploaded(String),

    #[error("write of {size} bytes at offset {offset} exceeds buffer of {capacity} bytes")]
    OutOfBounds { offset: u64, size: u64, capacity: u64 },

    #[error("write offset {offset} and size {size} must be multiples of {align}")]
    Misaligned { offset: u64, size: u64, align: u64 },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl GeometryBuffer {
    /// Allocates room for `vertex_count` vertices of `layout`.
    ///
    /// Usage is `VERTEX | COPY_DST`; the buffer is never resized.
    pub fn allocate(
        ctx: &DeviceContext,
        label: &str,
        layout: VertexLayout,
        vertex_count: u32,
    ) -> Result<Self, GeometryError> {
        if vertex_count == 0 {
            return Err(GeometryError::NoVertices);
        }

        let size = layout.buffer_size(vertex_count)?;
        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        log::debug!("allocated '{label}': {vertex_count} vertices, {size} bytes");

        Ok(Self {
            label: label.to_owned(),
            buffer,
            layout,
            vertex_count,
            uploaded: false,
        })
    }

    /// Enqueues the one and only write of `data` at `byte_offset`.
    ///
    /// No fence is needed: the queue runs the write before any later submit.
    pub fn upload<T: Pod>(
        &mut self,
        queue: &SubmissionQueue,
        data: &[T],
        byte_offset: u64,
    ) -> Result<(), GeometryError> {
        if self.uploaded {
            return Err(GeometryError::AlreadyUploaded(self.label.clone()));
        }

        let bytes: &[u8] = bytemuck::cast_slice(data);
        let size = bytes.len() as u64;
        if size == 0 {
            return Err(GeometryError::EmptyWrite(self.label.clone()));
        }

        let align = wgpu::COPY_BUFFER_ALIGNMENT;
        if byte_offset % align != 0 || size % align != 0 {
            return Err(GeometryError::Misaligned {
                offset: byte_offset,
                size,
                align,
            });
        }

        let capacity = self.byte_len();
        if byte_offset.checked_add(size).is_none_or(|end| end > capacity) {
            return Err(GeometryError::OutOfBounds {
                offset: byte_offset,
                size,
                capacity,
            });
        }

        queue.write_buffer(&self.label, &self.buffer, byte_offset, bytes);
        self.uploaded = true;
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Allocated size in bytes.
    pub fn byte_len(&self) -> u64 {
        self.buffer.size()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Whole vertices the allocation can hold.
    pub fn capacity(&self) -> u64 {
        self.layout.capacity(self.byte_len())
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}
