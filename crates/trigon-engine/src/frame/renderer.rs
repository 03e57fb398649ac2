use thiserror::Error;

use super::{Command, CommandSequence, PresentError, PresentationSurface};
use crate::device::DeviceContext;
use crate::geometry::GeometryBuffer;
use crate::pipeline::RenderPipeline;

/// Dark blue.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.2,
    a: 1.0,
};

/// Records and submits the single frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameRenderer {
    clear: wgpu::Color,
}

/// What one `render_once` did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub commands: CommandSequence,
    /// Journal index of the submit on the device queue.
    pub submission: u64,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("vertex buffer '{0}' was never uploaded")]
    NotUploaded(String),

    #[error("draw of {vertices} vertices exceeds buffer capacity of {capacity}")]
    DrawExceedsBuffer { vertices: u32, capacity: u64 },

    #[error("'{0}' recorded outside a render pass")]
    OutsidePass(&'static str),

    #[error("'{0}' recorded after the frame was submitted")]
    AfterSubmit(&'static str),

    #[error("command sequence ended without a submit")]
    NotSubmitted,

    #[error(transparent)]
    Present(#[from] PresentError),
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(CLEAR_COLOR)
    }
}

impl FrameRenderer {
    pub fn new(clear: wgpu::Color) -> Self {
        Self { clear }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear
    }

    /// Plans the frame: one pass, one non-indexed draw of every vertex in
    /// `buffer`, one instance, then a submit.
    pub fn plan(&self, buffer: &GeometryBuffer) -> Result<CommandSequence, FrameError> {
        if !buffer.is_uploaded() {
            return Err(FrameError::NotUploaded(buffer.label().to_owned()));
        }

        let vertices = buffer.vertex_count();
        if u64::from(vertices) > buffer.capacity() {
            return Err(FrameError::DrawExceedsBuffer {
                vertices,
                capacity: buffer.capacity(),
            });
        }

        let mut seq = CommandSequence::new();
        seq.push(Command::BeginPass { clear: self.clear });
        seq.push(Command::SetPipeline);
        seq.push(Command::SetVertexBuffer { slot: 0 });
        seq.push(Command::Draw {
            vertices: 0..vertices,
            instances: 0..1,
        });
        seq.push(Command::EndPass);
        seq.push(Command::Submit);
        Ok(seq)
    }

    /// Acquires the surface image, encodes the planned frame and submits it.
    ///
    /// Recording is immediate; GPU execution is not awaited.
    pub fn render_once<S: PresentationSurface + ?Sized>(
        &self,
        ctx: &DeviceContext,
        surface: &mut S,
        pipeline: &RenderPipeline,
        buffer: &GeometryBuffer,
    ) -> Result<FrameReport, FrameError> {
        let commands = self.plan(buffer)?;
        let image = surface.acquire()?;

        let submission = encode(ctx, &commands, image.view(), pipeline, buffer)?;
        image.present();
        log::info!("frame submitted (queue #{submission}, {} commands)", commands.len());

        Ok(FrameReport {
            commands,
            submission,
        })
    }
}

/// Replays `commands` onto a fresh encoder targeting `view`.
fn encode(
    ctx: &DeviceContext,
    commands: &CommandSequence,
    view: &wgpu::TextureView,
    pipeline: &RenderPipeline,
    buffer: &GeometryBuffer,
) -> Result<u64, FrameError> {
    let mut encoder = Some(
        ctx.device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon frame encoder"),
            }),
    );
    let mut pass: Option<wgpu::RenderPass<'static>> = None;
    let mut submitted = None;

    for command in commands {
        match command {
            Command::BeginPass { clear } => {
                let encoder = encoder.as_mut().ok_or(FrameError::AfterSubmit("begin pass"))?;
                let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("trigon triangle pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(*clear),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
                // The pass must end before `finish`; EndPass drops it.
                pass = Some(rpass.forget_lifetime());
            }
            Command::SetPipeline => {
                active(&mut pass, "set pipeline")?.set_pipeline(pipeline.raw());
            }
            Command::SetVertexBuffer { slot } => {
                active(&mut pass, "set vertex buffer")?.set_vertex_buffer(*slot, buffer.slice());
            }
            Command::Draw {
                vertices,
                instances,
            } => {
                active(&mut pass, "draw")?.draw(vertices.clone(), instances.clone());
            }
            Command::EndPass => {
                if pass.take().is_none() {
                    return Err(FrameError::OutsidePass("end pass"));
                }
            }
            Command::Submit => {
                if pass.is_some() {
                    return Err(FrameError::OutsidePass("submit"));
                }
                let encoder = encoder.take().ok_or(FrameError::AfterSubmit("submit"))?;
                submitted = Some(ctx.queue().submit("trigon frame", encoder.finish()));
            }
        }
    }

    submitted.ok_or(FrameError::NotSubmitted)
}

fn active<'p>(
    pass: &'p mut Option<wgpu::RenderPass<'static>>,
    what: &'static str,
) -> Result<&'p mut wgpu::RenderPass<'static>, FrameError> {
    pass.as_mut().ok_or(FrameError::OutsidePass(what))
}
