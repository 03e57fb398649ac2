//! The one-shot bring-up sequence.
//!
//! Stages run strictly in dependency order:
//! device → surface → shader → geometry → pipeline → frame.
//! A failing stage stops the sequence before anything downstream is created.

use crate::device::{Capability, DeviceContext, GpuInit};
use crate::error::BringupError;
use crate::frame::{FrameRenderer, FrameReport, PresentationSurface};
use crate::geometry::{GeometryBuffer, Vertex, TRIANGLE};
use crate::pipeline::{PipelineDescriptor, RenderPipeline};
use crate::shader::{ShaderEntryPoints, ShaderProgram, ShaderSource};

/// Everything the sequence built. Kept alive for the rest of the process.
pub struct Bringup {
    context: DeviceContext,
    format: wgpu::TextureFormat,
    program: ShaderProgram,
    geometry: GeometryBuffer,
    pipeline: RenderPipeline,
    report: FrameReport,
}

impl Bringup {
    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    /// Format the surface was configured with.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn geometry(&self) -> &GeometryBuffer {
        &self.geometry
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn report(&self) -> &FrameReport {
        &self.report
    }
}

/// Brings up a device on `capability`, draws the triangle once into `surface`
/// and returns the live resources.
pub async fn bring_up<C, S>(
    capability: &C,
    surface: &mut S,
    init: &GpuInit,
) -> Result<Bringup, BringupError>
where
    C: Capability,
    S: PresentationSurface + ?Sized,
{
    bring_up_with(capability, surface, init, &ShaderSource::triangle()).await
}

/// [`bring_up`] with a caller-supplied shader program.
///
/// The program must expose `vertex_main` / `fragment_main` and accept the
/// [`Vertex`] layout.
pub async fn bring_up_with<C, S>(
    capability: &C,
    surface: &mut S,
    init: &GpuInit,
    source: &ShaderSource,
) -> Result<Bringup, BringupError>
where
    C: Capability,
    S: PresentationSurface + ?Sized,
{
    let context = DeviceContext::acquire(capability, surface.compatible_surface(), init).await?;
    let format = surface.configure(&context, init)?;

    let program = ShaderProgram::compile(&context, source, &ShaderEntryPoints::default())?;

    let mut geometry =
        GeometryBuffer::allocate(&context, "trigon triangle vertices", Vertex::layout(), 3)?;
    geometry.upload(context.queue(), &TRIANGLE, 0)?;

    let descriptor = PipelineDescriptor::triangle(format)?;
    let pipeline = RenderPipeline::build(&context, &program, &descriptor, format)?;

    let report = FrameRenderer::default().render_once(&context, surface, &pipeline, &geometry)?;
    log::info!("bring-up complete ({format:?})");

    Ok(Bringup {
        context,
        format,
        program,
        geometry,
        pipeline,
        report,
    })
}
