use super::{choose_alpha_mode, choose_surface_format, PresentError, PresentationSurface, SurfaceImage};
use crate::device::{DeviceContext, GpuInit, SystemCapability};

/// Swapchain surface bound to a host window.
///
/// The surface is created from the capability's instance before the device
/// exists, so adapter selection can require presentation support. Configuration
/// happens once; resizing is not handled.
pub struct WindowSurface<'w> {
    /// Surface lifetime is tied to the window via `'w`.
    surface: wgpu::Surface<'w>,

    /// Drawable size in physical pixels.
    size: (u32, u32),

    config: Option<wgpu::SurfaceConfiguration>,
}

impl<'w> WindowSurface<'w> {
    pub fn new(
        capability: &SystemCapability,
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::CreateSurfaceError> {
        let surface = capability.instance().create_surface(target)?;
        Ok(Self {
            surface,
            size: (width, height),
            config: None,
        })
    }
}

impl PresentationSurface for WindowSurface<'_> {
    fn compatible_surface(&self) -> Option<&wgpu::Surface<'_>> {
        Some(&self.surface)
    }

    fn configure(
        &mut self,
        ctx: &DeviceContext,
        init: &GpuInit,
    ) -> Result<wgpu::TextureFormat, PresentError> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(PresentError::ZeroSize { width, height });
        }

        let caps = self.surface.get_capabilities(ctx.adapter());
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(PresentError::NoSupportedFormat)?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        self.surface.configure(ctx.device(), &config);
        log::info!("surface configured: {format:?} {width}x{height}, alpha {alpha_mode:?}");

        self.config = Some(config);
        Ok(format)
    }

    fn acquire(&mut self) -> Result<SurfaceImage, PresentError> {
        if self.config.is_none() {
            return Err(PresentError::NotConfigured);
        }
        let frame = self.surface.get_current_texture()?;
        Ok(SurfaceImage::presentable(frame))
    }
}
