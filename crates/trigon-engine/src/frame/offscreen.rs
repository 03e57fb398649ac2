use super::{PresentError, PresentationSurface, SurfaceImage};
use crate::device::{DeviceContext, GpuInit};

/// Render target backed by a plain texture instead of a window.
///
/// The texture is created on `configure` with `COPY_SRC` so its contents can be
/// read back.
pub struct OffscreenTarget {
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    texture: Option<wgpu::Texture>,
}

impl OffscreenTarget {
    pub fn new(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            texture: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// The backing texture, once configured.
    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.texture.as_ref()
    }
}

impl PresentationSurface for OffscreenTarget {
    fn configure(
        &mut self,
        ctx: &DeviceContext,
        _init: &GpuInit,
    ) -> Result<wgpu::TextureFormat, PresentError> {
        if self.width == 0 || self.height == 0 {
            return Err(PresentError::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }

        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon offscreen target"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        log::debug!(
            "offscreen target {:?} {}x{}",
            self.format,
            self.width,
            self.height
        );

        self.texture = Some(texture);
        Ok(self.format)
    }

    fn acquire(&mut self) -> Result<SurfaceImage, PresentError> {
        let texture = self.texture.as_ref().ok_or(PresentError::NotConfigured)?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(SurfaceImage::offscreen(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::headless_context;

    #[test]
    fn acquire_before_configure_fails() {
        let mut target = OffscreenTarget::new(4, 4, wgpu::TextureFormat::Rgba8Unorm);
        assert!(matches!(target.acquire(), Err(PresentError::NotConfigured)));
    }

    #[test]
    fn zero_size_is_rejected() {
        let ctx = headless_context();
        let mut target = OffscreenTarget::new(0, 4, wgpu::TextureFormat::Rgba8Unorm);
        let err = target.configure(&ctx, &GpuInit::default()).unwrap_err();
        assert!(matches!(err, PresentError::ZeroSize { width: 0, height: 4 }));
    }

    #[test]
    fn configure_reports_requested_format() {
        let ctx = headless_context();
        let mut target = OffscreenTarget::new(8, 8, wgpu::TextureFormat::Bgra8Unorm);
        let format = target.configure(&ctx, &GpuInit::default()).unwrap();
        assert_eq!(format, wgpu::TextureFormat::Bgra8Unorm);
        assert!(target.texture().is_some());
        assert!(target.acquire().is_ok());
    }
}
