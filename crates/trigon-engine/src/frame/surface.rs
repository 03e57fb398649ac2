use thiserror::Error;

use crate::device::{DeviceContext, GpuInit};

/// The drawable the host hands to the renderer.
///
/// Implementations bind themselves to the device in [`configure`] and yield
/// one image per [`acquire`].
///
/// [`configure`]: PresentationSurface::configure
/// [`acquire`]: PresentationSurface::acquire
pub trait PresentationSurface {
    /// Surface the adapter must be able to present to, if any.
    fn compatible_surface(&self) -> Option<&wgpu::Surface<'_>> {
        None
    }

    /// Binds the surface to `ctx` and returns the color format it renders in.
    fn configure(
        &mut self,
        ctx: &DeviceContext,
        init: &GpuInit,
    ) -> Result<wgpu::TextureFormat, PresentError>;

    /// Yields the current image to draw into.
    fn acquire(&mut self) -> Result<SurfaceImage, PresentError>;
}

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("surface reports no supported formats for this adapter")]
    NoSupportedFormat,

    #[error("surface has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("surface was used before it was configured")]
    NotConfigured,

    #[error("failed to acquire surface image: {0}")]
    Acquire(#[from] wgpu::SurfaceError),
}

/// One acquired image.
///
/// Holding a swapchain image blocks acquisition of the next one; present or drop
/// it promptly.
pub struct SurfaceImage {
    view: wgpu::TextureView,
    frame: Option<wgpu::SurfaceTexture>,
}

impl SurfaceImage {
    pub fn presentable(frame: wgpu::SurfaceTexture) -> Self {
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            view,
            frame: Some(frame),
        }
    }

    pub fn offscreen(view: wgpu::TextureView) -> Self {
        Self { view, frame: None }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Presents swapchain images; offscreen images are simply released.
    pub fn present(self) {
        let Self { view, frame } = self;
        drop(view);
        if let Some(frame) = frame {
            frame.present();
        }
    }
}

/// Picks the surface format.
///
/// The first reported format is the surface's preferred one. With `prefer_srgb`
/// an sRGB variant wins when offered.
pub fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

/// Picks the compositing mode, falling back to the first supported one.
pub fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    if let Some(mode) = requested.filter(|m| supported.contains(m)) {
        return mode;
    }
    let fallback = supported
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
    if let Some(mode) = requested {
        log::warn!("alpha mode {mode:?} unsupported by surface; using {fallback:?}");
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::CompositeAlphaMode as Alpha;
    use wgpu::TextureFormat as Tf;

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn first_format_is_preferred() {
        let formats = [Tf::Bgra8Unorm, Tf::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, false), Some(Tf::Bgra8Unorm));
    }

    #[test]
    fn srgb_wins_when_requested() {
        let formats = [Tf::Bgra8Unorm, Tf::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(Tf::Rgba8UnormSrgb));
    }

    #[test]
    fn srgb_request_falls_back_to_first() {
        let formats = [Tf::Rgba16Float, Tf::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, true), Some(Tf::Rgba16Float));
    }

    #[test]
    fn no_formats_means_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    // ── alpha ─────────────────────────────────────────────────────────────

    #[test]
    fn supported_alpha_request_is_kept() {
        let modes = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(choose_alpha_mode(&modes, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
    }

    #[test]
    fn unsupported_alpha_request_falls_back() {
        let modes = [Alpha::Opaque];
        assert_eq!(choose_alpha_mode(&modes, Some(Alpha::PreMultiplied)), Alpha::Opaque);
    }

    #[test]
    fn no_alpha_modes_means_auto() {
        assert_eq!(choose_alpha_mode(&[], None), Alpha::Auto);
    }
}
