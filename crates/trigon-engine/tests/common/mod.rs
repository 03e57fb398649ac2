#![allow(dead_code)]

use std::cell::Cell;
use std::future::Future;

use trigon_engine::device::{Capability, DeviceContext, GpuInit};
use trigon_engine::frame::{OffscreenTarget, PresentError, PresentationSurface, SurfaceImage};
use trigon_engine::BringupError;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Capability that always fails with the error `make` builds.
pub struct FailingCapability {
    pub make: fn() -> BringupError,
    pub calls: Cell<u32>,
}

impl FailingCapability {
    pub fn unavailable() -> Self {
        Self {
            make: || BringupError::CapabilityUnavailable("no adapter in this test".into()),
            calls: Cell::new(0),
        }
    }

    pub fn no_device() -> Self {
        Self {
            make: || BringupError::NoCompatibleDevice("device refused in this test".into()),
            calls: Cell::new(0),
        }
    }
}

impl Capability for FailingCapability {
    fn request_adapter(
        &self,
        _options: &wgpu::RequestAdapterOptions<'_, '_>,
    ) -> impl Future<Output = Result<wgpu::Adapter, BringupError>> {
        self.calls.set(self.calls.get() + 1);
        let err = (self.make)();
        async move { Err::<wgpu::Adapter, _>(err) }
    }
}

/// Offscreen target that counts how it is driven.
pub struct RecordingSurface {
    pub inner: OffscreenTarget,
    pub configured: u32,
    pub acquired: u32,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            inner: OffscreenTarget::new(width, height, format),
            configured: 0,
            acquired: 0,
        }
    }
}

impl PresentationSurface for RecordingSurface {
    fn configure(
        &mut self,
        ctx: &DeviceContext,
        init: &GpuInit,
    ) -> Result<wgpu::TextureFormat, PresentError> {
        self.configured += 1;
        self.inner.configure(ctx, init)
    }

    fn acquire(&mut self) -> Result<SurfaceImage, PresentError> {
        self.acquired += 1;
        self.inner.acquire()
    }
}
