use std::future::Future;

use crate::error::BringupError;

/// Explicit handle to whatever can hand out GPU adapters.
///
/// The bring-up sequence never touches a global instance; callers inject one of
/// these, which keeps tests free to substitute a fake.
pub trait Capability {
    /// Requests an adapter matching `options`.
    ///
    /// A failure here is fatal for the sequence; it is never retried.
    fn request_adapter(
        &self,
        options: &wgpu::RequestAdapterOptions<'_, '_>,
    ) -> impl Future<Output = Result<wgpu::Adapter, BringupError>>;
}

/// Capability backed by a real wgpu instance.
///
/// Hosts create their presentation surface from [`SystemCapability::instance`] so
/// that the adapter and the surface share one instance.
pub struct SystemCapability {
    instance: wgpu::Instance,
}

impl SystemCapability {
    pub fn with_backends(backends: wgpu::Backends) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        Self { instance }
    }

    /// Honours `WGPU_BACKEND`; falls back to every backend wgpu was built with.
    pub fn from_env() -> Self {
        let backends = wgpu::Backends::from_env().unwrap_or(wgpu::Backends::all());
        log::debug!("capability backends: {backends:?}");
        Self::with_backends(backends)
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }
}

impl Capability for SystemCapability {
    fn request_adapter(
        &self,
        options: &wgpu::RequestAdapterOptions<'_, '_>,
    ) -> impl Future<Output = Result<wgpu::Adapter, BringupError>> {
        async move {
            self.instance
                .request_adapter(options)
                .await
                .map_err(|e| BringupError::CapabilityUnavailable(e.to_string()))
        }
    }
}

/// Capability backed by wgpu's noop backend.
///
/// Resources are validated and tracked like on a real device but nothing is
/// executed, so the whole sequence runs without GPU hardware.
pub struct HeadlessCapability {
    instance: wgpu::Instance,
}

impl HeadlessCapability {
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::NOOP,
            backend_options: wgpu::BackendOptions {
                noop: wgpu::NoopBackendOptions { enable: true },
                ..Default::default()
            },
            ..Default::default()
        });
        Self { instance }
    }
}

impl Default for HeadlessCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl Capability for HeadlessCapability {
    fn request_adapter(
        &self,
        options: &wgpu::RequestAdapterOptions<'_, '_>,
    ) -> impl Future<Output = Result<wgpu::Adapter, BringupError>> {
        // The noop adapter cannot present; surface compatibility is not requested.
        let headless = wgpu::RequestAdapterOptions {
            power_preference: options.power_preference,
            force_fallback_adapter: false,
            compatible_surface: None,
        };
        async move {
            self.instance
                .request_adapter(&headless)
                .await
                .map_err(|e| BringupError::CapabilityUnavailable(e.to_string()))
        }
    }
}
