use super::{Capability, GpuInit, SubmissionQueue};
use crate::error::BringupError;

/// Adapter, logical device and submission queue.
///
/// Created once at startup and kept for the rest of the process. Every later
/// component borrows it to create resources or enqueue work.
pub struct DeviceContext {
    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Journaled FIFO queue.
    queue: SubmissionQueue,
}

impl DeviceContext {
    /// Acquires an adapter from `capability`, then a device bound to it.
    ///
    /// Both requests are asynchronous under wgpu. Neither is retried: an adapter
    /// failure yields [`BringupError::CapabilityUnavailable`], a device failure
    /// [`BringupError::NoCompatibleDevice`]. Nothing else is allocated first.
    pub async fn acquire<C: Capability>(
        capability: &C,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        init: &GpuInit,
    ) -> Result<Self, BringupError> {
        let adapter = capability
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("trigon device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| BringupError::NoCompatibleDevice(e.to_string()))?;

        Ok(Self {
            adapter,
            device,
            queue: SubmissionQueue::new(queue),
        })
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the submission queue.
    pub fn queue(&self) -> &SubmissionQueue {
        &self.queue
    }

    /// Runs `create` inside a validation error scope.
    ///
    /// wgpu reports creation errors out of band and panics on the ones nobody
    /// captures. The scope turns them into an `Err` with wgpu's diagnostic.
    pub fn validated<T>(&self, create: impl FnOnce(&wgpu::Device) -> T) -> Result<T, String> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(&self.device);
        match pollster::block_on(scope.pop()) {
            None => Ok(value),
            Some(err) => Err(err.to_string()),
        }
    }
}

