//! GPU capability + device management.
//!
//! This module is responsible for:
//! - turning an injected capability into an adapter
//! - requesting the logical device and its queue
//! - journaling queue traffic so ordering can be inspected

mod capability;
mod context;
mod init;
mod queue;

pub use capability::{Capability, HeadlessCapability, SystemCapability};
pub use context::DeviceContext;
pub use init::GpuInit;
pub use queue::{QueueOp, QueueRecord, SubmissionQueue};

/// Noop-backed context for unit tests.
#[cfg(test)]
pub(crate) fn headless_context() -> DeviceContext {
    pollster::block_on(DeviceContext::acquire(
        &HeadlessCapability::new(),
        None,
        &GpuInit::default(),
    ))
    .expect("noop backend provides a device")
}
