mod viewer;

use anyhow::Result;
use trigon_engine::device::GpuInit;
use trigon_engine::logging::{init_logging, LoggingConfig};

use viewer::{Viewer, ViewerConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu_init = GpuInit {
        power_preference: wgpu::PowerPreference::HighPerformance,
        ..GpuInit::default()
    };

    Viewer::run(ViewerConfig::default(), gpu_init)
}
