use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use trigon_engine::device::{GpuInit, SystemCapability};
use trigon_engine::frame::WindowSurface;
use trigon_engine::{bring_up, Bringup};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Hosts one window and draws the triangle into it exactly once.
pub struct Viewer {
    config: ViewerConfig,
    gpu_init: GpuInit,
    session: Option<Session>,
    failure: Option<anyhow::Error>,
}

/// Live resources for the open window. Field order is drop order: GPU objects
/// go before the window they present to.
struct Session {
    _bringup: Bringup,
    _surface: WindowSurface<'static>,
    window: Arc<Window>,
}

impl Viewer {
    pub fn run(config: ViewerConfig, gpu_init: GpuInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        // Nothing animates; only wake for window events.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut viewer = Self {
            config,
            gpu_init,
            session: None,
            failure: None,
        };
        event_loop
            .run_app(&mut viewer)
            .context("winit event loop terminated with error")?;

        match viewer.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn open(&self, event_loop: &ActiveEventLoop) -> Result<Option<Session>> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let capability = SystemCapability::from_env();
        let size = window.inner_size();
        let mut surface =
            WindowSurface::new(&capability, Arc::clone(&window), size.width, size.height)
                .context("failed to create window surface")?;

        match pollster::block_on(bring_up(&capability, &mut surface, &self.gpu_init)) {
            Ok(bringup) => Ok(Some(Session {
                _bringup: bringup,
                _surface: surface,
                window,
            })),
            Err(err) if err.is_capability_absent() => {
                log::warn!("{err}; nothing will be drawn");
                Ok(None)
            }
            Err(err) => Err(anyhow::Error::new(err).context("GPU bring-up failed")),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Bring-up happens once; later resumes keep the existing session.
        if self.session.is_some() {
            return;
        }

        match self.open(event_loop) {
            Ok(Some(session)) => {
                log::info!("triangle presented; close the window to exit");
                self.session = Some(session);
            }
            Ok(None) => event_loop.exit(),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(session) = &self.session else {
            return;
        };
        if session.window.id() != id {
            return;
        }

        if let WindowEvent::CloseRequested = event {
            self.session = None;
            event_loop.exit();
        }
    }
}
