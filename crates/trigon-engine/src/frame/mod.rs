//! Frame recording and presentation.
//!
//! The presentation surface is a host collaborator behind
//! [`PresentationSurface`]. The renderer first plans the frame as a
//! [`CommandSequence`], then encodes exactly that sequence.

mod command;
mod offscreen;
mod renderer;
mod surface;
mod window;

pub use command::{Command, CommandSequence};
pub use offscreen::OffscreenTarget;
pub use renderer::{FrameError, FrameRenderer, FrameReport, CLEAR_COLOR};
pub use surface::{choose_alpha_mode, choose_surface_format, PresentError, PresentationSurface, SurfaceImage};
pub use window::WindowSurface;
