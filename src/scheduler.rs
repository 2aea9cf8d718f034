use super::*;

use crate::error::RenderError;

#[cfg(target_arch = "wasm32")]
mod web_scheduler;
#[cfg(target_arch = "wasm32")]
pub use web_scheduler::{mount_starfield, RafScheduler, StarfieldHandle};

#[cfg(not(target_arch = "wasm32"))]
mod desktop_scheduler;
#[cfg(not(target_arch = "wasm32"))]
pub use desktop_scheduler::{
    frame_period, DesktopFrameLoop, HeadlessApp, HeadlessSurface, SurfaceEvent,
};

/// Grants one frame at a time to the renderer.
pub trait FrameScheduler {
    type Handle;

    /// Asks for the next frame callback.
    fn request_frame(&mut self) -> Result<Self::Handle, RenderError>;
    /// Withdraws a request made by [`FrameScheduler::request_frame`].
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Scheduler for hosts that drive frames themselves (a timer, a test). A
/// request is serviced by the host's next tick.
#[derive(Debug, Default)]
pub struct TickScheduler {
    requested: u64,
    cancelled: u64,
}

impl TickScheduler {
    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for TickScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> Result<u64, RenderError> {
        self.requested += 1;
        Ok(self.requested)
    }

    fn cancel_frame(&mut self, handle: u64) {
        if handle == self.requested {
            self.cancelled += 1;
        }
    }
}
