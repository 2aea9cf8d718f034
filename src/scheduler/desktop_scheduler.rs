use std::time::Duration;

use rand_chacha::ChaCha8Rng;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use super::*;
use crate::app::{PixelCanvas, StarfieldApp, Surface, Viewport};

pub type HeadlessApp = StarfieldApp<PixelCanvas, ChaCha8Rng, TickScheduler>;

/// Off-screen surface backed by a [`PixelCanvas`].
pub struct HeadlessSurface {
    pub viewport: Viewport,
}

impl Surface for HeadlessSurface {
    type Canvas = PixelCanvas;

    fn measure(&self) -> Viewport {
        self.viewport
    }

    fn acquire_canvas(&self) -> Option<PixelCanvas> {
        Some(PixelCanvas::new(self.viewport))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Resized(Viewport),
    Teardown,
}

/// Runs a [`HeadlessApp`] on its own tokio task, one frame per tick. Resize and
/// teardown events are handled on the same task, between frames.
pub struct DesktopFrameLoop {
    task: Option<JoinHandle<HeadlessApp>>,
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

/// Tick period for `fps`, at least one frame per second and never zero.
pub fn frame_period(fps: f64) -> Result<Duration, RenderError> {
    if !fps.is_finite() || fps <= 0. {
        return Err(RenderError::InvalidFrameRate(fps));
    }
    Ok(Duration::from_secs_f64(1. / fps.max(1.)).max(Duration::from_nanos(1)))
}

impl DesktopFrameLoop {
    pub fn spawn(
        mut app: HeadlessApp,
        fps: f64,
        frame_limit: Option<u64>,
    ) -> Result<Self, RenderError> {
        let period = frame_period(fps)?;
        app.start()?;

        let (events, mut event_receiver) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately and start() already painted
            ticker.tick().await;

            loop {
                if frame_limit.is_some_and(|limit| app.frames() >= limit) {
                    app.teardown();
                    break;
                }
                tokio::select! {
                    _ = ticker.tick() => {
                        if !app.on_frame() {
                            break;
                        }
                    }
                    event = event_receiver.recv() => match event {
                        Some(SurfaceEvent::Resized(viewport)) => app.resize(viewport),
                        Some(SurfaceEvent::Teardown) | None => {
                            app.teardown();
                            break;
                        }
                    }
                }
            }
            app
        });

        Ok(Self {
            task: Some(task),
            events,
        })
    }

    pub fn events(&self) -> mpsc::UnboundedSender<SurfaceEvent> {
        self.events.clone()
    }

    pub fn resize(&self, viewport: Viewport) -> Result<(), RenderError> {
        self.events
            .send(SurfaceEvent::Resized(viewport))
            .map_err(|_| RenderError::LoopStopped)
    }

    /// Waits for the loop to stop on its own and hands the app back.
    pub async fn join(&mut self) -> Result<HeadlessApp, RenderError> {
        let task = self.task.as_mut().ok_or(RenderError::LoopStopped)?;
        let app = task.await.map_err(|e| RenderError::TaskFailed(e.to_string()))?;
        self.task = None;
        Ok(app)
    }

    /// Tears the app down and hands it back.
    pub async fn finish(mut self) -> Result<HeadlessApp, RenderError> {
        let _ = self.events.send(SurfaceEvent::Teardown);
        self.join().await
    }
}

impl Drop for DesktopFrameLoop {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
