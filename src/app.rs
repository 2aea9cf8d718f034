use super::*;

use crate::config::StarfieldConfig;
use crate::error::RenderError;
use crate::scheduler::FrameScheduler;

use serde::{Deserialize, Serialize};

mod background_star;
pub use background_star::{Star, StarSprite};

mod nebula;
pub use nebula::{Cloud, NebulaHue};

mod viewport;
pub use viewport::Viewport;

mod canvas;
pub use canvas::{Blend, Canvas, Rgba};

mod raster;
pub use raster::PixelCanvas;

#[cfg(target_arch = "wasm32")]
mod canvas_web;
#[cfg(target_arch = "wasm32")]
pub use canvas_web::WebCanvas;

/// Something the backdrop can be mounted on.
pub trait Surface {
    type Canvas: Canvas;

    fn measure(&self) -> Viewport;
    /// `None` when no drawing context can be obtained.
    fn acquire_canvas(&self) -> Option<Self::Canvas>;
}

/// Star and nebula populations for one animation session.
pub struct Starfield<R: Rng> {
    config: StarfieldConfig,
    viewport: Viewport,
    stars: Vec<Star>,
    clouds: Vec<Cloud>,
    rng: R,
}

impl<R: Rng> Starfield<R> {
    pub fn new(config: StarfieldConfig, viewport: Viewport, rng: R) -> Self {
        let mut starfield = Self {
            config,
            viewport,
            stars: vec![],
            clouds: vec![],
            rng,
        };
        starfield.initialize(viewport);
        starfield
    }

    /// Discards both populations and seeds new ones for `viewport`.
    pub fn initialize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let config = &self.config;
        self.stars = background_star::generate(config.star_count, viewport, &mut self.rng);
        self.clouds = nebula::generate(config.cloud_count, viewport, config, &mut self.rng);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn clouds_mut(&mut self) -> &mut [Cloud] {
        &mut self.clouds
    }

    /// Advances every cloud and star by one frame and paints the result.
    pub fn frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        canvas.clear(self.config.background);
        self.draw_nebula(canvas);
        self.draw_stars(canvas);
    }

    fn draw_nebula<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        canvas.set_blend(Blend::Additive);
        for cloud in &mut self.clouds {
            cloud.drift(self.viewport);
            cloud.draw(canvas);
        }
        canvas.set_blend(Blend::Normal);
    }

    fn draw_stars<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let viewport = self.viewport;
        let config = &self.config;
        for star in &mut self.stars {
            star.advance(config.star_speed, viewport, &mut self.rng);

            let Some(sprite) =
                star.project(viewport, config.focal_length, config.max_star_radius)
            else {
                continue;
            };
            let (x, y) = viewport.to_screen(sprite.x, sprite.y);
            canvas.fill_circle(x, y, sprite.radius, Rgba::gray(sprite.shade));
        }
    }
}

/// The mounted backdrop: a [`Starfield`] painting into its canvas once per
/// frame granted by the scheduler.
pub struct StarfieldApp<C: Canvas, R: Rng, S: FrameScheduler> {
    starfield: Starfield<R>,
    canvas: C,
    scheduler: S,
    pending: Option<S::Handle>,
    frames: u64,
    torn_down: bool,
}

impl<C: Canvas, R: Rng, S: FrameScheduler> StarfieldApp<C, R, S> {
    /// Measures the surface, sizes its canvas and seeds the populations.
    /// Yields `None` if the surface has no drawing context.
    pub fn mount<F>(surface: &F, config: StarfieldConfig, rng: R, scheduler: S) -> Option<Self>
    where
        F: Surface<Canvas = C> + ?Sized,
    {
        let mut canvas = surface.acquire_canvas()?;
        let viewport = surface.measure();
        canvas.resize(viewport);

        info!(
            "Mounting starfield on {} surface ({} stars, {} clouds)",
            viewport, config.star_count, config.cloud_count
        );

        Some(Self {
            starfield: Starfield::new(config, viewport, rng),
            canvas,
            scheduler,
            pending: None,
            frames: 0,
            torn_down: false,
        })
    }

    /// Paints the first frame right away and asks for the next one.
    pub fn start(&mut self) -> Result<(), RenderError> {
        if self.torn_down {
            return Err(RenderError::LoopStopped);
        }
        if self.pending.is_some() {
            return Ok(());
        }
        self.paint();
        self.request_next()
    }

    /// Called by the host once per display refresh. Paints only while a frame
    /// request is outstanding, and returns whether it did.
    pub fn on_frame(&mut self) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.paint();
        if let Err(err) = self.request_next() {
            warn!("Stopping starfield loop after {} frames: {}", self.frames, err);
        }
        true
    }

    /// Matches the canvas to the new surface size and re-seeds everything.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.torn_down {
            return;
        }
        debug!("Resizing starfield {} -> {}", self.starfield.viewport(), viewport);
        self.canvas.resize(viewport);
        self.starfield.initialize(viewport);
    }

    /// Cancels the outstanding frame request. No paint happens afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        info!("Starfield torn down after {} frames", self.frames);
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn starfield(&self) -> &Starfield<R> {
        &self.starfield
    }

    pub fn starfield_mut(&mut self) -> &mut Starfield<R> {
        &mut self.starfield
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn paint(&mut self) {
        self.starfield.frame(&mut self.canvas);
        self.frames += 1;
    }

    fn request_next(&mut self) -> Result<(), RenderError> {
        self.pending = Some(self.scheduler.request_frame()?);
        Ok(())
    }
}

impl<C: Canvas, R: Rng, S: FrameScheduler> Drop for StarfieldApp<C, R, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
