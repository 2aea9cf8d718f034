use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starfield_backdrop::{
    Blend, Canvas, FrameScheduler, RenderError, Rgba, Star, Starfield, StarfieldApp,
    StarfieldConfig, Surface, TickScheduler, Viewport,
};

/// Counts paint calls into a shared cell so they stay observable after the
/// canvas has moved into the app.
struct CountingCanvas {
    paints: Rc<Cell<usize>>,
}

impl Canvas for CountingCanvas {
    fn resize(&mut self, _viewport: Viewport) {}
    fn clear(&mut self, _color: Rgba) {
        self.paints.set(self.paints.get() + 1);
    }
    fn set_blend(&mut self, _blend: Blend) {}
    fn fill_radial_gradient(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgba) {
        self.paints.set(self.paints.get() + 1);
    }
    fn fill_circle(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgba) {
        self.paints.set(self.paints.get() + 1);
    }
}

struct CountingSurface {
    viewport: Viewport,
    paints: Rc<Cell<usize>>,
}

impl Surface for CountingSurface {
    type Canvas = CountingCanvas;

    fn measure(&self) -> Viewport {
        self.viewport
    }
    fn acquire_canvas(&self) -> Option<CountingCanvas> {
        Some(CountingCanvas {
            paints: self.paints.clone(),
        })
    }
}

/// Records cancellations into a shared cell, readable after the app is gone.
struct SharedScheduler {
    next: u32,
    cancelled: Rc<Cell<Vec<u32>>>,
}

impl FrameScheduler for SharedScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Result<u32, RenderError> {
        self.next += 1;
        Ok(self.next)
    }

    fn cancel_frame(&mut self, handle: u32) {
        let mut cancelled = self.cancelled.take();
        cancelled.push(handle);
        self.cancelled.set(cancelled);
    }
}

#[derive(Default)]
struct Recorder {
    circles: Vec<(f64, f64, f64, Rgba)>,
    gradients: usize,
    blends: Vec<Blend>,
}

impl Canvas for Recorder {
    fn resize(&mut self, _viewport: Viewport) {}
    fn clear(&mut self, color: Rgba) {
        assert_eq!(color, Rgba::BLACK);
    }
    fn set_blend(&mut self, blend: Blend) {
        self.blends.push(blend);
    }
    fn fill_radial_gradient(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgba) {
        self.gradients += 1;
    }
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.circles.push((x, y, radius, color));
    }
}

fn starfield(width: f64, height: f64, seed: u64) -> Starfield<ChaCha8Rng> {
    Starfield::new(
        StarfieldConfig::default(),
        Viewport::new(width, height),
        ChaCha8Rng::seed_from_u64(seed),
    )
}

fn assert_seeded_within(starfield: &Starfield<ChaCha8Rng>, viewport: Viewport) {
    assert_eq!(starfield.stars().len(), 800);
    assert_eq!(starfield.clouds().len(), 5);
    for star in starfield.stars() {
        assert!(star.x >= -viewport.width / 2. && star.x < viewport.width / 2.);
        assert!(star.y >= -viewport.height / 2. && star.y < viewport.height / 2.);
        assert!(star.z >= 0. && star.z < viewport.width);
    }
    let side = viewport.width.min(viewport.height);
    for cloud in starfield.clouds() {
        assert!(cloud.x >= 0. && cloud.x < viewport.width);
        assert!(cloud.y >= 0. && cloud.y < viewport.height);
        assert!(cloud.radius >= 0.2 * side && cloud.radius < 0.6 * side);
        assert!(cloud.vx >= -0.05 && cloud.vx < 0.05);
        assert!(cloud.vy >= -0.05 && cloud.vy < 0.05);
    }
}

#[test]
fn star_depth_stays_in_range_every_frame() {
    let mut field = starfield(300., 200., 1);
    let mut canvas = Recorder::default();
    for _ in 0..700 {
        field.frame(&mut canvas);
        for star in field.stars() {
            assert!(star.z > 0. && star.z <= 300., "z = {}", star.z);
        }
    }
}

#[test]
fn respawned_stars_start_at_latest_width() {
    let mut field = starfield(300., 200., 2);
    field.initialize(Viewport::new(500., 200.));
    for star in field.stars_mut() {
        star.z = 0.5;
    }
    field.frame(&mut Recorder::default());
    assert!(field.stars().iter().all(|star| star.z == 500.));
}

#[test]
fn clouds_are_never_lost_off_canvas() {
    let mut field = starfield(200., 150., 3);
    for cloud in field.clouds_mut() {
        cloud.vx = 0.049;
        cloud.vy = -0.049;
    }
    let viewport = field.viewport();
    for _ in 0..20_000 {
        for cloud in field.clouds_mut() {
            cloud.drift(viewport);
        }
        for cloud in field.clouds() {
            assert!(cloud.x >= -cloud.radius && cloud.x <= 200. + cloud.radius);
            assert!(cloud.y >= -cloud.radius && cloud.y <= 150. + cloud.radius);
        }
    }
}

#[test]
fn initialization_is_repeatable() {
    let viewport = Viewport::new(640., 480.);
    let mut field = starfield(640., 480., 4);
    assert_seeded_within(&field, viewport);
    field.initialize(viewport);
    assert_seeded_within(&field, viewport);
    field.initialize(viewport);
    assert_seeded_within(&field, viewport);
}

#[test]
fn projection_boundaries() {
    let viewport = Viewport::new(400., 300.);

    let far = Star { x: 1., y: 1., z: 400. }.project(viewport, 128., 2.).unwrap();
    assert_eq!(far.radius, 0.);
    assert_eq!(far.shade, 0);

    let near = Star { x: 0., y: 0., z: 1e-9 }.project(viewport, 128., 2.).unwrap();
    assert_relative_eq!(near.radius, 2., epsilon = 1e-9);
    assert_eq!(near.shade, 255);
}

#[test]
fn mid_depth_star_renders_mid_gray_at_center() {
    let mut field = starfield(400., 300., 5);
    for cloud in field.clouds_mut() {
        cloud.radius = 0.;
    }
    for star in field.stars_mut() {
        *star = Star { x: 1e9, y: 1e9, z: 300. };
    }
    // z drops to 200 during the frame
    field.stars_mut()[0] = Star { x: 0., y: 0., z: 201. };

    let sprite = Star { x: 0., y: 0., z: 200. }
        .project(field.viewport(), 128., 2.)
        .unwrap();
    assert_eq!((sprite.x, sprite.y), (0., 0.));
    assert_relative_eq!(sprite.radius, 1.0);
    assert_eq!(sprite.shade, 128);

    let mut canvas = Recorder::default();
    field.frame(&mut canvas);
    assert_eq!(canvas.circles.len(), 1);
    let (x, y, radius, color) = canvas.circles[0];
    assert_eq!((x, y), (200., 150.));
    assert_relative_eq!(radius, 1.0);
    assert_eq!(color, Rgba::gray(128));
}

#[test]
fn nebula_is_painted_additively_then_blending_restored() {
    let mut field = starfield(400., 300., 6);
    let mut canvas = Recorder::default();
    field.frame(&mut canvas);
    assert_eq!(canvas.gradients, 5);
    assert_eq!(canvas.blends, vec![Blend::Additive, Blend::Normal]);
}

#[test]
fn resize_discards_and_reseeds() {
    let mut field = starfield(800., 600., 7);
    let before_stars = field.stars().to_vec();
    let before_clouds = field.clouds().to_vec();

    let bigger = Viewport::new(1200., 900.);
    field.initialize(bigger);
    assert_eq!(field.viewport(), bigger);
    assert_seeded_within(&field, bigger);
    assert_ne!(field.stars(), &before_stars[..]);
    assert_ne!(field.clouds(), &before_clouds[..]);
}

#[test]
fn teardown_with_pending_frame_stops_painting() {
    let paints = Rc::new(Cell::new(0));
    let surface = CountingSurface {
        viewport: Viewport::new(800., 600.),
        paints: paints.clone(),
    };
    let mut app = StarfieldApp::mount(
        &surface,
        StarfieldConfig::default(),
        ChaCha8Rng::seed_from_u64(8),
        TickScheduler::default(),
    )
    .unwrap();
    assert_eq!(paints.get(), 0);

    app.start().unwrap();
    assert!(app.on_frame());
    assert!(app.is_running());
    let painted = paints.get();
    assert!(painted > 0);

    app.teardown();
    // one more display refresh after teardown
    assert!(!app.on_frame());
    assert_eq!(paints.get(), painted);
    assert_eq!(app.scheduler().cancelled(), 1);
}

#[test]
fn dropping_the_app_cancels_its_pending_frame() {
    let paints = Rc::new(Cell::new(0));
    let cancelled = Rc::new(Cell::new(vec![]));
    let surface = CountingSurface {
        viewport: Viewport::new(100., 100.),
        paints: paints.clone(),
    };
    let scheduler = SharedScheduler {
        next: 0,
        cancelled: cancelled.clone(),
    };
    let mut app = StarfieldApp::mount(
        &surface,
        StarfieldConfig::default(),
        ChaCha8Rng::seed_from_u64(9),
        scheduler,
    )
    .unwrap();
    app.start().unwrap();
    assert!(app.on_frame());
    assert_eq!(cancelled.take(), Vec::<u32>::new());

    drop(app);
    // the request made by the last frame is the one withdrawn
    assert_eq!(cancelled.take(), vec![2]);
    assert_eq!(Rc::strong_count(&paints), 2);
}

#[test]
fn dropping_a_torn_down_app_cancels_nothing_more() {
    let cancelled = Rc::new(Cell::new(vec![]));
    let surface = CountingSurface {
        viewport: Viewport::new(100., 100.),
        paints: Rc::new(Cell::new(0)),
    };
    let mut app = StarfieldApp::mount(
        &surface,
        StarfieldConfig::default(),
        ChaCha8Rng::seed_from_u64(10),
        SharedScheduler {
            next: 0,
            cancelled: cancelled.clone(),
        },
    )
    .unwrap();
    app.start().unwrap();
    app.teardown();
    drop(app);
    assert_eq!(cancelled.take(), vec![1]);
}
