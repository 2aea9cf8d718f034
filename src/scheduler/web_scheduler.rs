use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use super::*;
use crate::app::{StarfieldApp, Surface, WebCanvas};
use crate::config::StarfieldConfig;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type WebApp = StarfieldApp<WebCanvas, ChaCha8Rng, RafScheduler>;

/// `requestAnimationFrame` / `cancelAnimationFrame`.
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Result<i32, RenderError> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref().ok_or(RenderError::SchedulerDetached)?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| RenderError::FrameRequest(format!("{:?}", e)))
    }

    fn cancel_frame(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}

/// A backdrop running in the page. Dropping it (or calling `teardown`) stops
/// the animation and detaches the resize listener.
#[wasm_bindgen]
pub struct StarfieldHandle {
    app: Rc<RefCell<WebApp>>,
    window: Window,
    frame_callback: FrameCallback,
    resize_listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl StarfieldHandle {
    pub fn teardown(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        }
        if let Ok(mut app) = self.app.try_borrow_mut() {
            app.teardown();
        }
        self.frame_callback.borrow_mut().take();
    }

    pub fn frames(&self) -> f64 {
        self.app.try_borrow().map(|app| app.frames() as f64).unwrap_or(0.)
    }
}

impl Drop for StarfieldHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Mounts the backdrop on the `<canvas>` with the given id. Returns nothing,
/// silently, when the element or its 2-D context is unavailable.
#[wasm_bindgen]
pub fn mount_starfield(canvas_id: &str) -> Option<StarfieldHandle> {
    let window = web_sys::window()?;
    let element = window
        .document()?
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;

    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
    let scheduler = RafScheduler {
        window: window.clone(),
        callback: frame_callback.clone(),
    };
    let app = StarfieldApp::mount(
        &element,
        StarfieldConfig::default(),
        ChaCha8Rng::from_entropy(),
        scheduler,
    )?;
    let app = Rc::new(RefCell::new(app));

    let weak_app = Rc::downgrade(&app);
    *frame_callback.borrow_mut() = Some(Closure::new(move || {
        if let Some(app) = weak_app.upgrade() {
            app.borrow_mut().on_frame();
        }
    }));

    let weak_app = Rc::downgrade(&app);
    let resized_element = element.clone();
    let resize_listener = Closure::<dyn FnMut()>::new(move || {
        if let Some(app) = weak_app.upgrade() {
            app.borrow_mut().resize(resized_element.measure());
        }
    });
    if window
        .add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref())
        .is_err()
    {
        warn!("Could not listen for window resizes");
    }

    if let Err(err) = app.borrow_mut().start() {
        warn!("Starfield did not start: {}", err);
    }

    Some(StarfieldHandle {
        app,
        window,
        frame_callback,
        resize_listener: Some(resize_listener),
    })
}
