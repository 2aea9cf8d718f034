use super::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Canvas`] over a `<canvas>` element's 2-D context.
pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(element: HtmlCanvasElement) -> Option<Self> {
        let ctx = element
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { element, ctx })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    fn disc(&self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        if self.ctx.arc(x, y, radius, 0., std::f64::consts::TAU).is_ok() {
            self.ctx.fill();
        }
    }
}

impl Surface for HtmlCanvasElement {
    type Canvas = WebCanvas;

    fn measure(&self) -> Viewport {
        Viewport::new(self.offset_width() as f64, self.offset_height() as f64)
    }

    fn acquire_canvas(&self) -> Option<WebCanvas> {
        WebCanvas::new(self.clone())
    }
}

#[allow(deprecated)]
impl Canvas for WebCanvas {
    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.pixel_size();
        self.element.set_width(width);
        self.element.set_height(height);
    }

    fn clear(&mut self, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_string()));
        self.ctx
            .fill_rect(0., 0., self.element.width() as f64, self.element.height() as f64);
    }

    fn set_blend(&mut self, blend: Blend) {
        let operation = match blend {
            Blend::Normal => "source-over",
            Blend::Additive => "lighter",
        };
        let _ = self.ctx.set_global_composite_operation(operation);
    }

    fn fill_radial_gradient(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0., x, y, radius) else {
            return;
        };
        let _ = gradient.add_color_stop(0., &color.to_string());
        let _ = gradient.add_color_stop(1., &Rgba::TRANSPARENT.to_string());
        self.ctx.set_fill_style(&gradient);
        self.disc(x, y, radius);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_string()));
        self.disc(x, y, radius);
    }
}
