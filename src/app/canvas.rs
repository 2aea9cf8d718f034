use super::*;

/// 8-bit color with a unit alpha, as used by CSS `rgba()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r, g, b, a }
    }
    pub const fn gray(shade: u8) -> Self {
        Rgba::new(shade, shade, shade, 1.)
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// How newly painted color combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Source-over compositing.
    #[default]
    Normal,
    /// Color is added to the destination and clamped, brightening it.
    Additive,
}

/// Paint sink the renderer draws into. Coordinates are surface pixels with the
/// origin at the top-left corner.
pub trait Canvas {
    /// Matches the backing store to the surface size.
    fn resize(&mut self, viewport: Viewport);
    /// Fills the whole surface, ignoring the current blend mode.
    fn clear(&mut self, color: Rgba);
    fn set_blend(&mut self, blend: Blend);
    /// Disc filled with `color` at the center fading to transparent at `radius`.
    fn fill_radial_gradient(&mut self, x: f64, y: f64, radius: f64, color: Rgba);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);
}

impl<C: Canvas + ?Sized> Canvas for Box<C> {
    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport)
    }
    fn clear(&mut self, color: Rgba) {
        (**self).clear(color)
    }
    fn set_blend(&mut self, blend: Blend) {
        (**self).set_blend(blend)
    }
    fn fill_radial_gradient(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        (**self).fill_radial_gradient(x, y, radius, color)
    }
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        (**self).fill_circle(x, y, radius, color)
    }
}
