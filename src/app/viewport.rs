use super::*;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
    pub fn half_width(&self) -> f64 {
        self.width / 2.
    }
    pub fn half_height(&self) -> f64 {
        self.height / 2.
    }
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
    /// Whether a point on the centered plane lands on the surface.
    pub fn contains_centered(&self, x: f64, y: f64) -> bool {
        x >= -self.half_width()
            && x < self.half_width()
            && y >= -self.half_height()
            && y < self.half_height()
    }
    /// Maps a point on the centered plane to surface coordinates.
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.half_width(), y + self.half_height())
    }
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.max(0.) as u32, self.height.max(0.) as u32)
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = w.trim().parse::<u32>().map_err(|e| format!("bad width {w:?}: {e}"))?;
        let height = h.trim().parse::<u32>().map_err(|e| format!("bad height {h:?}: {e}"))?;
        Ok(Viewport::new(width as f64, height as f64))
    }
}
