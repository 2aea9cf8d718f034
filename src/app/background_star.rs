use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Position on the plane centered at the viewport origin.
    pub x: f64,
    pub y: f64,
    /// Distance from the viewer along the viewing axis.
    pub z: f64,
}

/// Where and how a star lands on screen for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarSprite {
    /// Offset from the viewport center.
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub shade: u8,
}

impl Star {
    /// Fresh star anywhere on the plane at a random depth in `[0, W)`.
    pub fn random(viewport: Viewport, rng: &mut impl Rng) -> Self {
        let mut star = Star {
            x: 0.,
            y: 0.,
            z: rng.gen::<f64>() * viewport.width,
        };
        star.scatter(viewport, rng);
        star
    }

    fn scatter(&mut self, viewport: Viewport, rng: &mut impl Rng) {
        self.x = rng.gen::<f64>() * viewport.width - viewport.half_width();
        self.y = rng.gen::<f64>() * viewport.height - viewport.half_height();
    }

    /// Moves the star `speed` closer. Once it reaches the viewer it respawns on a
    /// new spot at the far end of the field (`z = W`).
    pub fn advance(&mut self, speed: f64, viewport: Viewport, rng: &mut impl Rng) {
        self.z -= speed;
        if self.z <= 0. {
            self.scatter(viewport, rng);
            self.z = viewport.width;
        }
    }

    /// Perspective projection through `k = focal_length / z`. Returns `None` when
    /// the projected point falls outside the viewport.
    pub fn project(
        &self,
        viewport: Viewport,
        focal_length: f64,
        max_radius: f64,
    ) -> Option<StarSprite> {
        let k = focal_length / self.z;
        let px = self.x * k;
        let py = self.y * k;
        if !viewport.contains_centered(px, py) {
            return None;
        }

        let nearness = 1. - self.z / viewport.width;
        Some(StarSprite {
            x: px,
            y: py,
            radius: nearness * max_radius,
            shade: (nearness * 255.).round().clamp(0., 255.) as u8,
        })
    }
}

pub fn generate(count: usize, viewport: Viewport, rng: &mut impl Rng) -> Vec<Star> {
    (0..count).map(|_| Star::random(viewport, rng)).collect()
}
