use super::*;

/// The stock nebula palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NebulaHue {
    DeepPurple,
    DarkBlue,
    Magenta,
    Teal,
}

impl NebulaHue {
    pub fn rgba(self) -> Rgba {
        match self {
            NebulaHue::DeepPurple => Rgba::new(80, 0, 120, 0.2),
            NebulaHue::DarkBlue => Rgba::new(0, 50, 150, 0.2),
            NebulaHue::Magenta => Rgba::new(130, 0, 80, 0.15),
            NebulaHue::Teal => Rgba::new(0, 100, 100, 0.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgba,
    pub vx: f64,
    pub vy: f64,
}

impl Cloud {
    pub fn random(viewport: Viewport, config: &StarfieldConfig, rng: &mut impl Rng) -> Self {
        let side = viewport.min_side();
        let x = rng.gen::<f64>() * viewport.width;
        let y = rng.gen::<f64>() * viewport.height;
        let radius =
            rng.gen::<f64>() * side * config.cloud_radius_span + side * config.cloud_radius_min;
        let color = if config.palette.is_empty() {
            Rgba::TRANSPARENT
        } else {
            config.palette[rng.gen_range(0..config.palette.len())]
        };
        let vx = (rng.gen::<f64>() - 0.5) * 2. * config.cloud_drift;
        let vy = (rng.gen::<f64>() - 0.5) * 2. * config.cloud_drift;

        Cloud {
            x,
            y,
            radius,
            color,
            vx,
            vy,
        }
    }

    /// Drifts one frame and wraps around once the whole disc has left an edge.
    pub fn drift(&mut self, viewport: Viewport) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x - self.radius > viewport.width {
            self.x = -self.radius;
        }
        if self.x + self.radius < 0. {
            self.x = viewport.width + self.radius;
        }
        if self.y - self.radius > viewport.height {
            self.y = -self.radius;
        }
        if self.y + self.radius < 0. {
            self.y = viewport.height + self.radius;
        }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if self.radius <= 0. {
            return;
        }
        canvas.fill_radial_gradient(self.x, self.y, self.radius, self.color);
    }
}

pub fn generate(
    count: usize,
    viewport: Viewport,
    config: &StarfieldConfig,
    rng: &mut impl Rng,
) -> Vec<Cloud> {
    (0..count).map(|_| Cloud::random(viewport, config, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cloud(x: f64, y: f64, vx: f64, vy: f64) -> Cloud {
        Cloud {
            x,
            y,
            radius: 50.,
            color: NebulaHue::Teal.rgba(),
            vx,
            vy,
        }
    }

    #[test]
    fn wraps_past_right_edge() {
        let viewport = Viewport::new(800., 600.);
        let mut c = cloud(850., 300., 0.04, 0.);
        c.drift(viewport);
        assert_eq!(c.x, -50.);
    }

    #[test]
    fn wraps_past_left_and_top_edges() {
        let viewport = Viewport::new(800., 600.);
        let mut c = cloud(-50., 300., -0.04, 0.);
        c.drift(viewport);
        assert_eq!(c.x, 850.);

        let mut c = cloud(400., -50., 0., -0.01);
        c.drift(viewport);
        assert_eq!(c.y, 650.);
    }

    #[test]
    fn partially_visible_cloud_keeps_drifting() {
        let viewport = Viewport::new(800., 600.);
        let mut c = cloud(820., 300., 0.05, 0.);
        c.drift(viewport);
        assert!((c.x - 820.05).abs() < 1e-9);
    }

    #[test]
    fn random_clouds_stay_in_seed_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let viewport = Viewport::new(800., 600.);
        let config = StarfieldConfig::default();
        for c in generate(200, viewport, &config, &mut rng) {
            assert!(c.x >= 0. && c.x < 800.);
            assert!(c.y >= 0. && c.y < 600.);
            assert!(c.radius >= 120. && c.radius < 360.);
            assert!(c.vx >= -0.05 && c.vx < 0.05);
            assert!(c.vy >= -0.05 && c.vy < 0.05);
            assert!(config.palette.contains(&c.color));
        }
    }

    #[test]
    fn palette_css_strings() {
        assert_eq!(NebulaHue::DeepPurple.rgba().to_string(), "rgba(80, 0, 120, 0.2)");
        assert_eq!(NebulaHue::Magenta.to_string(), "magenta");
    }
}
