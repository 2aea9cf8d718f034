use std::path::Path;

use image::{Rgb, RgbImage};

use super::*;

/// Software implementation of [`Canvas`] over an opaque RGB buffer, used by
/// the headless host.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    /// Channels in `0.0..=1.0`, row major.
    pixels: Vec<[f32; 3]>,
    blend: Blend,
}

impl PixelCanvas {
    pub fn new(viewport: Viewport) -> Self {
        let mut canvas = Self {
            width: 0,
            height: 0,
            pixels: vec![],
            blend: Blend::Normal,
        };
        canvas.resize(viewport);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[(y * self.width + x) as usize];
        Some([to_byte(r), to_byte(g), to_byte(b)])
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.pixel(x, y).unwrap_or([0, 0, 0]))
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn put(&mut self, x: i64, y: i64, color: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || alpha <= 0. {
            return;
        }
        let dst = &mut self.pixels[(y as u32 * self.width + x as u32) as usize];
        for (d, s) in dst.iter_mut().zip(color) {
            *d = match self.blend {
                Blend::Normal => s * alpha + *d * (1. - alpha),
                Blend::Additive => (*d + s * alpha).min(1.),
            };
        }
    }

    /// Visits every pixel whose center lies inside the disc, with the distance
    /// from that center to the disc center.
    fn for_each_covered(
        &self,
        cx: f64,
        cy: f64,
        radius: f64,
        mut f: impl FnMut(i64, i64, f64),
    ) -> usize {
        let x0 = ((cx - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(self.width as i64 - 1);
        let y0 = ((cy - radius).floor() as i64).max(0);
        let y1 = ((cy + radius).ceil() as i64).min(self.height as i64 - 1);

        let mut covered = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance < radius {
                    f(x, y, distance);
                    covered += 1;
                }
            }
        }
        covered
    }
}

fn channels(color: Rgba) -> [f32; 3] {
    [color.r as f32 / 255., color.g as f32 / 255., color.b as f32 / 255.]
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0., 1.) * 255.).round() as u8
}

impl Canvas for PixelCanvas {
    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.pixel_size();
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.; 3]; width as usize * height as usize];
    }

    fn clear(&mut self, color: Rgba) {
        let rgb = channels(color);
        let alpha = color.a.clamp(0., 1.);
        for pixel in &mut self.pixels {
            for (d, s) in pixel.iter_mut().zip(rgb) {
                *d = s * alpha + *d * (1. - alpha);
            }
        }
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn fill_radial_gradient(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        if !(radius > 0.) {
            return;
        }
        let rgb = channels(color);
        let mut hits = vec![];
        self.for_each_covered(x, y, radius, |px, py, distance| {
            let alpha = color.a * (1. - (distance / radius) as f32);
            hits.push((px, py, alpha));
        });
        for (px, py, alpha) in hits {
            self.put(px, py, rgb, alpha);
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        if !(radius > 0.) {
            return;
        }
        let rgb = channels(color);
        let mut hits = vec![];
        let covered = self.for_each_covered(x, y, radius, |px, py, _| hits.push((px, py)));
        if covered == 0 {
            let area = (std::f64::consts::PI * radius * radius).min(1.) as f32;
            self.put(x.floor() as i64, y.floor() as i64, rgb, color.a * area);
            return;
        }
        for (px, py) in hits {
            self.put(px, py, rgb, color.a);
        }
    }
}
