use image::{Rgb as Pixel, RgbImage};

use crate::math::Rgb;

use super::projection::ScreenPoint;

/// Eye-dome lighting parameters.
///
/// Each covered pixel is darkened by how much closer its neighbours at
/// `radius` pixels are, in log-depth. `strength` scales the darkening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdlSettings {
    /// Neighbour distance in pixels.
    pub radius: u32,
    /// Shading strength; zero disables the pass.
    pub strength: f64,
}

impl Default for EdlSettings {
    fn default() -> Self {
        Self {
            radius: 1,
            strength: 8.0,
        }
    }
}

/// Color and depth buffers for one frame.
pub struct FrameBuffer {
    color: RgbImage,
    depth: Vec<f64>,
}

impl FrameBuffer {
    /// Creates a frame cleared to `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            color: RgbImage::from_pixel(width, height, Pixel(background)),
            depth: vec![f64::INFINITY; width as usize * height as usize],
        }
    }

    /// Returns the frame width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    /// Returns the frame height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Returns the depth stored at `(x, y)`; background pixels are infinite.
    #[must_use]
    pub fn depth_at(&self, x: u32, y: u32) -> f64 {
        self.depth[self.index(x, y)]
    }

    /// Returns the color stored at `(x, y)`.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Rgb {
        self.color.get_pixel(x, y).0
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.color.width() as usize + x as usize
    }

    /// Writes one pixel if it is closer than what is already there.
    fn plot(&mut self, x: i64, y: i64, depth: f64, color: Rgb) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        let i = self.index(x, y);
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.color.put_pixel(x, y, Pixel(color));
        }
    }

    /// Draws a square splat of `size` pixels centered on `point`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn splat(&mut self, point: &ScreenPoint, size: u32, color: Rgb) {
        let size = i64::from(size.max(1));
        let x0 = point.x.floor() as i64 - (size - 1) / 2;
        let y0 = point.y.floor() as i64 - (size - 1) / 2;
        for dy in 0..size {
            for dx in 0..size {
                self.plot(x0 + dx, y0 + dy, point.depth, color);
            }
        }
    }

    /// Draws a depth-tested line between two projected points.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn line(&mut self, a: &ScreenPoint, b: &ScreenPoint, color: Rgb) {
        let Some((a, b)) = self.clip(a, b) else {
            return;
        };
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as i64;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            let depth = a.depth + (b.depth - a.depth) * t;
            self.plot(x.floor() as i64, y.floor() as i64, depth, color);
        }
    }

    /// Cuts the segment `a`-`b` to the image rectangle (Liang-Barsky).
    fn clip(&self, a: &ScreenPoint, b: &ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, a.x), (dx, w - a.x), (-dy, a.y), (dy, h - a.y)] {
            if p.abs() < f64::EPSILON {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| ScreenPoint {
            x: a.x + dx * t,
            y: a.y + dy * t,
            depth: a.depth + (b.depth - a.depth) * t,
        };
        Some((at(t0), at(t1)))
    }

    /// Applies eye-dome lighting to every covered pixel.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn eye_dome_lighting(&mut self, settings: EdlSettings) {
        if settings.strength <= 0.0 || settings.radius == 0 {
            return;
        }
        let (w, h) = (self.width(), self.height());
        let r = i64::from(settings.radius);
        let log_depth: Vec<f64> = self.depth.iter().map(|d| d.ln()).collect();

        let mut shaded = self.color.clone();
        for y in 0..h {
            for x in 0..w {
                let center = log_depth[self.index(x, y)];
                if center.is_infinite() {
                    continue;
                }
                let mut response = 0.0;
                for (dx, dy) in [(r, 0), (-r, 0), (0, r), (0, -r)] {
                    let nx = i64::from(x) + dx;
                    let ny = i64::from(y) + dy;
                    if nx < 0 || ny < 0 || nx >= i64::from(w) || ny >= i64::from(h) {
                        continue;
                    }
                    let neighbour = log_depth[self.index(nx as u32, ny as u32)];
                    if neighbour.is_finite() {
                        response += (center - neighbour).max(0.0);
                    }
                }
                let shade = (-settings.strength * response).exp();
                let Pixel([red, green, blue]) = *self.color.get_pixel(x, y);
                let scale = |c: u8| (f64::from(c) * shade).round() as u8;
                shaded.put_pixel(x, y, Pixel([scale(red), scale(green), scale(blue)]));
            }
        }
        self.color = shaded;
    }

    /// Consumes the buffer, returning the color image.
    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.color
    }
}
