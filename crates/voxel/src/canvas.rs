//! Minimal 2D rasterizer over a [`PixelBuffer`]: filled polygons, outlines,
//! ellipses, rectangles and a vertical gradient. Everything is clipped to
//! the buffer; translucent colors composite over what is already drawn.

use glam::DVec2;
use opencip_core::color::lerp_rgb;
use opencip_core::{PixelBuffer, Rgb, Rgba};

pub struct Painter<'a> {
    buf: &'a mut PixelBuffer,
}

impl<'a> Painter<'a> {
    pub fn new(buf: &'a mut PixelBuffer) -> Self {
        Self { buf }
    }

    pub fn width(&self) -> usize {
        self.buf.width()
    }

    pub fn height(&self) -> usize {
        self.buf.height()
    }

    fn plot(&mut self, x: i64, y: i64, c: Rgba) {
        self.buf.blend(x, y, c);
    }

    /// Paints every row with a color interpolated from `top` to `bottom`.
    pub fn vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let h = self.height();
        let w = self.width() as i64;
        for y in 0..h {
            let t = if h > 1 { y as f64 / (h - 1) as f64 } else { 0.0 };
            let c = lerp_rgb(top, bottom, t);
            for x in 0..w {
                self.buf.put(x, y as i64, c);
            }
        }
    }

    /// Axis-aligned rectangle with top-left corner `(x, y)`.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, c: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width() as i64);
        let y1 = (y + h).min(self.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.plot(px, py, c);
            }
        }
    }

    /// Ellipse inscribed in the box at `(x, y)` of size `w × h`. A pixel is
    /// covered when its centre lies inside the ellipse.
    pub fn fill_ellipse(&mut self, x: f64, y: f64, w: f64, h: f64, c: Rgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let (rx, ry) = (w / 2.0, h / 2.0);
        let centre = DVec2::new(x + rx, y + ry);
        let y0 = y.floor().max(0.0) as i64;
        let y1 = ((y + h).ceil() as i64).min(self.height() as i64);
        let x0 = x.floor().max(0.0) as i64;
        let x1 = ((x + w).ceil() as i64).min(self.width() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                let d = (DVec2::new(px as f64 + 0.5, py as f64 + 0.5) - centre) / DVec2::new(rx, ry);
                if d.length_squared() <= 1.0 {
                    self.plot(px, py, c);
                }
            }
        }
    }

    /// Even-odd scanline fill sampled at pixel centres.
    pub fn fill_polygon(&mut self, points: &[DVec2], c: Rgba) {
        if points.len() < 3 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let y0 = min_y.floor().max(0.0) as i64;
        let y1 = (max_y.ceil() as i64).min(self.height() as i64);

        let mut crossings = Vec::with_capacity(points.len());
        for py in y0..y1 {
            let sy = py as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    let t = (sy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                // Pixel centres within [left, right).
                let start = (span[0] - 0.5).ceil().max(0.0) as i64;
                let end = ((span[1] - 0.5).ceil() as i64).min(self.width() as i64);
                for px in start..end {
                    self.plot(px, py, c);
                }
            }
        }
    }

    /// One-pixel Bresenham line from `a` to `b`.
    pub fn line(&mut self, a: DVec2, b: DVec2, c: Rgb) {
        let (mut x, mut y) = (a.x.round() as i64, a.y.round() as i64);
        let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.buf.put(x, y, c);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Closed outline through `points`.
    pub fn stroke_polygon(&mut self, points: &[DVec2], c: Rgb) {
        for (i, a) in points.iter().enumerate() {
            self.line(*a, points[(i + 1) % points.len()], c);
        }
    }
}
