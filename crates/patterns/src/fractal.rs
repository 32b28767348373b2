//! Mandelbrot escape-time generator with smooth iteration counts.

use opencip_core::color::clamp01;
use opencip_core::VisualContext;
use std::f64::consts::LN_2;

/// Smoothed escape time of the Mandelbrot iteration at the point mapped from
/// `(u, v)`. Points that never escape within `iterations` yield 0.
pub fn mandelbrot(u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let zoom = ctx.scale() * 2.0;
    let cx = u * 3.5 * zoom - 2.5;
    let cy = v * 2.0 * zoom - 1.0;
    let max_iter = ctx.iterations();

    let (mut zx, mut zy) = (cx, cy);
    let (mut zx2, mut zy2) = (0.0, 0.0);
    let mut i = 0;
    while zx2 + zy2 < 4.0 && i < max_iter {
        zy = 2.0 * zx * zy + cy;
        zx = zx2 - zy2 + cx;
        zx2 = zx * zx;
        zy2 = zy * zy;
        i += 1;
    }

    if i == max_iter {
        return 0.0;
    }

    let log_zn = (zx2 + zy2).ln() / 2.0;
    let nu = (log_zn / LN_2).ln() / LN_2;
    let smooth = i as f64 + 1.0 - nu;

    let mut value = smooth / max_iter as f64 * ctx.intensity();
    if ctx.chaos() {
        value += (smooth * 0.1).sin() * (smooth * 0.15).cos() * 0.1;
    }
    clamp01(value)
}
