//! Generators built directly on the noise kernel: Perlin, fluid, nebula,
//! simplex relief, domain warp, multifractal and curl turbulence.

use crate::{complexity_octaves, seed_phase};
use opencip_core::color::clamp01;
use opencip_core::{NoiseKernel, VisualContext};
use std::f64::consts::PI;

/// Perlin FBM mapped from [-1, 1] to [0, 1], with an extra high-frequency
/// layer when complexity exceeds 1.5.
pub fn perlin(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let persistence = if ctx.smooth() { 0.4 } else { 0.5 };
    let octaves = if ctx.chaos() { 8 } else { 5 };
    let s = ctx.scale();
    let mut value = noise.fbm(u * s, v * s, octaves, persistence);
    if ctx.complexity() > 1.5 {
        value += noise.perlin(u * s * 4.0, v * s * 4.0) * 0.1;
    }
    clamp01((value + 1.0) / 2.0)
}

/// Advects the sample point through an FBM direction/magnitude field and
/// reads a two-scale FBM at the displaced point.
pub fn fluid(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let t = seed_phase(ctx.seed()) * 0.001;
    let s = ctx.scale();

    let v1 = noise.fbm(u * s + t, v * s, 4, 0.5);
    let v2 = noise.fbm(u * s + 5.2, v * s + 1.3 + t, 4, 0.5);
    let v3 = noise.fbm(u * s * 2.0 - t * 0.5, v * s * 2.0, 3, 0.5);

    let angle = v1 * PI * 4.0 + v3 * PI;
    let radius = (v2 + 1.0) / 2.0;

    let fx = u + angle.cos() * radius * 0.2 * ctx.intensity();
    let fy = v + angle.sin() * radius * 0.2 * ctx.intensity();

    let r1 = noise.fbm(fx * 2.0, fy * 2.0, 4, 0.5);
    let r2 = noise.fbm(fx * 4.0 + r1, fy * 4.0, 2, 0.5) * 0.5;

    clamp01(((r1 + r2) / 1.5 + 1.0) / 2.0)
}

/// Three chained FBM bands plus squared simplex filaments; squared again
/// under dark mode for contrast.
pub fn nebula(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let e = ctx.scale();
    let intensity = ctx.intensity();

    let coarse = noise.fbm(u * e, v * e, 6, 0.6);
    let medium = noise.fbm(
        u * e * 2.0 + coarse * 0.5,
        v * e * 2.0 + coarse * 0.3,
        5,
        0.5,
    );
    let fine = noise.fbm(u * e * 4.0 + medium, v * e * 4.0 + medium, 4, 0.4);

    let filaments = noise.simplex(u * e * 8.0, v * e * 8.0).abs().powi(2);

    let raw = fine * 0.5 + medium * 0.3 + coarse * 0.2 + filaments * 0.2 * intensity;
    let mapped = clamp01((raw + 1.0) / 2.0);
    let value = if ctx.dark() {
        mapped.powi(2) * intensity
    } else {
        mapped * intensity
    };
    clamp01(value)
}

/// Simplex FBM; above complexity 1.3 a fifth of the value comes from the
/// central-difference gradient magnitude.
pub fn simplex_relief(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let s = ctx.scale();
    let octaves = if ctx.chaos() { 6 } else { 4 };
    let persistence = if ctx.smooth() { 0.4 } else { 0.5 };

    let mut value = noise.fbm_simplex(u * s, v * s, octaves, persistence);

    if ctx.complexity() > 1.3 {
        let delta = 0.01;
        let dx = noise.simplex((u + delta) * s, v * s) - noise.simplex((u - delta) * s, v * s);
        let dy = noise.simplex(u * s, (v + delta) * s) - noise.simplex(u * s, (v - delta) * s);
        let gradient = (dx * dx + dy * dy).sqrt() * 2.0;
        value = value * 0.8 + gradient * 0.2;
    }

    clamp01((value + 1.0) / 2.0)
}

/// Two-level domain warp; chaos feeds the result into a second, gentler pass.
pub fn warp(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let amount = ctx.intensity() * 0.5;
    let octaves = complexity_octaves(ctx.complexity(), 3.0);
    let s = ctx.scale();

    let mut value = noise.domain_warp(u * s, v * s, amount, octaves);
    if ctx.chaos() {
        value = noise.domain_warp(u * s + value * 0.1, v * s + value * 0.1, amount * 0.5, 3);
    }
    clamp01((value + 1.0) / 2.0)
}

/// Heterogeneous multifractal: each octave's squared |perlin| is weighted by
/// half the previous octave's signal.
pub fn multifractal(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let x = u * ctx.scale();
    let y = v * ctx.scale();
    let octaves = complexity_octaves(ctx.complexity(), 4.0);

    let mut value = 1.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut weight = 1.0;

    for _ in 0..octaves {
        let signal = noise.perlin(x * freq, y * freq).abs().powi(2) * weight;
        weight = signal * 0.5;
        value += signal * amp;
        amp *= 0.5;
        freq *= 2.0;
    }

    clamp01(value / 2.0)
}

/// Curl-like turbulence animated by the context's animation time.
pub fn curl(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let s = ctx.scale();
    let octaves = complexity_octaves(ctx.complexity(), 3.0);
    let mut value =
        (noise.curl_turbulence(u * s, v * s, octaves, 0.5, ctx.animation_time()) + 1.0) / 2.0;
    if ctx.chaos() {
        value = clamp01(value).powf(1.5);
    }
    clamp01(value * ctx.intensity())
}
