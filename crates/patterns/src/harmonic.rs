//! Trigonometric generators: polar geometric harmonics, plasma interference
//! and multi-source circular waves.

use crate::{complexity_count, seed_phase, MAX_TABLE_LEN};
use glam::DVec2;
use opencip_core::color::clamp01;
use opencip_core::{NoiseKernel, VisualContext, Xorshift64};
use std::f64::consts::{PI, TAU};

/// Angular and radial sinusoids over a seed-dependent number of polar
/// segments.
pub fn geometric(u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let c = DVec2::new(u - 0.5, v - 0.5);
    let dist = c.length();
    let angle = c.y.atan2(c.x);

    let segments = if ctx.chaos() {
        5 + ctx.seed() % 15
    } else {
        3 + ctx.seed() % 9
    };
    let segments = segments as f64;

    let seg_angle = TAU / segments;
    let rel_angle = angle % seg_angle;
    let f = ctx.scale() * ctx.complexity();

    let v1 = (rel_angle * f * 8.0).sin();
    let v2 = (dist * 20.0 * f).cos();
    let v3 = (angle * segments + dist * 10.0).sin();
    let mut value = (v1 + v2 * 0.5 + v3 * 0.25) / 1.75;

    if ctx.symmetric() {
        let sym = (dist * 15.0 * f).sin() * (angle * segments).cos();
        value = (value + sym) / 2.0;
    }

    if ctx.complexity() > 1.2 {
        value += (dist * 50.0 * f).sin() * 0.1 * (1.0 - dist * 2.0);
    }

    clamp01((value + 1.0) / 2.0)
}

/// Sum of shifted sines and cosines plus radial and product terms; chaos
/// adds a simplex-driven sine.
pub fn plasma(noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
    let e = ctx.scale() * ctx.complexity();
    let t = seed_phase(ctx.seed()) * 0.01;

    let mut value = (u * e * 5.0 + t).sin()
        + (v * e * 5.0 + t).cos()
        + ((u + v) * e * 3.0).sin()
        + ((u - v) * e * 4.0).cos();

    value += ((u * u + v * v).sqrt() * e * 8.0).sin() * 0.5;
    value += (u * v * e * e * 10.0).cos() * 0.3;

    if ctx.chaos() {
        let n = noise.simplex(u * e * 2.0, v * e * 2.0);
        value += (n * PI * 4.0).sin() * 0.4;
    }

    clamp01((value / 4.5 + 0.5) * ctx.intensity())
}

#[derive(Debug, Clone, PartialEq)]
struct WaveSource {
    origin: DVec2,
    frequency: f64,
    phase: f64,
    amplitude: f64,
}

/// Seeded circular wave emitters, drawn once per render.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSources {
    sources: Vec<WaveSource>,
}

impl WaveSources {
    /// Draws `3 + complexity·4` sources with random origin, frequency and
    /// phase; amplitude falls linearly from 1 to just above 0.5.
    pub fn new(ctx: &VisualContext) -> Self {
        let mut rng = Xorshift64::new(ctx.seed());
        let count = complexity_count(ctx.complexity(), 4.0, 3, MAX_TABLE_LEN);
        let sources = (0..count)
            .map(|i| {
                let origin = DVec2::new(rng.next_f64(), rng.next_f64());
                let frequency = (0.5 + rng.next_f64() * 2.0) * ctx.scale();
                let phase = rng.next_f64() * TAU;
                WaveSource {
                    origin,
                    frequency,
                    phase,
                    amplitude: 1.0 - (i as f64 / count as f64) * 0.5,
                }
            })
            .collect();
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Averaged interference of all sources at `(u, v)`.
    pub fn sample(&self, u: f64, v: f64, ctx: &VisualContext) -> f64 {
        let p = DVec2::new(u, v);
        let sum: f64 = self
            .sources
            .iter()
            .map(|s| (p.distance(s.origin) * s.frequency * 10.0 + s.phase).sin() * s.amplitude)
            .sum();
        let mut acc = sum / self.sources.len().max(1) as f64;
        if ctx.smooth() {
            acc = (acc * 2.0).tanh();
        }
        clamp01((acc + 1.0) / 2.0 * ctx.intensity())
    }
}
