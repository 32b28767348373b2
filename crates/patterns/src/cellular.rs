//! Cell-based generators: Voronoi F2−F1 edges and a per-cell Gray–Scott
//! relaxation.

use crate::{complexity_count, MAX_TABLE_LEN};
use glam::DVec2;
use opencip_core::color::clamp01;
use opencip_core::{VisualContext, Xorshift64};
use std::f64::consts::TAU;

/// Feed rate of the Gray–Scott relaxation.
const FEED_RATE: f64 = 0.055;
/// Kill rate of the Gray–Scott relaxation.
const KILL_RATE: f64 = 0.062;
/// Diffusion rate for U (substrate).
const DIFFUSION_U: f64 = 0.2;
/// Diffusion rate for V (activator).
const DIFFUSION_V: f64 = 0.1;
const DT: f64 = 0.1;

/// Seeded Voronoi sites in the unit square, drawn once per render.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiSites {
    sites: Vec<DVec2>,
}

impl VoronoiSites {
    /// Draws `15 + complexity·15` sites, at most [`MAX_TABLE_LEN`].
    pub fn new(ctx: &VisualContext) -> Self {
        let mut rng = Xorshift64::new(ctx.seed());
        let count = complexity_count(ctx.complexity(), 15.0, 15, MAX_TABLE_LEN);
        let sites = (0..count)
            .map(|_| DVec2::new(rng.next_f64(), rng.next_f64()))
            .collect();
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Distances to the nearest and second-nearest site. Euclidean times
    /// scale, or Manhattan times `scale·0.7` under chaos.
    fn nearest_two(&self, p: DVec2, ctx: &VisualContext) -> (f64, f64) {
        let mut f1 = f64::MAX;
        let mut f2 = f64::MAX;
        for site in &self.sites {
            let delta = p - *site;
            let d = if ctx.chaos() {
                (delta.x.abs() + delta.y.abs()) * ctx.scale() * 0.7
            } else {
                delta.length() * ctx.scale()
            };
            if d < f1 {
                f2 = f1;
                f1 = d;
            } else if d < f2 {
                f2 = d;
            }
        }
        (f1, f2)
    }

    /// Cell-edge intensity `(F2 − F1)·intensity·2`; smooth mode blends in
    /// 30% of a radial falloff from the nearest site.
    pub fn sample(&self, u: f64, v: f64, ctx: &VisualContext) -> f64 {
        let (f1, f2) = self.nearest_two(DVec2::new(u, v), ctx);
        let mut value = (f2 - f1) * ctx.intensity() * 2.0;
        if ctx.smooth() {
            let centre = 1.0 - (-f1 * 3.0).exp();
            value = value * 0.7 + centre * 0.3;
        }
        clamp01(value)
    }
}

/// Activator level seeded into the centre of every third cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularSeed {
    spot: f64,
}

impl CellularSeed {
    pub fn new(ctx: &VisualContext) -> Self {
        let mut rng = Xorshift64::new(ctx.seed());
        Self {
            spot: 0.5 + rng.next_f64() * 0.5,
        }
    }

    /// Runs `iterations/10 + 5` explicit Euler steps of a Gray–Scott system
    /// whose Laplacian is a fixed trigonometric function of the position
    /// inside the cell, and returns the activator.
    pub fn sample(&self, u: f64, v: f64, ctx: &VisualContext) -> f64 {
        let cells = (5.0 * ctx.complexity()) as usize + 3;
        let cell_size = 1.0 / cells as f64;
        let cx = (u * cells as f64) as usize;
        let cy = (v * cells as f64) as usize;
        let local_x = (u - cx as f64 * cell_size) / cell_size;
        let local_y = (v - cy as f64 * cell_size) / cell_size;

        let mut a = 1.0;
        let mut b = 0.0;
        let centred = |t: f64| t > 0.4 && t < 0.6;
        if (cx + cy) % 3 == 0 && centred(local_x) && centred(local_y) {
            b = self.spot;
        }

        let lap_a_bias = ((local_x * TAU).sin() + (local_y * TAU).cos()) * 0.5;
        let lap_b_bias = ((local_x * TAU).cos() + (local_y * TAU).sin()) * 0.5;

        let steps = ctx.iterations() / 10 + 5;
        for _ in 0..steps {
            let lap_a = -4.0 * a + lap_a_bias;
            let lap_b = -4.0 * b + lap_b_bias;
            let reaction = a * b * b;
            let da = DIFFUSION_U * lap_a - reaction + FEED_RATE * (1.0 - a);
            let db = DIFFUSION_V * lap_b + reaction - (FEED_RATE + KILL_RATE) * b;
            a = clamp01(a + da * DT);
            b = clamp01(b + db * DT);
        }

        clamp01(b * ctx.intensity())
    }
}
