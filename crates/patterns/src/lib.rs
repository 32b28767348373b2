#![deny(unsafe_code)]
//! Per-pixel procedural pattern generators.
//!
//! Every generator maps a normalized coordinate `(u, v)` plus the
//! [`VisualContext`] to a scalar in [0, 1]. Generators that need seeded
//! auxiliary data (Voronoi sites, wave sources, metaballs, the cellular spot
//! level) get it from [`Pattern::prepare`], once per render, instead of
//! reseeding per pixel.

pub mod cellular;
pub mod fractal;
pub mod harmonic;
pub mod implicit;
pub mod noise_fields;

use opencip_core::color::clamp01;
use opencip_core::{AlgorithmKind, NoiseKernel, VisualContext};

pub use cellular::{CellularSeed, VoronoiSites};
pub use harmonic::WaveSources;
pub use implicit::Metaballs;

/// Time offset source for the seed-animated generators. Only the low 31 bits
/// are used so large seeds do not push noise lookups past f64 precision.
pub(crate) fn seed_phase(seed: u64) -> f64 {
    (seed & 0x7FFF_FFFF) as f64
}

/// Most sites, sources or balls a seeded table will hold.
pub const MAX_TABLE_LEN: usize = 4096;
/// Most octaves any complexity-driven noise sum will take.
pub const MAX_OCTAVES: u32 = 24;

/// `base + complexity·per_unit`, truncated, capped at `max`.
pub(crate) fn complexity_count(complexity: f64, per_unit: f64, base: usize, max: usize) -> usize {
    ((complexity * per_unit) as usize).saturating_add(base).min(max)
}

pub(crate) fn complexity_octaves(complexity: f64, per_unit: f64) -> u32 {
    complexity_count(complexity, per_unit, 2, MAX_OCTAVES as usize) as u32
}

/// A generator ready to sample, carrying any seed-derived tables it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Perlin,
    Fractal,
    Fluid,
    Geometric,
    Voronoi(VoronoiSites),
    Wave(WaveSources),
    Nebula,
    Plasma,
    /// Rendered by the voxel world generator; contributes 0 when blended.
    VoxelWorld,
    Simplex,
    Warp,
    Multifractal,
    Curl,
    Cellular(CellularSeed),
    RayMarching,
    Implicit(Metaballs),
}

impl Pattern {
    /// Builds the generator for `kind`, drawing its seeded tables from `ctx`.
    pub fn prepare(kind: AlgorithmKind, ctx: &VisualContext) -> Self {
        match kind {
            AlgorithmKind::Perlin => Pattern::Perlin,
            AlgorithmKind::Fractal => Pattern::Fractal,
            AlgorithmKind::Fluid => Pattern::Fluid,
            AlgorithmKind::Geometric => Pattern::Geometric,
            AlgorithmKind::Voronoi => Pattern::Voronoi(VoronoiSites::new(ctx)),
            AlgorithmKind::Wave => Pattern::Wave(WaveSources::new(ctx)),
            AlgorithmKind::Nebula => Pattern::Nebula,
            AlgorithmKind::Plasma => Pattern::Plasma,
            AlgorithmKind::VoxelWorld => Pattern::VoxelWorld,
            AlgorithmKind::Simplex => Pattern::Simplex,
            AlgorithmKind::Warp => Pattern::Warp,
            AlgorithmKind::Multifractal => Pattern::Multifractal,
            AlgorithmKind::Curl => Pattern::Curl,
            AlgorithmKind::Cellular => Pattern::Cellular(CellularSeed::new(ctx)),
            AlgorithmKind::RayMarching => Pattern::RayMarching,
            AlgorithmKind::Implicit => Pattern::Implicit(Metaballs::new(ctx)),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Pattern::Perlin => AlgorithmKind::Perlin,
            Pattern::Fractal => AlgorithmKind::Fractal,
            Pattern::Fluid => AlgorithmKind::Fluid,
            Pattern::Geometric => AlgorithmKind::Geometric,
            Pattern::Voronoi(_) => AlgorithmKind::Voronoi,
            Pattern::Wave(_) => AlgorithmKind::Wave,
            Pattern::Nebula => AlgorithmKind::Nebula,
            Pattern::Plasma => AlgorithmKind::Plasma,
            Pattern::VoxelWorld => AlgorithmKind::VoxelWorld,
            Pattern::Simplex => AlgorithmKind::Simplex,
            Pattern::Warp => AlgorithmKind::Warp,
            Pattern::Multifractal => AlgorithmKind::Multifractal,
            Pattern::Curl => AlgorithmKind::Curl,
            Pattern::Cellular(_) => AlgorithmKind::Cellular,
            Pattern::RayMarching => AlgorithmKind::RayMarching,
            Pattern::Implicit(_) => AlgorithmKind::Implicit,
        }
    }

    /// Evaluates the generator at `(u, v)`. Always in [0, 1].
    pub fn sample(&self, noise: &NoiseKernel, u: f64, v: f64, ctx: &VisualContext) -> f64 {
        let value = match self {
            Pattern::Perlin => noise_fields::perlin(noise, u, v, ctx),
            Pattern::Fractal => fractal::mandelbrot(u, v, ctx),
            Pattern::Fluid => noise_fields::fluid(noise, u, v, ctx),
            Pattern::Geometric => harmonic::geometric(u, v, ctx),
            Pattern::Voronoi(sites) => sites.sample(u, v, ctx),
            Pattern::Wave(sources) => sources.sample(u, v, ctx),
            Pattern::Nebula => noise_fields::nebula(noise, u, v, ctx),
            Pattern::Plasma => harmonic::plasma(noise, u, v, ctx),
            Pattern::VoxelWorld => 0.0,
            Pattern::Simplex => noise_fields::simplex_relief(noise, u, v, ctx),
            Pattern::Warp => noise_fields::warp(noise, u, v, ctx),
            Pattern::Multifractal => noise_fields::multifractal(noise, u, v, ctx),
            Pattern::Curl => noise_fields::curl(noise, u, v, ctx),
            Pattern::Cellular(seed) => seed.sample(u, v, ctx),
            Pattern::RayMarching => implicit::ray_marching(noise, u, v, ctx),
            Pattern::Implicit(balls) => balls.sample(noise, u, v, ctx),
        };
        clamp01(value)
    }
}

/// All weighted generators of a context plus the noise kernel they share.
///
/// Immutable after [`GeneratorSet::prepare`]; `Sync`, so render workers
/// can sample it concurrently.
#[derive(Debug, Clone)]
pub struct GeneratorSet<'a> {
    ctx: &'a VisualContext,
    noise: NoiseKernel,
    layers: Vec<(Pattern, f64)>,
}

impl<'a> GeneratorSet<'a> {
    /// Builds the noise kernel for the context seed and prepares every
    /// algorithm entry in order.
    pub fn prepare(ctx: &'a VisualContext) -> Self {
        let layers = ctx
            .algorithms()
            .iter()
            .map(|a| (Pattern::prepare(a.kind, ctx), a.weight))
            .collect();
        Self {
            ctx,
            noise: NoiseKernel::new(ctx.seed()),
            layers,
        }
    }

    pub fn context(&self) -> &VisualContext {
        self.ctx
    }

    pub fn noise(&self) -> &NoiseKernel {
        &self.noise
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.layers.iter().map(|(p, _)| p)
    }

    /// Weighted mean `Σ w·value / Σ w`, clamped to [0, 1].
    pub fn blend(&self, u: f64, v: f64) -> f64 {
        let mut total = 0.0;
        let mut weight_sum = 0.0;
        for (pattern, weight) in &self.layers {
            total += pattern.sample(&self.noise, u, v, self.ctx) * weight;
            weight_sum += weight;
        }
        if weight_sum > 0.0 {
            total /= weight_sum;
        }
        clamp01(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_context(seed: u64) -> VisualContext {
        let mut builder = VisualContext::builder()
            .seed(seed)
            .complexity(1.6)
            .chaos(true)
            .symmetric(true);
        for kind in AlgorithmKind::ALL {
            builder.add_algorithm(kind, 1.0);
        }
        builder.build()
    }

    #[test]
    fn prepare_preserves_kind_for_every_algorithm() {
        let ctx = VisualContext::default();
        for kind in AlgorithmKind::ALL {
            assert_eq!(Pattern::prepare(kind, &ctx).kind(), kind);
        }
    }

    #[test]
    fn complexity_counts_are_capped() {
        assert_eq!(complexity_count(1.0, 15.0, 15, MAX_TABLE_LEN), 30);
        assert_eq!(complexity_count(1e300, 15.0, 15, MAX_TABLE_LEN), MAX_TABLE_LEN);
        assert_eq!(complexity_octaves(2.0, 3.0), 8);
        assert_eq!(complexity_octaves(1e9, 4.0), MAX_OCTAVES);
    }

    #[test]
    fn huge_complexity_still_blends_in_range() {
        let mut builder = VisualContext::builder().complexity(1e9).seed(4);
        for kind in AlgorithmKind::ALL {
            builder.add_algorithm(kind, 1.0);
        }
        let ctx = builder.build();
        assert_eq!(ctx.complexity(), 1e9);
        let set = GeneratorSet::prepare(&ctx);
        for i in 0..4 {
            let u = i as f64 / 4.0;
            let value = set.blend(u, 0.5);
            assert!((0.0..=1.0).contains(&value), "blend({u}) = {value}");
        }
    }

    #[test]
    fn voxel_pattern_contributes_zero() {
        let ctx = VisualContext::default();
        let noise = NoiseKernel::new(0);
        assert_eq!(Pattern::VoxelWorld.sample(&noise, 0.3, 0.7, &ctx), 0.0);
    }

    #[test]
    fn mixing_with_voxel_halves_the_other_generator() {
        let ctx = VisualContext::builder()
            .algorithm(AlgorithmKind::Plasma, 1.0)
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .seed(6)
            .build();
        let set = GeneratorSet::prepare(&ctx);
        let plasma = Pattern::Plasma.sample(set.noise(), 0.4, 0.2, &ctx);
        assert!((set.blend(0.4, 0.2) - plasma * 0.5).abs() < 1e-12);
    }

    #[test]
    fn every_generator_stays_in_unit_range() {
        let ctx = rich_context(17);
        let set = GeneratorSet::prepare(&ctx);
        assert_eq!(set.patterns().count(), 16);
        for pattern in set.patterns() {
            for j in 0..7 {
                for i in 0..7 {
                    let (u, v) = (i as f64 / 7.0, j as f64 / 7.0);
                    let value = pattern.sample(set.noise(), u, v, &ctx);
                    assert!(
                        (0.0..=1.0).contains(&value),
                        "{} at ({u}, {v}) = {value}",
                        pattern.kind()
                    );
                }
            }
        }
    }

    #[test]
    fn identical_contexts_blend_identically() {
        let a = rich_context(23);
        let b = rich_context(23);
        let set_a = GeneratorSet::prepare(&a);
        let set_b = GeneratorSet::prepare(&b);
        for i in 0..10 {
            let u = i as f64 / 10.0;
            assert_eq!(set_a.blend(u, 1.0 - u).to_bits(), set_b.blend(u, 1.0 - u).to_bits());
        }
    }

    #[test]
    fn seed_phase_masks_to_31_bits() {
        assert_eq!(seed_phase(u64::MAX), 2_147_483_647.0);
        assert_eq!(seed_phase(42), 42.0);
    }

    #[test]
    fn generator_set_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<GeneratorSet<'static>>();
    }
}
