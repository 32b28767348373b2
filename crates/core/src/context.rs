//! The visual context: everything a render reads.
//!
//! A [`VisualContext`] can only be produced by [`VisualContextBuilder::build`],
//! which normalizes weights, fills in fallbacks and clamps modifiers. Every
//! generator can therefore assume in-range inputs.

use crate::color::Rgb;
use crate::error::RenderError;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pattern algorithms a context can mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    Perlin,
    Fractal,
    Fluid,
    Geometric,
    Voronoi,
    Wave,
    Nebula,
    Plasma,
    VoxelWorld,
    Simplex,
    Warp,
    Multifractal,
    Curl,
    Cellular,
    RayMarching,
    Implicit,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 16] = [
        AlgorithmKind::Perlin,
        AlgorithmKind::Fractal,
        AlgorithmKind::Fluid,
        AlgorithmKind::Geometric,
        AlgorithmKind::Voronoi,
        AlgorithmKind::Wave,
        AlgorithmKind::Nebula,
        AlgorithmKind::Plasma,
        AlgorithmKind::VoxelWorld,
        AlgorithmKind::Simplex,
        AlgorithmKind::Warp,
        AlgorithmKind::Multifractal,
        AlgorithmKind::Curl,
        AlgorithmKind::Cellular,
        AlgorithmKind::RayMarching,
        AlgorithmKind::Implicit,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Perlin => "perlin",
            AlgorithmKind::Fractal => "fractal",
            AlgorithmKind::Fluid => "fluid",
            AlgorithmKind::Geometric => "geometric",
            AlgorithmKind::Voronoi => "voronoi",
            AlgorithmKind::Wave => "wave",
            AlgorithmKind::Nebula => "nebula",
            AlgorithmKind::Plasma => "plasma",
            AlgorithmKind::VoxelWorld => "voxel_world",
            AlgorithmKind::Simplex => "simplex",
            AlgorithmKind::Warp => "warp",
            AlgorithmKind::Multifractal => "multifractal",
            AlgorithmKind::Curl => "curl",
            AlgorithmKind::Cellular => "cellular",
            AlgorithmKind::RayMarching => "ray_marching",
            AlgorithmKind::Implicit => "implicit",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = RenderError;

    /// Case insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        AlgorithmKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| RenderError::UnknownAlgorithm(s.to_string()))
    }
}

/// One algorithm entry with its blend weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedAlgorithm {
    pub kind: AlgorithmKind,
    pub weight: f64,
}

pub const SCALE_RANGE: (f64, f64) = (0.2, 5.0);
pub const INTENSITY_RANGE: (f64, f64) = (0.3, 2.5);
pub const SATURATION_RANGE: (f64, f64) = (0.1, 3.0);
pub const ITERATIONS_RANGE: (u32, u32) = (50, 800);
/// Lower bound only; generators cap the counts they derive from it.
pub const MIN_COMPLEXITY: f64 = 0.0;

/// Validated, read-only render input.
///
/// Invariants: algorithm kinds are unique with weights summing to 1; the
/// palette is non-empty; `scale`, `intensity`, `saturation` and `iterations`
/// are within their ranges; `complexity` is finite and at least 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VisualContextBuilder")]
pub struct VisualContext {
    algorithms: Vec<WeightedAlgorithm>,
    palette: Palette,
    scale: f64,
    intensity: f64,
    complexity: f64,
    saturation: f64,
    iterations: u32,
    animation_time: f64,
    chaos: bool,
    smooth: bool,
    dark: bool,
    retro: bool,
    symmetric: bool,
    seed: u64,
}

impl VisualContext {
    pub fn builder() -> VisualContextBuilder {
        VisualContextBuilder::default()
    }

    pub fn algorithms(&self) -> &[WeightedAlgorithm] {
        &self.algorithms
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn animation_time(&self) -> f64 {
        self.animation_time
    }

    pub fn chaos(&self) -> bool {
        self.chaos
    }

    pub fn smooth(&self) -> bool {
        self.smooth
    }

    pub fn dark(&self) -> bool {
        self.dark
    }

    pub fn retro(&self) -> bool {
        self.retro
    }

    pub fn symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True when the context asks for the voxel world and nothing else.
    pub fn is_voxel_only(&self) -> bool {
        matches!(
            self.algorithms.as_slice(),
            [WeightedAlgorithm {
                kind: AlgorithmKind::VoxelWorld,
                ..
            }]
        )
    }

    /// Returns a builder pre-filled with this context's values.
    pub fn to_builder(&self) -> VisualContextBuilder {
        VisualContextBuilder {
            algorithms: self.algorithms.clone(),
            palette: self.palette.colors().to_vec(),
            scale: self.scale,
            intensity: self.intensity,
            complexity: self.complexity,
            saturation: self.saturation,
            iterations: self.iterations,
            animation_time: self.animation_time,
            chaos: self.chaos,
            smooth: self.smooth,
            dark: self.dark,
            retro: self.retro,
            symmetric: self.symmetric,
            seed: self.seed,
        }
    }
}

impl Default for VisualContext {
    fn default() -> Self {
        VisualContextBuilder::default().build()
    }
}

/// Raw, unvalidated context description.
///
/// Every field has a default, so a JSON document only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualContextBuilder {
    pub algorithms: Vec<WeightedAlgorithm>,
    pub palette: Vec<Rgb>,
    pub scale: f64,
    pub intensity: f64,
    pub complexity: f64,
    pub saturation: f64,
    pub iterations: u32,
    pub animation_time: f64,
    pub chaos: bool,
    pub smooth: bool,
    pub dark: bool,
    pub retro: bool,
    pub symmetric: bool,
    pub seed: u64,
}

impl Default for VisualContextBuilder {
    fn default() -> Self {
        Self {
            algorithms: Vec::new(),
            palette: Vec::new(),
            scale: 1.0,
            intensity: 1.0,
            complexity: 1.0,
            saturation: 1.0,
            iterations: 150,
            animation_time: 0.0,
            chaos: false,
            smooth: false,
            dark: false,
            retro: false,
            symmetric: false,
            seed: 0,
        }
    }
}

impl VisualContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to `kind`, creating the entry if it is new.
    pub fn algorithm(mut self, kind: AlgorithmKind, weight: f64) -> Self {
        self.add_algorithm(kind, weight);
        self
    }

    /// In-place form of [`algorithm`](Self::algorithm).
    pub fn add_algorithm(&mut self, kind: AlgorithmKind, weight: f64) {
        match self.algorithms.iter_mut().find(|a| a.kind == kind) {
            Some(entry) => entry.weight = add_weights(entry.weight, weight),
            None => self.algorithms.push(WeightedAlgorithm { kind, weight }),
        }
    }

    pub fn palette(mut self, palette: &Palette) -> Self {
        self.palette = palette.colors().to_vec();
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.palette.push(color);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = saturation;
        self
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn animation_time(mut self, time: f64) -> Self {
        self.animation_time = time;
        self
    }

    pub fn chaos(mut self, on: bool) -> Self {
        self.chaos = on;
        self
    }

    pub fn smooth(mut self, on: bool) -> Self {
        self.smooth = on;
        self
    }

    pub fn dark(mut self, on: bool) -> Self {
        self.dark = on;
        self
    }

    pub fn retro(mut self, on: bool) -> Self {
        self.retro = on;
        self
    }

    pub fn symmetric(mut self, on: bool) -> Self {
        self.symmetric = on;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates and freezes the context.
    ///
    /// Entries with non-positive or non-finite weight are dropped; duplicate
    /// kinds are merged. An empty result falls back to Perlin with weight 1.
    /// An empty palette falls back to the dark, soft or standard palette.
    pub fn build(self) -> VisualContext {
        let mut merged: Vec<WeightedAlgorithm> = Vec::new();
        for entry in self.algorithms {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                continue;
            }
            match merged.iter_mut().find(|a| a.kind == entry.kind) {
                Some(m) => m.weight = add_weights(m.weight, entry.weight),
                None => merged.push(entry),
            }
        }
        if merged.is_empty() {
            merged.push(WeightedAlgorithm {
                kind: AlgorithmKind::Perlin,
                weight: 1.0,
            });
        }
        // Scaling by the largest weight first keeps the sum finite.
        let largest = merged.iter().map(|a| a.weight).fold(0.0, f64::max);
        let total: f64 = merged.iter().map(|a| a.weight / largest).sum();
        for entry in &mut merged {
            entry.weight = entry.weight / largest / total;
        }

        let palette = Palette::new(self.palette)
            .unwrap_or_else(|_| Palette::fallback(self.dark, self.smooth));

        VisualContext {
            algorithms: merged,
            palette,
            scale: clamp_or(self.scale, SCALE_RANGE, 1.0),
            intensity: clamp_or(self.intensity, INTENSITY_RANGE, 1.0),
            complexity: if self.complexity.is_finite() {
                self.complexity.max(MIN_COMPLEXITY)
            } else {
                1.0
            },
            saturation: clamp_or(self.saturation, SATURATION_RANGE, 1.0),
            iterations: self.iterations.clamp(ITERATIONS_RANGE.0, ITERATIONS_RANGE.1),
            animation_time: if self.animation_time.is_finite() {
                self.animation_time
            } else {
                0.0
            },
            chaos: self.chaos,
            smooth: self.smooth,
            dark: self.dark,
            retro: self.retro,
            symmetric: self.symmetric,
            seed: self.seed,
        }
    }
}

impl From<VisualContextBuilder> for VisualContext {
    fn from(builder: VisualContextBuilder) -> Self {
        builder.build()
    }
}

/// Sum of two weights; finite operands never overflow to infinity.
fn add_weights(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == f64::INFINITY && a.is_finite() && b.is_finite() {
        f64::MAX
    } else {
        sum
    }
}

// NaN falls back to the default rather than poisoning every pixel.
fn clamp_or(v: f64, (lo, hi): (f64, f64), default: f64) -> f64 {
    if v.is_nan() {
        default
    } else {
        v.clamp(lo, hi)
    }
}
