#![deny(unsafe_code)]
//! Render dispatch: chooses between the composite generator pipeline and
//! the voxel world for a context, and drives it with optional progress
//! reporting and cooperative cancellation.
//!
//! Both the CLI and library embedders go through [`render`] or
//! [`Renderer`]; PNG output lives in [`snapshot`] behind the `png` feature.

pub mod composite;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use opencip_core::{PixelBuffer, RenderError, VisualContext};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

pub use composite::ProgressFn;

/// The two image pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Per-pixel weighted blend of the context's generators.
    Composite,
    /// Isometric block world; taken only when it is the sole algorithm.
    Voxel,
}

impl RenderPath {
    pub fn for_context(ctx: &VisualContext) -> Self {
        if ctx.is_voxel_only() {
            RenderPath::Voxel
        } else {
            RenderPath::Composite
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderPath::Composite => "composite",
            RenderPath::Voxel => "voxel",
        }
    }
}

/// One-shot render configuration.
///
/// ```ignore
/// let cancel = AtomicBool::new(false);
/// let buf = Renderer::new(&ctx)
///     .on_progress(&|p| eprintln!("{p}%"))
///     .cancel_flag(&cancel)
///     .render(640, 480)?;
/// ```
pub struct Renderer<'a> {
    ctx: &'a VisualContext,
    progress: Option<ProgressFn<'a>>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Renderer<'a> {
    pub fn new(ctx: &'a VisualContext) -> Self {
        Self {
            ctx,
            progress: None,
            cancel: None,
        }
    }

    /// Receives percent-complete values, non-decreasing, ending at 100.
    pub fn on_progress(mut self, progress: ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Checked once per row on the composite path and between phases on the
    /// voxel path.
    pub fn cancel_flag(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn report(&self, percent: u32) {
        if let Some(cb) = self.progress {
            cb(percent);
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(|c| c.load(Ordering::Relaxed))
    }

    /// Renders a `width × height` RGB image.
    ///
    /// Returns `RenderError::InvalidDimensions` for a zero dimension and
    /// `RenderError::Cancelled` if the cancel flag was raised mid-render.
    pub fn render(&self, width: usize, height: usize) -> Result<PixelBuffer, RenderError> {
        let path = RenderPath::for_context(self.ctx);
        log::debug!(
            "render {}x{} path={} seed={} algorithms={}",
            width,
            height,
            path.name(),
            self.ctx.seed(),
            self.ctx.algorithms().len()
        );
        let started = Instant::now();

        let buf = match path {
            RenderPath::Composite => {
                let field =
                    composite::scalar_field(width, height, self.ctx, self.progress, self.cancel)?;
                pixel::field_to_pixels(&field, self.ctx)?
            }
            RenderPath::Voxel => {
                if self.cancelled() {
                    return Err(RenderError::Cancelled {
                        completed_rows: 0,
                        total_rows: height,
                    });
                }
                self.report(50);
                opencip_voxel::generate_voxel_world(width, height, self.ctx)?
            }
        };

        self.report(100);
        log::debug!("render finished in {:?}", started.elapsed());
        Ok(buf)
    }
}

/// Renders `ctx` at `width × height`, reporting percent progress to
/// `progress` if given.
pub fn render(
    width: usize,
    height: usize,
    ctx: &VisualContext,
    progress: Option<ProgressFn<'_>>,
) -> Result<PixelBuffer, RenderError> {
    let mut renderer = Renderer::new(ctx);
    renderer.progress = progress;
    renderer.render(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencip_core::{AlgorithmKind, Palette, Rgb};
    use std::sync::Mutex;

    fn mono() -> Palette {
        Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap()
    }

    #[test]
    fn perlin_fixture_seed_7() {
        let ctx = VisualContext::builder()
            .algorithm(AlgorithmKind::Perlin, 1.0)
            .palette(&mono())
            .seed(7)
            .build();
        let buf = render(4, 4, &ctx, None).unwrap();
        let expected: [[u8; 4]; 4] = [
            [127, 91, 94, 115],
            [137, 120, 120, 117],
            [127, 130, 127, 123],
            [117, 121, 128, 138],
        ];
        for (y, row) in expected.iter().enumerate() {
            for (x, &g) in row.iter().enumerate() {
                assert_eq!(buf.get(x, y), Some(Rgb::new(g, g, g)), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn path_selection() {
        let voxel = VisualContext::builder()
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .build();
        let mixed = VisualContext::builder()
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .algorithm(AlgorithmKind::Wave, 1.0)
            .build();
        assert_eq!(RenderPath::for_context(&voxel), RenderPath::Voxel);
        assert_eq!(RenderPath::for_context(&mixed), RenderPath::Composite);
        assert_eq!(
            RenderPath::for_context(&VisualContext::default()),
            RenderPath::Composite
        );
    }

    #[test]
    fn voxel_path_matches_direct_generation() {
        let ctx = VisualContext::builder()
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .seed(5)
            .build();
        let via_render = render(80, 60, &ctx, None).unwrap();
        let direct = opencip_voxel::generate_voxel_world(80, 60, &ctx).unwrap();
        assert_eq!(via_render, direct);
    }

    #[test]
    fn identical_contexts_render_identical_bytes() {
        let build = || {
            VisualContext::builder()
                .algorithm(AlgorithmKind::Nebula, 2.0)
                .algorithm(AlgorithmKind::Cellular, 1.0)
                .algorithm(AlgorithmKind::Warp, 1.0)
                .chaos(true)
                .retro(true)
                .smooth(true)
                .seed(2024)
                .build()
        };
        let a = render(24, 18, &build(), None).unwrap();
        let b = render(24, 18, &build(), None).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn symmetric_render_mirrors_pixels() {
        let ctx = VisualContext::builder()
            .algorithm(AlgorithmKind::Fluid, 1.0)
            .symmetric(true)
            .seed(3)
            .build();
        let (w, h) = (20, 14);
        let buf = render(w, h, &ctx, None).unwrap();
        for y in 0..h {
            for x in 0..w {
                assert_eq!(buf.get(x, y), buf.get(w - 1 - x, y));
                assert_eq!(buf.get(x, y), buf.get(x, h - 1 - y));
            }
        }
    }

    #[test]
    fn zero_dimensions_error_on_both_paths() {
        let voxel = VisualContext::builder()
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .build();
        for ctx in [VisualContext::default(), voxel] {
            assert_eq!(render(0, 8, &ctx, None), Err(RenderError::InvalidDimensions));
            assert_eq!(render(8, 0, &ctx, None), Err(RenderError::InvalidDimensions));
        }
    }

    #[test]
    fn progress_is_non_decreasing_and_ends_at_100() {
        let seen = Mutex::new(Vec::new());
        let record = |p: u32| seen.lock().unwrap().push(p);
        let ctx = VisualContext::default();
        Renderer::new(&ctx)
            .on_progress(&record)
            .render(3, 45)
            .unwrap();
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    }

    #[test]
    fn voxel_progress_reports_half_then_done() {
        let seen = Mutex::new(Vec::new());
        let record = |p: u32| seen.lock().unwrap().push(p);
        let ctx = VisualContext::builder()
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .build();
        Renderer::new(&ctx)
            .on_progress(&record)
            .render(32, 32)
            .unwrap();
        assert_eq!(seen.into_inner().unwrap(), vec![50, 100]);
    }

    #[test]
    fn raised_cancel_flag_aborts_both_paths() {
        let cancel = AtomicBool::new(true);
        let voxel = VisualContext::builder()
            .algorithm(AlgorithmKind::VoxelWorld, 1.0)
            .build();
        for ctx in [VisualContext::default(), voxel] {
            let result = Renderer::new(&ctx).cancel_flag(&cancel).render(16, 16);
            assert!(matches!(result, Err(RenderError::Cancelled { .. })));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn buffer_length_matches_dimensions(
                width in 1_usize..24,
                height in 1_usize..24,
                seed: u64,
                dark: bool,
                retro: bool,
            ) {
                let ctx = VisualContext::builder()
                    .algorithm(AlgorithmKind::Geometric, 1.0)
                    .algorithm(AlgorithmKind::Simplex, 1.0)
                    .dark(dark)
                    .retro(retro)
                    .seed(seed)
                    .build();
                let buf = render(width, height, &ctx, None).unwrap();
                prop_assert_eq!(buf.data().len(), width * height * 3);
            }
        }
    }
}
