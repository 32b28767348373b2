#![deny(unsafe_code)]
//! Isometric voxel landscape generator.
//!
//! Builds a small seeded block world (climate, biomes, heights, features)
//! and paints it into a [`PixelBuffer`] under a procedural sky. The world
//! exists only for the duration of one call.

pub mod canvas;
pub mod scene;
pub mod terrain;

use opencip_core::{NoiseKernel, PixelBuffer, RenderError, Rgb, VisualContext, Xorshift64};

pub use scene::Scene;
pub use terrain::{Biome, Block, Cell, VoxelGrid};

/// Mixed into the seed for the scene RNG so sprites and clouds do not
/// replay the terrain stream.
const SCENE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Renders the voxel scene for `ctx` at `width × height`.
///
/// Returns `RenderError::InvalidDimensions` if either dimension is zero.
/// Deterministic for a given context and size.
pub fn generate_voxel_world(
    width: usize,
    height: usize,
    ctx: &VisualContext,
) -> Result<PixelBuffer, RenderError> {
    let mut buf = PixelBuffer::new(width, height, Rgb::BLACK)?;

    let noise = NoiseKernel::new(ctx.seed());
    let mut terrain_rng = Xorshift64::new(ctx.seed());
    let grid = VoxelGrid::generate(&noise, ctx, &mut terrain_rng);
    log::debug!(
        "voxel world seed={} trees={} water={} lava={}",
        ctx.seed(),
        grid.count(Block::Tree),
        grid.count(Block::Water),
        grid.count(Block::Lava),
    );

    Scene::new(&mut buf, ctx, Xorshift64::new(ctx.seed() ^ SCENE_STREAM)).paint(&grid);
    Ok(buf)
}
