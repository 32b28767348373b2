//! Terrain synthesis on a fixed 20×20 grid: climate, heights, biomes,
//! surface blocks and feature placement.

use opencip_core::{NoiseKernel, VisualContext, Xorshift64};

/// Cells per side of the voxel grid.
pub const GRID_SIZE: usize = 20;
pub const MIN_HEIGHT: i32 = 1;
pub const MAX_HEIGHT: i32 = 14;
/// Columns lower than this are topped up with translucent water.
pub const WATER_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Snow,
    Desert,
    Forest,
    Plains,
}

impl Biome {
    /// First matching threshold wins: cold, then hot and dry, then wet.
    pub fn from_climate(temperature: f64, humidity: f64) -> Self {
        match (temperature, humidity) {
            (t, _) if t < -0.3 => Biome::Snow,
            (t, h) if t > 0.4 && h < -0.2 => Biome::Desert,
            (_, h) if h > 0.3 => Biome::Forest,
            _ => Biome::Plains,
        }
    }
}

/// Surface block of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Water,
    Sand,
    Grass,
    Stone,
    Snow,
    DryGrass,
    Tree,
    Cactus,
    Obsidian,
    Diamond,
    Gold,
    Lava,
}

impl Block {
    /// Height bands: water, sand, biome-dependent cover, stone, snow caps.
    pub fn for_height(height: i32, biome: Biome) -> Self {
        match height {
            h if h < 3 => Block::Water,
            h if h < 5 => Block::Sand,
            h if h < 10 => match biome {
                Biome::Snow => Block::Snow,
                Biome::Desert => Block::DryGrass,
                Biome::Forest | Biome::Plains => Block::Grass,
            },
            h if h < 13 => Block::Stone,
            _ => Block::Snow,
        }
    }
}

/// One grid column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub height: i32,
    pub block: Block,
    pub biome: Biome,
    pub temperature: f64,
    pub humidity: f64,
}

/// The synthesized world. Rebuilt for every render and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    cells: Vec<Cell>,
}

impl VoxelGrid {
    /// Runs all terrain phases in order: climate and heights, features,
    /// then biome-edge smoothing. All randomness comes from `rng`.
    pub fn generate(noise: &NoiseKernel, ctx: &VisualContext, rng: &mut Xorshift64) -> Self {
        let mut grid = Self::synthesize(noise, ctx, rng);
        grid.place_features(rng);
        grid.smooth_biome_edges(rng);
        grid
    }

    fn index(x: usize, z: usize) -> usize {
        z * GRID_SIZE + x
    }

    /// Cell at column `(x, z)`. Panics outside the grid.
    pub fn cell(&self, x: usize, z: usize) -> &Cell {
        &self.cells[Self::index(x, z)]
    }

    fn cell_mut(&mut self, x: usize, z: usize) -> &mut Cell {
        &mut self.cells[Self::index(x, z)]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of columns topped with `block`.
    pub fn count(&self, block: Block) -> usize {
        self.cells.iter().filter(|c| c.block == block).count()
    }

    fn synthesize(noise: &NoiseKernel, ctx: &VisualContext, rng: &mut Xorshift64) -> Self {
        let mut climate = vec![(0.0, 0.0); GRID_SIZE * GRID_SIZE];
        for x in 0..GRID_SIZE {
            for z in 0..GRID_SIZE {
                let nx = x as f64 * 0.1;
                let nz = z as f64 * 0.1;
                climate[Self::index(x, z)] = (
                    noise.fbm(nx + 100.0, nz, 2, 0.5),
                    noise.fbm(nx, nz + 200.0, 2, 0.5),
                );
            }
        }

        let mut cells = vec![
            Cell {
                height: MIN_HEIGHT,
                block: Block::Water,
                biome: Biome::Plains,
                temperature: 0.0,
                humidity: 0.0,
            };
            GRID_SIZE * GRID_SIZE
        ];
        for x in 0..GRID_SIZE {
            for z in 0..GRID_SIZE {
                let nx = x as f64 * 0.3 * ctx.scale() + rng.next_f64() * 0.1;
                let nz = z as f64 * 0.3 * ctx.scale() + rng.next_f64() * 0.1;

                let raw = noise.fbm(nx, nz, 4, 0.5) + noise.fbm(nx * 2.0, nz * 2.0, 2, 0.5) * 0.5;
                let height =
                    (((raw + 1.0) * 4.0 * ctx.intensity()) as i32 + 2).clamp(MIN_HEIGHT, MAX_HEIGHT);

                let (temperature, humidity) = climate[Self::index(x, z)];
                let biome = Biome::from_climate(temperature, humidity);
                cells[Self::index(x, z)] = Cell {
                    height,
                    block: Block::for_height(height, biome),
                    biome,
                    temperature,
                    humidity,
                };
            }
        }
        Self { cells }
    }

    /// Ordered first-match feature pass over the interior (two-cell margin).
    /// A probability is drawn only once its block condition holds, so the
    /// draw sequence depends on the terrain.
    fn place_features(&mut self, rng: &mut Xorshift64) {
        for x in 2..GRID_SIZE - 2 {
            for z in 2..GRID_SIZE - 2 {
                let cell = self.cell_mut(x, z);
                let block = cell.block;
                let feature = if matches!(block, Block::Grass | Block::DryGrass) && rng.chance(0.12)
                {
                    Some(Block::Tree)
                } else if cell.biome == Biome::Desert && block == Block::Sand && rng.chance(0.08) {
                    Some(Block::Cactus)
                } else if block == Block::Stone && rng.chance(0.03) {
                    Some(Block::Obsidian)
                } else if block == Block::Grass && rng.chance(0.015) {
                    Some(Block::Diamond)
                } else if block == Block::Stone && rng.chance(0.02) {
                    Some(Block::Gold)
                } else if block == Block::Water && rng.chance(0.05) && cell.height < 2 {
                    Some(Block::Lava)
                } else {
                    None
                };
                if let Some(f) = feature {
                    cell.block = f;
                }
            }
        }
    }

    /// Grass on a biome boundary (right or lower neighbour differs) turns
    /// dry with probability 0.3.
    fn smooth_biome_edges(&mut self, rng: &mut Xorshift64) {
        for x in 1..GRID_SIZE - 1 {
            for z in 1..GRID_SIZE - 1 {
                let biome = self.cell(x, z).biome;
                let edge = biome != self.cell(x + 1, z).biome || biome != self.cell(x, z + 1).biome;
                if edge && rng.chance(0.3) {
                    let cell = self.cell_mut(x, z);
                    if cell.block == Block::Grass {
                        cell.block = Block::DryGrass;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_for(ctx: &VisualContext) -> VoxelGrid {
        let noise = NoiseKernel::new(ctx.seed());
        let mut rng = Xorshift64::new(ctx.seed());
        VoxelGrid::generate(&noise, ctx, &mut rng)
    }

    #[test]
    fn biome_thresholds() {
        assert_eq!(Biome::from_climate(-0.5, 0.9), Biome::Snow);
        assert_eq!(Biome::from_climate(0.5, -0.5), Biome::Desert);
        assert_eq!(Biome::from_climate(0.5, 0.5), Biome::Forest);
        assert_eq!(Biome::from_climate(0.0, 0.0), Biome::Plains);
        assert_eq!(Biome::from_climate(0.4, -0.5), Biome::Plains);
    }

    #[test]
    fn block_bands() {
        assert_eq!(Block::for_height(1, Biome::Plains), Block::Water);
        assert_eq!(Block::for_height(2, Biome::Desert), Block::Water);
        assert_eq!(Block::for_height(4, Biome::Snow), Block::Sand);
        assert_eq!(Block::for_height(7, Biome::Snow), Block::Snow);
        assert_eq!(Block::for_height(7, Biome::Desert), Block::DryGrass);
        assert_eq!(Block::for_height(9, Biome::Forest), Block::Grass);
        assert_eq!(Block::for_height(12, Biome::Plains), Block::Stone);
        assert_eq!(Block::for_height(13, Biome::Plains), Block::Snow);
    }

    #[test]
    fn grid_has_every_column() {
        let grid = grid_for(&VisualContext::default());
        assert_eq!(grid.cells().len(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn features_stay_off_the_margin() {
        for seed in 0..20 {
            let grid = grid_for(&VisualContext::builder().seed(seed).build());
            for x in 0..GRID_SIZE {
                for z in 0..GRID_SIZE {
                    let interior = (2..GRID_SIZE - 2).contains(&x) && (2..GRID_SIZE - 2).contains(&z);
                    let feature = matches!(
                        grid.cell(x, z).block,
                        Block::Tree
                            | Block::Cactus
                            | Block::Obsidian
                            | Block::Diamond
                            | Block::Gold
                            | Block::Lava
                    );
                    assert!(interior || !feature, "feature at margin ({x}, {z})");
                }
            }
        }
    }

    #[test]
    fn lava_only_on_lowest_columns() {
        for seed in 0..40 {
            let grid = grid_for(&VisualContext::builder().seed(seed).intensity(0.3).build());
            for cell in grid.cells() {
                if cell.block == Block::Lava {
                    assert_eq!(cell.height, 1);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_grid() {
        let ctx = VisualContext::builder().seed(77).build();
        assert_eq!(grid_for(&ctx), grid_for(&ctx));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn heights_and_biomes_in_range(
                seed: u64,
                intensity in 0.3_f64..2.5,
                scale in 0.2_f64..5.0,
            ) {
                let ctx = VisualContext::builder()
                    .seed(seed)
                    .intensity(intensity)
                    .scale(scale)
                    .build();
                let grid = grid_for(&ctx);
                for cell in grid.cells() {
                    prop_assert!((MIN_HEIGHT..=MAX_HEIGHT).contains(&cell.height));
                    prop_assert!(matches!(
                        cell.biome,
                        Biome::Snow | Biome::Desert | Biome::Forest | Biome::Plains
                    ));
                }
            }
        }
    }
}
