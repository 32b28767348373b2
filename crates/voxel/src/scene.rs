//! Paints a [`VoxelGrid`] as an isometric scene: sky, block columns with
//! water and decorations, clouds, sun and optional fog.

use crate::canvas::Painter;
use crate::terrain::{Biome, Block, VoxelGrid, GRID_SIZE, WATER_LEVEL};
use glam::DVec2;
use opencip_core::color::{darken, lighten};
use opencip_core::{PixelBuffer, Rgb, Rgba, VisualContext, Xorshift64};

/// Block face width in pixels.
pub const TILE_WIDTH: f64 = 24.0;
/// Block face height in pixels; also the vertical step between levels.
pub const TILE_HEIGHT: f64 = 12.0;

const STAR_COUNT: usize = 100;
const WATER_ALPHA: u8 = 160;

pub mod colors {
    use opencip_core::Rgb;

    pub const WATER: Rgb = Rgb::new(64, 164, 255);
    pub const SAND: Rgb = Rgb::new(219, 211, 160);
    pub const DIRT: Rgb = Rgb::new(134, 96, 67);
    pub const STONE: Rgb = Rgb::new(128, 128, 128);
    pub const SNOW: Rgb = Rgb::WHITE;
    pub const GRASS: Rgb = Rgb::new(92, 164, 68);
    pub const DRY_GRASS: Rgb = Rgb::new(150, 160, 80);
    pub const MOSS: Rgb = Rgb::new(80, 120, 60);
    pub const WOOD: Rgb = Rgb::new(184, 148, 95);
    pub const LEAF: Rgb = Rgb::new(50, 110, 40);
    pub const DRY_LEAF: Rgb = Rgb::new(180, 140, 50);
    pub const CACTUS: Rgb = Rgb::new(20, 140, 20);
    pub const OBSIDIAN: Rgb = Rgb::new(15, 11, 22);
    pub const DIAMOND: Rgb = Rgb::new(100, 219, 237);
    pub const GOLD: Rgb = Rgb::new(255, 215, 0);
    pub const LAVA: Rgb = Rgb::new(255, 90, 0);
}

/// Screen-space painter for one voxel scene. Owns the scene RNG, which is
/// independent of the stream that built the grid.
pub struct Scene<'a> {
    painter: Painter<'a>,
    ctx: &'a VisualContext,
    rng: Xorshift64,
}

impl<'a> Scene<'a> {
    pub fn new(buf: &'a mut PixelBuffer, ctx: &'a VisualContext, rng: Xorshift64) -> Self {
        Self {
            painter: Painter::new(buf),
            ctx,
            rng,
        }
    }

    /// Draws every layer in back-to-front order.
    pub fn paint(mut self, grid: &VoxelGrid) {
        self.sky();
        self.terrain(grid);
        self.clouds();
        self.sun();
        if self.ctx.smooth() {
            self.fog();
        }
    }

    fn sky(&mut self) {
        let (top, bottom) = if self.ctx.dark() {
            (Rgb::new(10, 10, 30), Rgb::new(30, 30, 60))
        } else {
            (Rgb::new(135, 206, 235), Rgb::new(200, 230, 255))
        };
        self.painter.vertical_gradient(top, bottom);

        if self.ctx.dark() {
            let (w, h) = (self.painter.width(), self.painter.height());
            for _ in 0..STAR_COUNT {
                let x = self.rng.next_usize(w) as f64;
                let y = self.rng.next_usize(h / 2) as f64;
                let size = (1 + self.rng.next_usize(2)) as f64;
                self.painter.fill_ellipse(x, y, size, size, Rgb::WHITE.into());
            }
        }
    }

    /// Columns are drawn far-to-near: `z` ascending, `x` descending.
    fn terrain(&mut self, grid: &VoxelGrid) {
        let off_x = self.painter.width() as f64 / 2.0;
        let off_y = self.painter.height() as f64 / 3.0;
        let (half_w, half_h) = (TILE_WIDTH / 2.0, TILE_HEIGHT / 2.0);

        for z in 0..GRID_SIZE {
            for x in (0..GRID_SIZE).rev() {
                let cell = grid.cell(x, z);
                let iso_x = off_x + (x as f64 - z as f64) * half_w;
                let iso_y = off_y + (x as f64 + z as f64) * half_h;

                for level in 0..cell.height {
                    let draw_y = iso_y - level as f64 * TILE_HEIGHT;
                    let color = if level == cell.height - 1 {
                        surface_color(cell.block, cell.biome)
                    } else if level > cell.height - 4 {
                        darken(colors::DIRT, 10)
                    } else {
                        darken(colors::STONE, 10)
                    };
                    self.block(iso_x, draw_y, color, 255, true);
                }

                if cell.height < WATER_LEVEL {
                    for level in cell.height..WATER_LEVEL {
                        let draw_y = iso_y - level as f64 * TILE_HEIGHT;
                        self.block(iso_x, draw_y, colors::WATER, WATER_ALPHA, false);
                    }
                }

                let surface_y = iso_y - cell.height as f64 * TILE_HEIGHT;
                self.decoration(cell.block, cell.biome, iso_x, surface_y);
            }
        }
    }

    fn decoration(&mut self, block: Block, biome: Biome, x: f64, y: f64) {
        match block {
            Block::Tree => self.tree(x, y, biome == Biome::Desert),
            Block::Cactus => self.cactus(x, y),
            Block::Obsidian => self.block(x, y, colors::OBSIDIAN, 255, true),
            Block::Diamond => self.block(x, y, colors::DIAMOND, 255, true),
            Block::Lava => self.block(x, y, colors::LAVA, 255, true),
            Block::Gold => self.block(x, y - TILE_HEIGHT, colors::GOLD, 255, true),
            _ => {}
        }
    }

    fn tree(&mut self, x: f64, y: f64, dry: bool) {
        let trunk = 2 + self.rng.next_usize(2);
        for i in 0..trunk {
            self.block(x, y - i as f64 * TILE_HEIGHT, colors::WOOD, 255, true);
        }

        let crown_y = y - trunk as f64 * TILE_HEIGHT;
        let size = 1 + self.rng.next_usize(2) as i32;
        let leaf = if dry { colors::DRY_LEAF } else { colors::LEAF };
        for cx in -size..=size {
            for cz in -size..=size {
                if cx.abs() + cz.abs() <= size + 1 && self.rng.next_f64() > 0.2 {
                    let lx = x + cx as f64 * TILE_WIDTH / 2.0 - cz as f64 * TILE_HEIGHT / 2.0;
                    let ly = crown_y - cx.abs() as f64 * 6.0 - cz.abs() as f64 * 3.0;
                    self.block(lx, ly, leaf, 255, true);
                }
            }
        }
    }

    fn cactus(&mut self, x: f64, y: f64) {
        let height = 2 + self.rng.next_usize(3);
        for i in 0..height {
            self.block(x, y - i as f64 * TILE_HEIGHT, colors::CACTUS, 255, true);
        }
        if height > 2 && self.rng.chance(0.5) {
            let arm = self.rng.next_usize(height - 1);
            let side = if self.rng.next_usize(2) == 0 { -1.0 } else { 1.0 };
            let arm_x = x + side * TILE_WIDTH / 2.0;
            self.block(arm_x, y - arm as f64 * TILE_HEIGHT, colors::CACTUS, 255, true);
            if self.rng.chance(0.3) {
                let up = y - (arm + 1) as f64 * TILE_HEIGHT;
                self.block(arm_x, up, colors::CACTUS, 255, true);
            }
        }
    }

    fn clouds(&mut self) {
        let count = (8.0 * self.ctx.intensity()) as usize;
        let (w, h) = (self.painter.width(), self.painter.height());
        let white = Rgb::WHITE.with_alpha(180);
        let shadow = Rgba::new(200, 200, 220, 100);
        for _ in 0..count {
            let nx = self.rng.next_usize(w) as f64;
            let ny = self.rng.next_usize(h / 4) as f64;
            let s = (40 + self.rng.next_usize(80)) as f64;
            self.painter.fill_ellipse(nx, ny, s, s / 2.0, white);
            self.painter
                .fill_ellipse(nx + s / 4.0, ny - s / 6.0, s / 2.0, s / 3.0, white);
            self.painter
                .fill_ellipse(nx + s / 3.0, ny + s / 4.0, s / 3.0, s / 4.0, shadow);
            if self.rng.chance(0.5) {
                self.painter
                    .fill_ellipse(nx - s / 6.0, ny + s / 8.0, s / 3.0, s / 4.0, white);
            }
        }
    }

    /// Concentric translucent glow rings, then an opaque graded core, centred
    /// 120 px from the right edge and 80 px from the top.
    fn sun(&mut self) {
        let centre = DVec2::new(self.painter.width() as f64 - 120.0, 80.0);
        for r in (3..=60).rev().step_by(3) {
            let rf = r as f64;
            let alpha = (50.0 * (1.0 - rf / 60.0)) as u8;
            let green = (255 - ((60.0 - rf) * 2.5) as i32).max(100) as u8;
            self.disc(centre, rf, Rgba::new(255, green, 0, alpha));
        }
        for r in (1..=25).rev().step_by(2) {
            let green = (255 - (25 - r) * 3).max(0) as u8;
            self.disc(centre, r as f64, Rgba::new(255, green, 50, 255));
        }
    }

    fn disc(&mut self, centre: DVec2, r: f64, c: Rgba) {
        self.painter
            .fill_ellipse(centre.x - r, centre.y - r, r * 2.0, r * 2.0, c);
    }

    fn fog(&mut self) {
        let (w, h) = (self.painter.width() as i64, self.painter.height() as i64);
        self.painter
            .fill_rect(0, h / 2, w, h / 2, Rgba::new(200, 220, 240, 40));
    }

    /// Three-faced isometric block whose left corner sits at `(x, y - h/2)`.
    /// Top is lightened, right darkened; opaque blocks get a dark outline.
    fn block(&mut self, x: f64, y: f64, color: Rgb, alpha: u8, outline: bool) {
        let (w, h) = (TILE_WIDTH, TILE_HEIGHT);
        let top = [
            DVec2::new(x, y - h / 2.0),
            DVec2::new(x + w / 2.0, y - h),
            DVec2::new(x + w, y - h / 2.0),
            DVec2::new(x + w / 2.0, y),
        ];
        let left = [
            DVec2::new(x, y - h / 2.0),
            DVec2::new(x + w / 2.0, y),
            DVec2::new(x + w / 2.0, y + h),
            DVec2::new(x, y + h / 2.0),
        ];
        let right = [
            DVec2::new(x + w / 2.0, y),
            DVec2::new(x + w, y - h / 2.0),
            DVec2::new(x + w, y + h / 2.0),
            DVec2::new(x + w / 2.0, y + h),
        ];

        let (top_shade, right_shade) = if outline { (25, 30) } else { (20, 30) };
        self.painter
            .fill_polygon(&top, lighten(color, top_shade).with_alpha(alpha));
        self.painter.fill_polygon(&left, color.with_alpha(alpha));
        self.painter
            .fill_polygon(&right, darken(color, right_shade).with_alpha(alpha));

        if outline {
            let edge = darken(color, 50);
            for face in [&top[..], &left[..], &right[..]] {
                self.painter.stroke_polygon(face, edge);
            }
        }
    }
}

/// Color of the topmost level of a column.
fn surface_color(block: Block, biome: Biome) -> Rgb {
    match block {
        Block::Water | Block::Sand => colors::SAND,
        Block::Grass if biome == Biome::Forest => colors::MOSS,
        Block::Grass => colors::GRASS,
        Block::Stone => colors::STONE,
        Block::Snow => colors::SNOW,
        Block::DryGrass => colors::DRY_GRASS,
        _ => colors::DIRT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_colors_follow_block_and_biome() {
        assert_eq!(surface_color(Block::Water, Biome::Plains), colors::SAND);
        assert_eq!(surface_color(Block::Grass, Biome::Forest), colors::MOSS);
        assert_eq!(surface_color(Block::Grass, Biome::Plains), colors::GRASS);
        assert_eq!(surface_color(Block::Tree, Biome::Plains), colors::DIRT);
        assert_eq!(surface_color(Block::Snow, Biome::Snow), Rgb::WHITE);
    }

    #[test]
    fn sky_gradient_depends_on_dark_mode() {
        let mut buf = PixelBuffer::new(4, 4, Rgb::BLACK).unwrap();
        let light = VisualContext::default();
        Scene::new(&mut buf, &light, Xorshift64::new(1)).sky();
        assert_eq!(buf.get(0, 0), Some(Rgb::new(135, 206, 235)));
        assert_eq!(buf.get(0, 3), Some(Rgb::new(200, 230, 255)));

        // Stars stay in the upper rows, so the bottom row is pure gradient.
        let dark = VisualContext::builder().dark(true).build();
        Scene::new(&mut buf, &dark, Xorshift64::new(1)).sky();
        assert_eq!(buf.get(3, 3), Some(Rgb::new(30, 30, 60)));
    }

    #[test]
    fn opaque_block_has_lit_top_and_shaded_right() {
        let ctx = VisualContext::default();
        let mut buf = PixelBuffer::new(40, 40, Rgb::BLACK).unwrap();
        let c = Rgb::new(100, 100, 100);
        Scene::new(&mut buf, &ctx, Xorshift64::new(1)).block(8.0, 20.0, c, 255, true);
        assert_eq!(buf.get(20, 14), Some(lighten(c, 25)));
        assert_eq!(buf.get(13, 22), Some(c));
        assert_eq!(buf.get(27, 22), Some(darken(c, 30)));
    }

    #[test]
    fn fog_only_touches_lower_half() {
        let ctx = VisualContext::default();
        let mut buf = PixelBuffer::new(8, 8, Rgb::BLACK).unwrap();
        Scene::new(&mut buf, &ctx, Xorshift64::new(1)).fog();
        assert_eq!(buf.get(0, 3), Some(Rgb::BLACK));
        assert_ne!(buf.get(0, 4), Some(Rgb::BLACK));
    }
}
