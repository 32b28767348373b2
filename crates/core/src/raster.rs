//! Owned RGB8 raster, the single output type of every render path.

use crate::color::{blend_over, Rgb, Rgba};
use crate::error::RenderError;
use crate::field::checked_area;

/// Row-major RGB8 pixel buffer. `data().len() == width * height * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a buffer filled with `background`.
    ///
    /// Returns `RenderError::InvalidDimensions` if either dimension is zero
    /// or the byte length overflows.
    pub fn new(width: usize, height: usize, background: Rgb) -> Result<Self, RenderError> {
        let len = checked_area(width, height)?
            .checked_mul(3)
            .ok_or(RenderError::InvalidDimensions)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 3 {
            data.extend_from_slice(&[background.r, background.g, background.b]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps existing row-major RGB bytes.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RenderError> {
        let len = checked_area(width, height)?
            .checked_mul(3)
            .ok_or(RenderError::InvalidDimensions)?;
        if data.len() != len {
            return Err(RenderError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 3)
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        let i = self.offset(x as i64, y as i64)?;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Writes an opaque pixel; coordinates outside the buffer are ignored.
    pub fn put(&mut self, x: i64, y: i64, c: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.data[i] = c.r;
            self.data[i + 1] = c.g;
            self.data[i + 2] = c.b;
        }
    }

    /// Alpha-composites `c` over the existing pixel; clipped like [`put`](Self::put).
    pub fn blend(&mut self, x: i64, y: i64, c: Rgba) {
        if let Some(i) = self.offset(x, y) {
            let dst = Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]);
            let out = blend_over(dst, c);
            self.data[i] = out.r;
            self.data[i + 1] = out.g;
            self.data[i + 2] = out.b;
        }
    }

    /// Mutable RGB byte rows, `width * 3` bytes each.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let stride = self.width * 3;
        self.data.chunks_mut(stride)
    }

    /// Expands to RGBA8 with opaque alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_background() {
        let buf = PixelBuffer::new(3, 2, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(buf.data().len(), 18);
        assert!(buf.data().chunks(3).all(|p| p == [1, 2, 3]));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 5, Rgb::BLACK),
            Err(RenderError::InvalidDimensions)
        ));
    }

    #[test]
    fn put_and_get_round_trip_and_clip() {
        let mut buf = PixelBuffer::new(4, 4, Rgb::BLACK).unwrap();
        buf.put(2, 3, Rgb::WHITE);
        buf.put(-1, 0, Rgb::WHITE);
        buf.put(4, 0, Rgb::WHITE);
        assert_eq!(buf.get(2, 3), Some(Rgb::WHITE));
        assert_eq!(buf.get(4, 0), None);
        let lit = buf.data().chunks(3).filter(|p| p[0] == 255).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn blend_with_zero_alpha_keeps_pixel() {
        let mut buf = PixelBuffer::new(1, 1, Rgb::new(9, 9, 9)).unwrap();
        buf.blend(0, 0, Rgba::new(255, 0, 0, 0));
        assert_eq!(buf.get(0, 0), Some(Rgb::new(9, 9, 9)));
        buf.blend(0, 0, Rgba::new(255, 0, 0, 255));
        assert_eq!(buf.get(0, 0), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn rows_mut_yields_height_rows() {
        let mut buf = PixelBuffer::new(5, 3, Rgb::BLACK).unwrap();
        let rows: Vec<usize> = buf.rows_mut().map(|r| r.len()).collect();
        assert_eq!(rows, vec![15, 15, 15]);
    }

    #[test]
    fn to_rgba_adds_opaque_alpha() {
        let buf = PixelBuffer::from_raw(1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(buf.to_rgba(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert!(PixelBuffer::from_raw(1, 2, vec![0; 5]).is_err());
    }
}
