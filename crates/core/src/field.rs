//! Two-dimensional scalar field, the blended generator output before color
//! mapping.
//!
//! A `Field` stores `width * height` f64 values in [0, 1] in row-major
//! layout.

use crate::error::RenderError;

/// A 2D scalar field with values clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

/// Checks that both dimensions are non-zero and their product fits `usize`.
pub fn checked_area(width: usize, height: usize) -> Result<usize, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(RenderError::InvalidDimensions)
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `RenderError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        let len = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a field from existing row-major data, clamping every value to
    /// [0, 1] (NaN becomes 0).
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, RenderError> {
        let len = checked_area(width, height)?;
        if data.len() != len {
            return Err(RenderError::InvalidDimensions);
        }
        let data = data
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(x, y)`, or `None` outside the field.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Iterates `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let w = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % w, i / w, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            Field::new(0, 4),
            Err(RenderError::InvalidDimensions)
        ));
        assert!(matches!(
            Field::new(4, 0),
            Err(RenderError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_rejects_overflowing_area() {
        assert!(Field::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn from_data_clamps_and_checks_length() {
        let f = Field::from_data(2, 1, vec![-1.0, f64::NAN]).unwrap();
        assert_eq!(f.data(), &[0.0, 0.0]);
        let g = Field::from_data(1, 1, vec![7.0]).unwrap();
        assert_eq!(g.get(0, 0), Some(1.0));
        assert!(Field::from_data(2, 2, vec![0.5; 3]).is_err());
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let f = Field::new(3, 2).unwrap();
        assert_eq!(f.get(3, 0), None);
        assert_eq!(f.get(0, 2), None);
        assert_eq!(f.get(2, 1), Some(0.0));
    }

    #[test]
    fn iter_is_row_major() {
        let f = Field::from_data(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let coords: Vec<(usize, usize)> = f.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn from_data_values_always_in_unit_range(
                values in prop::collection::vec(-10.0_f64..10.0, 12),
            ) {
                let f = Field::from_data(4, 3, values).unwrap();
                for &v in f.data() {
                    prop_assert!((0.0..=1.0).contains(&v));
                }
            }
        }
    }
}
