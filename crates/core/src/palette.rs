//! Ordered color stops sampled as an evenly spaced gradient.
//!
//! Sampling interpolates channel-wise in 8-bit sRGB and truncates, so the
//! mapping from scalar to pixel bytes is exact and platform independent.

use crate::color::{hsv_to_rgb, sample_gradient, Rgb};
use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// A non-empty list of colors.
///
/// Colors are evenly spaced along the `t` parameter: `sample(0.0)` returns
/// the first color, `sample(1.0)` returns the last. Serializes as a list of
/// hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette {
    colors: Vec<Rgb>,
}

const BUILTIN_NAMES: [&str; 10] = [
    "default",
    "dark",
    "soft",
    "ocean",
    "fire",
    "neon",
    "earth",
    "monochrome",
    "vapor",
    "rainbow",
];

impl Palette {
    /// Creates a palette from a list of colors. Requires at least one color.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, RenderError> {
        if colors.is_empty() {
            return Err(RenderError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex color strings.
    ///
    /// Each string can be "#rrggbb" or "rrggbb" (case insensitive).
    pub fn from_hex(hexes: &[&str]) -> Result<Self, RenderError> {
        let colors = hexes
            .iter()
            .map(|h| Rgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Resolves a palette argument: a built-in name, or a comma-separated list
    /// of hex colors such as `"#000000,#ffffff"`.
    pub fn parse(spec: &str) -> Result<Self, RenderError> {
        let spec = spec.trim();
        if spec.contains(',') || spec.starts_with('#') {
            let parts: Vec<&str> = spec
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            return Self::from_hex(&parts);
        }
        Self::from_name(spec)
    }

    /// Looks up a built-in palette by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        let palette = match name.to_ascii_lowercase().as_str() {
            "default" => Self::standard(),
            "dark" => Self::dark(),
            "soft" => Self::soft(),
            "ocean" => Self::ocean(),
            "fire" => Self::fire(),
            "neon" => Self::neon(),
            "earth" => Self::earth(),
            "monochrome" => Self::monochrome(),
            "vapor" => Self::vapor(),
            "rainbow" => Self::rainbow(),
            _ => return Err(RenderError::UnknownPalette(name.to_string())),
        };
        Ok(palette)
    }

    /// Names accepted by [`Palette::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        &BUILTIN_NAMES
    }

    /// The palette a context falls back to when it names no colors.
    pub fn fallback(dark: bool, smooth: bool) -> Self {
        if dark {
            Self::dark()
        } else if smooth {
            Self::soft()
        } else {
            Self::standard()
        }
    }

    /// Returns the number of color stops in this palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Samples the gradient at `t`, clamped to [0, 1].
    pub fn sample(&self, t: f64) -> Rgb {
        sample_gradient(&self.colors, t)
    }

    fn fixed(colors: &[Rgb]) -> Self {
        Self {
            colors: colors.to_vec(),
        }
    }

    // -- Built-in palettes --

    /// Dark blue through dodger blue to orange and white.
    pub fn standard() -> Self {
        Self::fixed(&[
            Rgb::new(0, 0, 139),
            Rgb::new(0, 0, 205),
            Rgb::new(30, 144, 255),
            Rgb::new(255, 165, 0),
            Rgb::WHITE,
        ])
    }

    /// Black, slate blue, violet and midnight blue.
    pub fn dark() -> Self {
        Self::fixed(&[
            Rgb::BLACK,
            Rgb::new(72, 61, 139),
            Rgb::new(148, 0, 211),
            Rgb::new(25, 25, 112),
        ])
    }

    /// Light pastels.
    pub fn soft() -> Self {
        Self::fixed(&[
            Rgb::new(173, 216, 230),
            Rgb::new(144, 238, 144),
            Rgb::new(255, 255, 224),
            Rgb::new(255, 240, 245),
        ])
    }

    /// Deep blues to cyan.
    pub fn ocean() -> Self {
        Self::fixed(&[
            Rgb::new(0, 31, 63),
            Rgb::new(0, 51, 102),
            Rgb::new(0, 95, 115),
            Rgb::new(10, 147, 150),
            Rgb::new(148, 210, 189),
        ])
    }

    /// Reds, oranges, yellows.
    pub fn fire() -> Self {
        Self::fixed(&[
            Rgb::new(128, 0, 0),
            Rgb::new(204, 0, 0),
            Rgb::new(255, 69, 0),
            Rgb::new(255, 140, 0),
            Rgb::new(255, 215, 0),
        ])
    }

    /// Vibrant pinks, greens, yellows.
    pub fn neon() -> Self {
        Self::fixed(&[
            Rgb::new(255, 0, 255),
            Rgb::new(0, 255, 65),
            Rgb::new(255, 255, 0),
            Rgb::new(255, 0, 128),
            Rgb::new(0, 255, 255),
        ])
    }

    /// Browns, greens, golds.
    pub fn earth() -> Self {
        Self::fixed(&[
            Rgb::new(92, 64, 51),
            Rgb::new(139, 105, 20),
            Rgb::new(107, 142, 35),
            Rgb::new(218, 165, 32),
            Rgb::new(210, 180, 140),
        ])
    }

    /// Black to white via grays.
    pub fn monochrome() -> Self {
        Self::fixed(&[
            Rgb::BLACK,
            Rgb::new(64, 64, 64),
            Rgb::new(128, 128, 128),
            Rgb::new(192, 192, 192),
            Rgb::WHITE,
        ])
    }

    /// Pastel purples, pinks, teals.
    pub fn vapor() -> Self {
        Self::fixed(&[
            Rgb::new(123, 45, 142),
            Rgb::new(199, 125, 255),
            Rgb::new(255, 158, 187),
            Rgb::new(128, 206, 214),
            Rgb::new(160, 231, 229),
        ])
    }

    /// Six fully saturated hues, 60 degrees apart.
    pub fn rainbow() -> Self {
        Self {
            colors: (0..6)
                .map(|i| hsv_to_rgb(i as f64 * 60.0, 1.0, 1.0))
                .collect(),
        }
    }
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = RenderError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self, Self::Error> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(p: Palette) -> Self {
        p.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
