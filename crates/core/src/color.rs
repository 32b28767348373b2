//! 8-bit color types and the pure color math used by both renderers.
//!
//! Channels are stored as `u8`. Blends compute in `f64` and truncate back to
//! 8 bits, so a given seed produces the same bytes on every platform.

use crate::error::RenderError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque sRGB color, 8 bits per channel.
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `RenderError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, RenderError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(RenderError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| RenderError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Rgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Formats the color as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Attaches an alpha channel.
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Rec. 601 luma in [0, 1].
    pub fn luma(self) -> f64 {
        (self.r as f64 * 0.299 + self.g as f64 * 0.587 + self.b as f64 * 0.114) / 255.0
    }
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Drops the alpha channel.
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Linear interpolation of all four channels, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = clamp01(t);
        Rgba {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
            a: lerp_channel(self.a, other.a, t),
        }
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(255)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Clamps to [0, 1]; NaN maps to 0.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t) as u8
}

/// Linear interpolation between two opaque colors, `t` clamped to [0, 1].
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    Rgba::from(a).lerp(Rgba::from(b), t).rgb()
}

/// Samples an evenly spaced multi-stop gradient at `t`.
///
/// `t` is clamped to [0, 1]; `t = 0` yields the first stop and `t = 1` the
/// last. An empty slice yields black and a single stop yields that stop.
pub fn sample_gradient(stops: &[Rgb], t: f64) -> Rgb {
    match stops {
        [] => Rgb::BLACK,
        [only] => *only,
        _ => {
            let t = clamp01(t);
            let last = stops.len() - 1;
            let scaled = t * last as f64;
            let idx = scaled as usize;
            if idx >= last {
                return stops[last];
            }
            lerp_rgb(stops[idx], stops[idx + 1], scaled - idx as f64)
        }
    }
}

/// Scales each channel's distance from the Rec. 601 luma by `saturation`.
///
/// `saturation = 1` leaves the color unchanged (up to truncation), `0`
/// yields gray, values above 1 push channels apart; results are clamped.
pub fn adjust_saturation(c: Rgb, saturation: f64) -> Rgb {
    let gray = c.luma();
    let channel = |v: u8| {
        let v = v as f64 / 255.0;
        (clamp01(gray + (v - gray) * saturation) * 255.0) as u8
    };
    Rgb::new(channel(c.r), channel(c.g), channel(c.b))
}

/// Converts HSV (hue in degrees, any range; `s`, `v` in [0, 1]) to RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let s = clamp01(s);
    let v = clamp01(v);
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::new(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Moves each channel `percent`% of the way toward white.
pub fn lighten(c: Rgb, percent: u32) -> Rgb {
    let up = |v: u8| {
        let v = v as u32;
        (v + (255 - v) * percent / 100).min(255) as u8
    };
    Rgb::new(up(c.r), up(c.g), up(c.b))
}

/// Scales each channel down by `percent`%.
pub fn darken(c: Rgb, percent: u32) -> Rgb {
    let keep = 100 - percent.min(100);
    let down = |v: u8| (v as u32 * keep / 100) as u8;
    Rgb::new(down(c.r), down(c.g), down(c.b))
}

/// Snaps each channel to one of `levels` evenly spaced values.
pub fn quantize(c: Rgb, levels: u32) -> Rgb {
    let step = 255.0 / (levels.max(2) - 1) as f64;
    let snap = |v: u8| ((v as f64 / step).round() * step).min(255.0) as u8;
    Rgb::new(snap(c.r), snap(c.g), snap(c.b))
}

/// 2×2 Bayer matrix indexed `[x % 2][y % 2]`.
const BAYER_2X2: [[u8; 2]; 2] = [[0, 2], [3, 1]];

/// Adds the 2×2 ordered-dither offset for pixel `(x, y)` to every channel.
pub fn ordered_dither(c: Rgb, x: usize, y: usize) -> Rgb {
    let offset = BAYER_2X2[x % 2][y % 2];
    Rgb::new(
        c.r.saturating_add(offset),
        c.g.saturating_add(offset),
        c.b.saturating_add(offset),
    )
}

/// Composites `src` over `dst` using `src.a` as coverage.
pub fn blend_over(dst: Rgb, src: Rgba) -> Rgb {
    match src.a {
        255 => src.rgb(),
        0 => dst,
        a => {
            let alpha = a as f64 / 255.0;
            let mix = |d: u8, s: u8| (s as f64 * alpha + d as f64 * (1.0 - alpha)).round() as u8;
            Rgb::new(mix(dst.r, src.r), mix(dst.g, src.g), mix(dst.b, src.b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn from_hex_accepts_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_hex("FF8000").unwrap(), Rgb::new(255, 128, 0));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn hex_round_trip() {
        let c = Rgb::new(18, 52, 86);
        assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::new(0, 255, 16)).unwrap();
        assert_eq!(json, "\"#00ff10\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(0, 255, 16));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }

    #[test]
    fn rgba_lerp_includes_alpha() {
        let a = Rgba::new(0, 0, 0, 0);
        let b = Rgba::new(200, 100, 50, 255);
        assert_eq!(a.lerp(b, 0.5), Rgba::new(100, 50, 25, 127));
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn gradient_endpoints_return_stops() {
        let stops = [RED, Rgb::new(0, 255, 0), BLUE];
        assert_eq!(sample_gradient(&stops, 0.0), RED);
        assert_eq!(sample_gradient(&stops, 1.0), BLUE);
        assert_eq!(sample_gradient(&stops, -3.0), RED);
        assert_eq!(sample_gradient(&stops, 7.0), BLUE);
    }

    #[test]
    fn gradient_empty_is_black_and_single_is_constant() {
        assert_eq!(sample_gradient(&[], 0.4), Rgb::BLACK);
        for t in [0.0, 0.3, 1.0] {
            assert_eq!(sample_gradient(&[BLUE], t), BLUE);
        }
    }

    #[test]
    fn gradient_nan_maps_to_first_stop() {
        assert_eq!(sample_gradient(&[RED, BLUE], f64::NAN), RED);
    }

    #[test]
    fn gradient_midpoint_truncates() {
        assert_eq!(
            sample_gradient(&[Rgb::BLACK, Rgb::WHITE], 0.5),
            Rgb::new(127, 127, 127)
        );
    }

    #[test]
    fn saturation_zero_is_gray() {
        let c = adjust_saturation(Rgb::new(200, 40, 90), 0.0);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn saturation_one_preserves_gray_inputs() {
        assert_eq!(adjust_saturation(Rgb::BLACK, 1.0), Rgb::BLACK);
        assert_eq!(adjust_saturation(Rgb::WHITE, 2.5), Rgb::WHITE);
    }

    #[test]
    fn hsv_primary_sectors() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), RED);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), BLUE);
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), RED);
        assert_eq!(hsv_to_rgb(-120.0, 1.0, 1.0), BLUE);
        assert_eq!(hsv_to_rgb(77.0, 0.0, 1.0), Rgb::WHITE);
    }

    #[test]
    fn lighten_and_darken_move_toward_extremes() {
        let c = Rgb::new(100, 100, 100);
        assert_eq!(lighten(c, 25), Rgb::new(138, 138, 138));
        assert_eq!(darken(c, 30), Rgb::new(70, 70, 70));
        assert_eq!(lighten(c, 100), Rgb::WHITE);
        assert_eq!(darken(c, 100), Rgb::BLACK);
    }

    #[test]
    fn quantize_six_levels_uses_steps_of_51() {
        let q = quantize(Rgb::new(0, 30, 250), 6);
        assert_eq!(q, Rgb::new(0, 51, 255));
        for v in [q.r, q.g, q.b] {
            assert_eq!(v % 51, 0);
        }
    }

    #[test]
    fn ordered_dither_follows_bayer_layout() {
        let c = Rgb::new(10, 10, 10);
        assert_eq!(ordered_dither(c, 0, 0), c);
        assert_eq!(ordered_dither(c, 0, 1), Rgb::new(12, 12, 12));
        assert_eq!(ordered_dither(c, 1, 0), Rgb::new(13, 13, 13));
        assert_eq!(ordered_dither(c, 1, 1), Rgb::new(11, 11, 11));
        assert_eq!(ordered_dither(Rgb::WHITE, 1, 0), Rgb::WHITE);
    }

    #[test]
    fn blend_over_respects_alpha_extremes() {
        let dst = Rgb::new(10, 20, 30);
        assert_eq!(blend_over(dst, Rgba::new(200, 200, 200, 0)), dst);
        assert_eq!(
            blend_over(dst, Rgba::new(200, 100, 0, 255)),
            Rgb::new(200, 100, 0)
        );
        let half = blend_over(Rgb::BLACK, Rgba::new(255, 255, 255, 128));
        assert!(half.r > 120 && half.r < 135, "got {half:?}");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn rgb() -> impl Strategy<Value = Rgb> {
            (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
        }

        proptest! {
            #[test]
            fn gradient_between_two_stops_is_componentwise_between(
                a in rgb(),
                b in rgb(),
                t in 0.0_f64..=1.0,
            ) {
                let c = sample_gradient(&[a, b], t);
                for (lo, hi, v) in [(a.r, b.r, c.r), (a.g, b.g, c.g), (a.b, b.b, c.b)] {
                    prop_assert!(v >= lo.min(hi) && v <= lo.max(hi), "{v} not between {lo} and {hi}");
                }
            }

            #[test]
            fn saturation_one_is_near_identity(c in rgb()) {
                let out = adjust_saturation(c, 1.0);
                for (before, after) in [(c.r, out.r), (c.g, out.g), (c.b, out.b)] {
                    prop_assert!((before as i16 - after as i16).abs() <= 1);
                }
            }

            #[test]
            fn quantize_is_idempotent(c in rgb()) {
                let once = quantize(c, 6);
                prop_assert_eq!(quantize(once, 6), once);
            }
        }
    }
}
