//! Color mapping from a blended [`Field`] to an RGB [`PixelBuffer`].
//!
//! Applies, in order: the dark-mode contrast curve, the palette gradient,
//! saturation adjustment, and retro quantization with optional dithering.

use opencip_core::color::{adjust_saturation, ordered_dither, quantize};
use opencip_core::{Field, PixelBuffer, RenderError, Rgb, VisualContext};
use rayon::prelude::*;

/// Channel levels kept by retro quantization (multiples of 51).
pub const RETRO_LEVELS: u32 = 6;

/// Saturation within this distance of 1 is treated as unchanged.
const SATURATION_EPSILON: f64 = 0.01;

/// Maps one blended value at pixel `(x, y)` to its final color.
pub fn shade(value: f64, x: usize, y: usize, ctx: &VisualContext) -> Rgb {
    let t = if ctx.dark() { value.powf(1.5) } else { value };
    let mut c = ctx.palette().sample(t);

    if (ctx.saturation() - 1.0).abs() > SATURATION_EPSILON {
        c = adjust_saturation(c, ctx.saturation());
    }

    if ctx.retro() {
        c = quantize(c, RETRO_LEVELS);
        if ctx.smooth() {
            c = ordered_dither(c, x, y);
        }
    }
    c
}

/// Shades every field value into a new pixel buffer of the same size.
pub fn field_to_pixels(field: &Field, ctx: &VisualContext) -> Result<PixelBuffer, RenderError> {
    let width = field.width();
    let mut buf = PixelBuffer::new(width, field.height(), Rgb::BLACK)?;
    buf.data_mut()
        .par_chunks_mut(width * 3)
        .zip(field.data().par_chunks(width))
        .enumerate()
        .for_each(|(y, (out, values))| {
            for (x, (px, &value)) in out.chunks_exact_mut(3).zip(values).enumerate() {
                let c = shade(value, x, y, ctx);
                px.copy_from_slice(&[c.r, c.g, c.b]);
            }
        });
    Ok(buf)
}
