//! PNG output for rendered pixel buffers.
//!
//! Feature-gated behind `png` (default on) so embedders that only need raw
//! RGB bytes do not pull in the `image` crate.

use opencip_core::{PixelBuffer, RenderError};
use std::path::Path;

/// Writes `buf` as an 8-bit RGB PNG.
///
/// Returns `RenderError::InvalidDimensions` if the buffer dimensions
/// overflow `u32`, or `RenderError::Io` on encode or write failure.
pub fn write_png(buf: &PixelBuffer, path: &Path) -> Result<(), RenderError> {
    let w = u32::try_from(buf.width()).map_err(|_| RenderError::InvalidDimensions)?;
    let h = u32::try_from(buf.height()).map_err(|_| RenderError::InvalidDimensions)?;
    let img = image::RgbImage::from_raw(w, h, buf.data().to_vec())
        .ok_or_else(|| RenderError::Io("RGB buffer size mismatch".into()))?;
    img.save(path).map_err(|e| RenderError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} png to {}", w, h, path.display());
    Ok(())
}
