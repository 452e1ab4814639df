//! Logo watermark placement.
//!
//! A logo is resized by the scale factor, anchored at the resolved
//! position, and blended into the matching region of the base image.
//! Unlike text, a logo that does not fit is a hard error rather than a
//! silent crop.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::blending;
use crate::error::{Error, Result};
use crate::position::{self, Position};

/// Overlay a logo watermark onto a base image.
///
/// The logo is resized to `(round(w * scale), round(h * scale))` with the
/// triangle (area-weighted) filter, placed at the resolved anchor with the
/// standard margin, and alpha-blended into the region it covers. The
/// result is a new image; neither input is mutated.
///
/// # Errors
///
/// Returns [`Error::LogoOversize`] when the resized logo's bounding box
/// extends outside the base image in any direction.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn place_logo(
    base: &RgbImage,
    logo: &RgbImage,
    position: Position,
    opacity: f32,
    scale: f32,
) -> Result<RgbImage> {
    let scaled_w = ((logo.width() as f32 * scale).round() as u32).max(1);
    let scaled_h = ((logo.height() as f32 * scale).round() as u32).max(1);
    let resized = imageops::resize(logo, scaled_w, scaled_h, FilterType::Triangle);

    let (x, y) = position::resolve_logo(
        position,
        base.width(),
        base.height(),
        scaled_w,
        scaled_h,
        position::MARGIN,
    );

    let fits = x >= 0
        && y >= 0
        && x + scaled_w as i32 <= base.width() as i32
        && y + scaled_h as i32 <= base.height() as i32;
    if !fits {
        return Err(Error::LogoOversize {
            x,
            y,
            width: scaled_w,
            height: scaled_h,
            base_width: base.width(),
            base_height: base.height(),
        });
    }

    let roi = imageops::crop_imm(base, x as u32, y as u32, scaled_w, scaled_h).to_image();
    let blended = blending::blend_images(&resized, &roi, opacity)?;

    let mut out = base.clone();
    imageops::replace(&mut out, &blended, i64::from(x), i64::from(y));
    Ok(out)
}
