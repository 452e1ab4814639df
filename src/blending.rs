//! Alpha blending math for watermark compositing.
//!
//! Watermarks are applied via forward alpha blending:
//! `output = opacity * overlay + (1 - opacity) * base`
//!
//! The same blend serves whole-image text overlays and cropped logo
//! regions of interest.

use image::RgbImage;

use crate::error::{Error, Result};

/// Blend an overlay region over a base region by a constant opacity.
///
/// Per pixel and channel the result is
/// `opacity * overlay + (1 - opacity) * base`, rounded to the nearest
/// integer and clamped to `[0, 255]`. Both inputs are read-only; a fresh
/// buffer of the same dimensions is returned.
///
/// Opacity values outside `[0, 1]` are not rejected; the per-channel
/// clamp bounds the output.
///
/// # Errors
///
/// Returns [`Error::RegionMismatch`] when the two regions differ in
/// dimensions.
pub fn blend_images(overlay: &RgbImage, base: &RgbImage, opacity: f32) -> Result<RgbImage> {
    if overlay.dimensions() != base.dimensions() {
        return Err(Error::RegionMismatch {
            overlay_width: overlay.width(),
            overlay_height: overlay.height(),
            base_width: base.width(),
            base_height: base.height(),
        });
    }

    let inv_opacity = 1.0 - opacity;
    let mut out = RgbImage::new(base.width(), base.height());

    for (dst, (over, under)) in out
        .pixels_mut()
        .zip(overlay.pixels().zip(base.pixels()))
    {
        for ch in 0..3 {
            let blended = opacity * f32::from(over[ch]) + inv_opacity * f32::from(under[ch]);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                dst[ch] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, px: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(px))
    }

    #[test]
    fn blend_with_itself_is_identity() {
        let img = solid(8, 8, [37, 140, 251]);
        for opacity in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let out = blend_images(&img, &img, opacity).unwrap();
            assert_eq!(out, img, "opacity {opacity}");
        }
    }

    #[test]
    fn opacity_zero_returns_base() {
        let overlay = solid(4, 4, [255, 0, 0]);
        let base = solid(4, 4, [0, 0, 255]);
        let out = blend_images(&overlay, &base, 0.0).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn opacity_one_returns_overlay() {
        let overlay = solid(4, 4, [255, 0, 0]);
        let base = solid(4, 4, [0, 0, 255]);
        let out = blend_images(&overlay, &base, 1.0).unwrap();
        assert_eq!(out, overlay);
    }

    #[test]
    fn half_opacity_black_over_white_is_mid_gray() {
        let overlay = solid(50, 50, [0, 0, 0]);
        let base = solid(50, 50, [255, 255, 255]);
        let out = blend_images(&overlay, &base, 0.5).unwrap();
        for px in out.pixels() {
            for ch in 0..3 {
                let diff = (i32::from(px[ch]) - 127).abs();
                assert!(diff <= 1, "channel {ch} was {}", px[ch]);
            }
        }
    }

    #[test]
    fn mismatched_regions_are_rejected() {
        let overlay = solid(4, 4, [1, 2, 3]);
        let base = solid(4, 5, [1, 2, 3]);
        let err = blend_images(&overlay, &base, 0.5).unwrap_err();
        assert!(matches!(err, Error::RegionMismatch { .. }));
    }

    #[test]
    fn out_of_range_opacity_is_clamped_per_channel() {
        let overlay = solid(2, 2, [200, 200, 200]);
        let base = solid(2, 2, [100, 100, 100]);

        // 1.5 * 200 - 0.5 * 100 = 250, still in range
        let boosted = blend_images(&overlay, &base, 1.5).unwrap();
        assert_eq!(boosted.get_pixel(0, 0), &Rgb([250, 250, 250]));

        // 2.0 * 200 - 1.0 * 100 = 300, clamps to 255
        let clamped = blend_images(&overlay, &base, 2.0).unwrap();
        assert_eq!(clamped.get_pixel(0, 0), &Rgb([255, 255, 255]));

        // -0.5 * 200 + 1.5 * 100 = 50
        let negative = blend_images(&overlay, &base, -0.5).unwrap();
        assert_eq!(negative.get_pixel(0, 0), &Rgb([50, 50, 50]));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let overlay = solid(3, 3, [10, 20, 30]);
        let base = solid(3, 3, [40, 50, 60]);
        let overlay_before = overlay.clone();
        let base_before = base.clone();
        let _ = blend_images(&overlay, &base, 0.7).unwrap();
        assert_eq!(overlay, overlay_before);
        assert_eq!(base, base_before);
    }
}
