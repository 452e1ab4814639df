//! Text watermark rendering.
//!
//! Text is rasterized from the embedded monospace face, drawn twice onto
//! an overlay copy of the base image (a white pass for the halo, then a
//! black pass on top), and the whole overlay is alpha-blended against the
//! original base. The halo keeps the label legible on any background.

use ab_glyph::{Font, FontRef, GlyphId, PxScale, ScaleFont};
use image::{Rgb, RgbImage};

use crate::blending;
use crate::error::Result;
use crate::position::{self, Position};

/// Font size in pixels at scale 1.0.
const BASE_FONT_PX: f32 = 24.0;

/// Glyph coverage at or above this renders the pixel; below it, nothing.
/// Hard-edged rendering keeps full-opacity overlays free of blended
/// edge tones.
const COVERAGE_THRESHOLD: f32 = 0.5;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Measured dimensions of a laid-out text string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Advance width of the whole string in pixels.
    pub width: u32,
    /// Height above the baseline (font ascent) in pixels.
    pub height: u32,
    /// Extent below the baseline (font descent) in pixels.
    pub baseline: u32,
}

/// Stroke thickness for a given scale: `max(1, round(scale * 2))`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn stroke_thickness(scale: f32) -> i32 {
    ((scale * 2.0).round() as i32).max(1)
}

fn px_scale(scale: f32) -> PxScale {
    PxScale::from(BASE_FONT_PX * scale)
}

/// Measure a text string at the given scale.
///
/// Width accumulates per-glyph advances plus kerning; height and baseline
/// come from the font's ascent and descent.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn measure_text(font: &FontRef<'_>, text: &str, scale: f32) -> TextMetrics {
    let scaled = font.as_scaled(px_scale(scale));

    let mut width = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev_id) = prev {
            width += scaled.kern(prev_id, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    TextMetrics {
        width: width.ceil() as u32,
        height: scaled.ascent().ceil() as u32,
        baseline: (-scaled.descent()).ceil().max(0.0) as u32,
    }
}

/// Overlay a text watermark onto a base image.
///
/// The string is measured at the given scale, anchored by its baseline at
/// the resolved position, and drawn black-on-white-halo onto a copy of
/// `base`. The copy is then blended against the original at the given
/// opacity. Glyph pixels outside the canvas are silently clipped, so
/// placement never fails regardless of text length.
///
/// # Errors
///
/// Propagates the compositor's region check, which cannot trip here since
/// the overlay is a copy of `base`.
pub fn place_text(
    font: &FontRef<'_>,
    base: &RgbImage,
    text: &str,
    position: Position,
    opacity: f32,
    scale: f32,
) -> Result<RgbImage> {
    let metrics = measure_text(font, text, scale);
    let (x, y) = position::resolve_text(
        position,
        base.width(),
        base.height(),
        metrics.width,
        metrics.height,
        position::MARGIN,
    );

    let stroke = stroke_thickness(scale);
    let mut overlay = base.clone();
    // Two passes emulate an outlined stroke: the white pass is dilated
    // one step wider than the black pass, leaving a rim on every side.
    draw_pass(&mut overlay, font, text, scale, (x, y), WHITE, (stroke + 2) / 2);
    draw_pass(&mut overlay, font, text, scale, (x, y), BLACK, stroke / 2);

    blending::blend_images(&overlay, base, opacity)
}

/// Draw one colored pass of the string, dilated to the given radius.
///
/// Dilation re-rasterizes the glyph run at every integer offset within a
/// disk of `radius` pixels around the origin.
fn draw_pass(
    canvas: &mut RgbImage,
    font: &FontRef<'_>,
    text: &str,
    scale: f32,
    origin: (i32, i32),
    color: Rgb<u8>,
    radius: i32,
) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            draw_glyph_run(canvas, font, text, scale, origin.0 + dx, origin.1 + dy, color);
        }
    }
}

/// Rasterize the string once with its baseline at `(origin_x, origin_y)`.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn draw_glyph_run(
    canvas: &mut RgbImage,
    font: &FontRef<'_>,
    text: &str,
    scale: f32,
    origin_x: i32,
    origin_y: i32,
    color: Rgb<u8>,
) {
    let px = px_scale(scale);
    let scaled = font.as_scaled(px);
    let canvas_w = canvas.width() as i32;
    let canvas_h = canvas.height() as i32;

    let mut cursor = origin_x as f32;
    let baseline = origin_y as f32;
    let mut prev: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev_id) = prev {
            cursor += scaled.kern(prev_id, id);
        }

        let glyph = id.with_scale_and_position(px, ab_glyph::point(cursor, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                if coverage < COVERAGE_THRESHOLD {
                    return;
                }
                let x = gx as i32 + bounds.min.x as i32;
                let y = gy as i32 + bounds.min.y as i32;
                if x >= 0 && y >= 0 && x < canvas_w && y < canvas_h {
                    #[allow(clippy::cast_sign_loss)]
                    canvas.put_pixel(x as u32, y as u32, color);
                }
            });
        }

        cursor += scaled.h_advance(id);
        prev = Some(id);
    }
}
