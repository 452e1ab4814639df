//! Core watermark compositing engine and file-processing glue.

use std::path::{Path, PathBuf};

use ab_glyph::FontRef;
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::{Error, Result};
use crate::fonts;
use crate::logo;
use crate::position::Position;
use crate::text;

/// What to overlay onto a base image.
///
/// Both watermark kinds share the anchor, opacity, and scale. When both a
/// logo and text are present, the logo is applied first and the text is
/// drawn over the result; the order is fixed.
#[derive(Debug, Clone)]
pub struct WatermarkSpec {
    /// Text label to draw, if any. An empty string is treated as absent.
    pub text: Option<String>,
    /// Logo image to place, if any.
    pub logo: Option<RgbImage>,
    /// Anchor for both watermark kinds.
    pub position: Position,
    /// Blend weight of the watermark over the base, 0.0 to 1.0.
    pub opacity: f32,
    /// Logo resize factor / text size multiplier.
    pub scale: f32,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: None,
            logo: None,
            position: Position::BottomRight,
            opacity: 0.5,
            scale: 1.0,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

/// The watermark engine holding the parsed text face.
///
/// Create once with [`WatermarkEngine::new()`] and reuse for multiple
/// images. The engine parses the embedded font at initialization and is
/// otherwise stateless; concurrent use over distinct images is safe.
pub struct WatermarkEngine {
    font: FontRef<'static>,
}

impl WatermarkEngine {
    /// Create a new engine from the embedded font data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`] if the embedded font cannot be parsed
    /// (only possible with corrupted binary data).
    pub fn new() -> Result<Self> {
        let font = FontRef::try_from_slice(fonts::DEJAVU_SANS_MONO).map_err(Error::FontLoad)?;
        Ok(Self { font })
    }

    /// Apply a watermark spec to a base image.
    ///
    /// Applies the logo (when present) and then the text (when present and
    /// non-empty), each at the spec's anchor, opacity, and scale. Returns
    /// a new image; `base` is never mutated. A spec with neither watermark
    /// returns an unmodified copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogoOversize`] when the resized logo does not fit
    /// inside the base image.
    pub fn apply(&self, base: &RgbImage, spec: &WatermarkSpec) -> Result<RgbImage> {
        let mut image = match &spec.logo {
            Some(logo_img) => {
                logo::place_logo(base, logo_img, spec.position, spec.opacity, spec.scale)?
            }
            None => base.clone(),
        };

        let label = spec.text.as_deref().unwrap_or("");
        if !label.is_empty() {
            image = text::place_text(
                &self.font,
                &image,
                label,
                spec.position,
                spec.opacity,
                spec.scale,
            )?;
        }

        Ok(image)
    }

    /// Overlay a logo watermark onto a base image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogoOversize`] when the resized logo does not fit.
    #[allow(clippy::unused_self)] // method on `self` for API consistency
    pub fn apply_logo(
        &self,
        base: &RgbImage,
        logo_img: &RgbImage,
        position: Position,
        opacity: f32,
        scale: f32,
    ) -> Result<RgbImage> {
        logo::place_logo(base, logo_img, position, opacity, scale)
    }

    /// Overlay a text watermark onto a base image.
    ///
    /// Text that extends past the canvas is clipped rather than rejected.
    ///
    /// # Errors
    ///
    /// The compositing path has no reachable failure for non-empty text;
    /// the `Result` mirrors [`WatermarkEngine::apply`].
    pub fn apply_text(
        &self,
        base: &RgbImage,
        label: &str,
        position: Position,
        opacity: f32,
        scale: f32,
    ) -> Result<RgbImage> {
        text::place_text(&self.font, base, label, position, opacity, scale)
    }

    /// Measure a text string as the renderer would lay it out.
    #[must_use]
    pub fn measure_text(&self, label: &str, scale: f32) -> text::TextMetrics {
        text::measure_text(&self.font, label, scale)
    }

    /// Process a single image file: load, watermark, save.
    ///
    /// Returns a [`ProcessResult`] describing success or failure; load and
    /// save errors are captured in the message rather than propagated.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, spec: &WatermarkSpec) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            success: false,
            message: String::new(),
        };

        let base = match image::open(input) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        let composed = match self.apply(&base, spec) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to watermark: {e}");
                return result;
            }
        };

        if let Some(parent) = output.parent() {
            if !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&composed, output) {
            Ok(()) => {
                result.success = true;
                result.message = "Watermark applied".to_string();
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Apply one watermark spec to all supported images in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via
    /// rayon). Returns a [`ProcessResult`] for each image found.
    ///
    /// # Panics
    ///
    /// Panics if any directory entry has no filename (should not happen
    /// for regular files).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        spec: &WatermarkSpec,
    ) -> Vec<ProcessResult> {
        let entries: Vec<_> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .filter(|e| is_supported_image(e.path().as_path()))
                .collect(),
            Err(e) => {
                return vec![ProcessResult {
                    path: input_dir.to_path_buf(),
                    success: false,
                    message: format!("Failed to read directory: {e}"),
                }];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult {
                    path: output_dir.to_path_buf(),
                    success: false,
                    message: format!("Failed to create output directory: {e}"),
                }];
            }
        }

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries
                .par_iter()
                .map(|entry| {
                    let input_path = entry.path();
                    let filename = input_path.file_name().unwrap();
                    let output_path = output_dir.join(filename);
                    self.process_file(&input_path, &output_path, spec)
                })
                .collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries
                .iter()
                .map(|entry| {
                    let input_path = entry.path();
                    let filename = input_path.file_name().unwrap();
                    let output_path = output_dir.join(filename);
                    self.process_file(&input_path, &output_path, spec)
                })
                .collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGB image with format-specific quality settings.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let dyn_img = DynamicImage::ImageRgb8(img.clone());

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&dyn_img)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            dyn_img.save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, px: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(px))
    }

    #[test]
    fn engine_initializes_successfully() {
        assert!(WatermarkEngine::new().is_ok());
    }

    #[test]
    fn spec_defaults_match_form_defaults() {
        let spec = WatermarkSpec::default();
        assert!(spec.text.is_none());
        assert!(spec.logo.is_none());
        assert_eq!(spec.position, Position::BottomRight);
        assert!((spec.opacity - 0.5).abs() < f32::EPSILON);
        assert!((spec.scale - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn apply_without_watermarks_returns_copy() {
        let engine = WatermarkEngine::new().unwrap();
        let base = solid(50, 50, [1, 2, 3]);
        let out = engine.apply(&base, &WatermarkSpec::default()).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn apply_treats_empty_text_as_absent() {
        let engine = WatermarkEngine::new().unwrap();
        let base = solid(50, 50, [9, 9, 9]);
        let spec = WatermarkSpec {
            text: Some(String::new()),
            opacity: 1.0,
            ..WatermarkSpec::default()
        };
        let out = engine.apply(&base, &spec).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn apply_propagates_logo_oversize() {
        let engine = WatermarkEngine::new().unwrap();
        let base = solid(100, 100, [0, 0, 0]);
        let spec = WatermarkSpec {
            logo: Some(solid(150, 50, [255, 255, 255])),
            position: Position::TopRight,
            opacity: 1.0,
            ..WatermarkSpec::default()
        };
        let err = engine.apply(&base, &spec).unwrap_err();
        assert!(matches!(err, Error::LogoOversize { .. }));
    }

    #[test]
    fn apply_draws_text_over_logo() {
        let engine = WatermarkEngine::new().unwrap();
        let base = solid(200, 200, [255, 0, 0]);
        let spec = WatermarkSpec {
            // Logo fills most of the canvas so the text lands on it.
            logo: Some(solid(170, 170, [0, 0, 255])),
            text: Some("WM".to_string()),
            position: Position::Center,
            opacity: 1.0,
            scale: 1.0,
        };
        let out = engine.apply(&base, &spec).unwrap();

        // White halo pixels exist inside the logo region, so the text
        // pass ran after the logo pass.
        let mut saw_halo_on_logo = false;
        for y in 15..185 {
            for x in 15..185 {
                if out.get_pixel(x, y).0 == [255, 255, 255] {
                    saw_halo_on_logo = true;
                }
            }
        }
        assert!(saw_halo_on_logo);
    }

    #[test]
    fn default_output_path_appends_watermarked_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_watermarked.jpg"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "image_watermarked.png"
        );
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn process_file_reports_missing_input() {
        let engine = WatermarkEngine::new().unwrap();
        let result = engine.process_file(
            Path::new("/nonexistent/input.png"),
            Path::new("/nonexistent/output.png"),
            &WatermarkSpec::default(),
        );
        assert!(!result.success);
        assert!(result.message.contains("Failed to load"));
    }
}
