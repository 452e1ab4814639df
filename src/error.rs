//! Error types for the watermark-overlay crate.

/// Errors that can occur while compositing or handling watermarked images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse the embedded font face.
    #[error("failed to load embedded font: {0}")]
    FontLoad(ab_glyph::InvalidFont),

    /// The resized logo does not fit inside the base image at the
    /// resolved position.
    #[error(
        "logo too large for image: {width}x{height} at ({x}, {y}) exceeds {base_width}x{base_height}"
    )]
    LogoOversize {
        /// Resolved x coordinate of the logo's top-left corner.
        x: i32,
        /// Resolved y coordinate of the logo's top-left corner.
        y: i32,
        /// Resized logo width in pixels.
        width: u32,
        /// Resized logo height in pixels.
        height: u32,
        /// Base image width in pixels.
        base_width: u32,
        /// Base image height in pixels.
        base_height: u32,
    },

    /// The two regions handed to the compositor have different dimensions.
    #[error("region mismatch: overlay is {overlay_width}x{overlay_height}, base is {base_width}x{base_height}")]
    RegionMismatch {
        /// Overlay region width in pixels.
        overlay_width: u32,
        /// Overlay region height in pixels.
        overlay_height: u32,
        /// Base region width in pixels.
        base_width: u32,
        /// Base region height in pixels.
        base_height: u32,
    },

    /// No base image was provided.
    #[error("no base image provided: supply an image file or URL")]
    MissingImage,

    /// Failed to download an image over HTTP.
    #[error("failed to download image: {0}")]
    Download(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
