//! Overlay text and logo watermarks onto images.
//!
//! A watermark is a text label, a logo image, or both, placed at one of
//! five anchors with a configurable opacity and scale. Logos are resized
//! and alpha-blended into the region they cover; text is drawn as a black
//! label with a white halo and blended over the whole canvas. When both
//! are supplied, the logo is applied first.
//!
//! # Quick Start
//!
//! ```no_run
//! use watermark_overlay::{Position, WatermarkEngine, WatermarkSpec};
//!
//! let engine = WatermarkEngine::new().expect("failed to init engine");
//! let base = image::open("photo.jpg").unwrap().to_rgb8();
//!
//! let spec = WatermarkSpec {
//!     text: Some("Copyright 2025".to_string()),
//!     position: Position::BottomRight,
//!     opacity: 0.7,
//!     ..WatermarkSpec::default()
//! };
//!
//! let composed = engine.apply(&base, &spec).unwrap();
//! composed.save("photo_watermarked.png").unwrap();
//! ```
//!
//! # Logo watermarks
//!
//! A logo that would extend outside the base image at its resolved
//! position is rejected with [`Error::LogoOversize`] rather than cropped,
//! so a misconfigured scale never silently truncates the mark.
//!
//! ```no_run
//! use watermark_overlay::{Position, WatermarkEngine, WatermarkSpec};
//!
//! let engine = WatermarkEngine::new().expect("failed to init engine");
//! let base = image::open("photo.jpg").unwrap().to_rgb8();
//! let logo = image::open("logo.png").unwrap().to_rgb8();
//!
//! let composed = engine
//!     .apply_logo(&base, &logo, Position::TopLeft, 0.5, 0.25)
//!     .unwrap();
//! ```

#![deny(missing_docs)]

pub mod blending;
mod engine;
pub mod error;
#[cfg(feature = "cli")]
pub mod fetch;
mod fonts;
pub mod logo;
pub mod position;
pub mod text;

pub use engine::{
    default_output_path, is_supported_image, save_image, ProcessResult, WatermarkEngine,
    WatermarkSpec,
};
pub use error::{Error, Result};
pub use position::{Position, MARGIN};
pub use text::TextMetrics;
