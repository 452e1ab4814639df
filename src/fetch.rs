//! Download of a base image over HTTP.
//!
//! URL input is a CLI convenience; the compositing engine itself never
//! touches the network.

use std::time::Duration;

use image::RgbImage;

use crate::error::{Error, Result};

/// Timeout for the whole download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Download an image from a URL and decode it to an RGB buffer.
///
/// # Errors
///
/// Returns [`Error::Download`] on connection failures, timeouts, or
/// non-success HTTP statuses, and [`Error::Image`] when the body is not a
/// decodable image.
pub fn download_image(url: &str) -> Result<RgbImage> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| Error::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| Error::Download(e.to_string()))?;

    let bytes = response
        .bytes()
        .map_err(|e| Error::Download(e.to_string()))?;

    let img = image::load_from_memory(&bytes)?;
    Ok(img.to_rgb8())
}
