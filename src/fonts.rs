//! Embedded font data.
//!
//! Text watermarks use a single fixed monospace face so that measured
//! dimensions are deterministic across platforms.

/// DejaVu Sans Mono, embedded at build time.
pub(crate) const DEJAVU_SANS_MONO: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");
