//! # cozymark
//!
//! Map-pin marker rendering and state-transition interpolation.
//!
//! A marker description is laid out into a fixed set of elements (canvas,
//! bubble, icon, icon circle, pointer and label lines). Two element sets can
//! be blended at any progress value, and any set can be composited into a
//! raster image, with an in-memory cache in front of the compositor.

pub mod animation;
pub mod core;
pub mod marker;
pub mod prelude;
#[cfg(feature = "render")]
pub mod rendering;
pub mod text;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    color::Rgba,
    config::{AnimationConfig, CacheConfig, RenderOptions, RenderProfile, ScaleConfig},
    geometry::Rect,
};

pub use marker::{
    ElementData, ElementSetBuilder, MarkerDescription, MarkerElement, MarkerElementSet,
};

pub use animation::{interpolate, EasingFunction, Interpolator, MarkerTransition};

pub use text::{FixedPitchTypeface, TtfTypeface, Typeface};

#[cfg(feature = "render")]
pub use crate::core::{
    builder::MarkerRendererBuilder,
    renderer::{Fingerprint, MarkerRenderer, RenderStats},
};

#[cfg(feature = "render")]
pub use rendering::{MarkerCompositor, MarkerImage};

#[cfg(all(feature = "render", feature = "tokio-runtime"))]
pub use animation::TransitionPlayer;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MarkerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("Invalid marker description: {0}")]
    InvalidDescription(String),

    #[error("Unknown {field} '{value}'")]
    UnknownPaletteKey { field: &'static str, value: String },

    #[error("Font unavailable ({source_name}): {reason}")]
    FontUnavailable { source_name: String, reason: String },

    #[error("Could not allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Icon decode error: {0}")]
    IconDecode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "render")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Installs `env_logger` as the log backend, honoring `RUST_LOG`.
/// Does nothing when a logger is already installed.
#[cfg(feature = "debug")]
pub fn init_logging() {
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
