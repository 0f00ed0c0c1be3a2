//! Prelude module for common cozymark types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use cozymark::prelude::*;`

pub use crate::core::{
    color::Rgba,
    config::{AnimationConfig, CacheConfig, RenderOptions, RenderProfile, ScaleConfig},
    geometry::Rect,
};

pub use crate::marker::{
    ElementData, ElementSetBuilder, GlyphRun, MarkerColors, MarkerDescription, MarkerElement,
    MarkerElementSet, MarkerSize, MarkerState, MarkerVariant, PaletteKey, ShapeHint,
};

pub use crate::animation::{
    interpolate, EasingFunction, Interpolatable, Interpolator, MarkerTransition, TransitionPlan,
};

pub use crate::text::{FixedPitchTypeface, SharedTypeface, TextMetrics, TtfTypeface, Typeface};

#[cfg(feature = "render")]
pub use crate::core::{
    builder::MarkerRendererBuilder,
    renderer::{MarkerRenderer, RenderStats},
};

#[cfg(feature = "render")]
pub use crate::rendering::{DrawSurface, MarkerCompositor, MarkerImage, PixmapSurface};

#[cfg(feature = "render")]
pub use crate::animation::{AnimationFrame, TransitionFrames};

#[cfg(all(feature = "render", feature = "tokio-runtime"))]
pub use crate::animation::TransitionPlayer;

// Common std library re-exports
pub use std::sync::Arc;

/// Error type alias for convenience
pub type Error = crate::MarkerError;
pub use crate::Result;
