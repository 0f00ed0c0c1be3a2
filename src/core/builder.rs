//! Renderer builder for fluent API configuration
//!
//! This module provides a MarkerRendererBuilder that assembles a renderer
//! from a render profile, a typeface source and cache settings.

use crate::{
    animation::interpolation::EasingFunction,
    core::{
        config::{RenderOptions, RenderProfile},
        renderer::MarkerRenderer,
    },
    text::{FixedPitchTypeface, SharedTypeface, TtfTypeface},
    Result,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Where the renderer's typeface comes from
#[derive(Debug, Clone)]
enum TypefaceSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Shared(SharedTypeface),
}

/// Builder for creating and configuring MarkerRenderer instances
#[derive(Debug, Clone, Default)]
pub struct MarkerRendererBuilder {
    /// Preset or custom options
    profile: RenderProfile,
    /// Falls back to the fixed-pitch face when unset
    typeface: Option<TypefaceSource>,
    cache_enabled: Option<bool>,
    cache_capacity: Option<usize>,
    density: Option<f32>,
    stroke_dp: Option<f32>,
    easing: Option<EasingFunction>,
}

impl MarkerRendererBuilder {
    /// Create a new MarkerRendererBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render profile
    pub fn with_profile(mut self, profile: RenderProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set custom render options
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.profile = RenderProfile::Custom(options);
        self
    }

    /// Load the typeface from a font file when building
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.typeface = Some(TypefaceSource::Path(path.into()));
        self
    }

    /// Load the typeface from font data when building
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.typeface = Some(TypefaceSource::Bytes(bytes));
        self
    }

    /// Use an already loaded typeface
    pub fn with_typeface(mut self, typeface: SharedTypeface) -> Self {
        self.typeface = Some(TypefaceSource::Shared(typeface));
        self
    }

    /// Enable or disable the image cache
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    /// Set the maximum number of cached images
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set the display density (pixels per density-independent unit)
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }

    /// Set the outline width in density-independent units
    pub fn with_stroke(mut self, stroke_dp: f32) -> Self {
        self.stroke_dp = Some(stroke_dp);
        self
    }

    /// Set the easing used by transitions
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Resolve the profile and apply individual overrides
    pub fn options(&self) -> RenderOptions {
        let mut options = self.profile.resolve();
        if let Some(enabled) = self.cache_enabled {
            options.cache.enabled = enabled;
        }
        if let Some(capacity) = self.cache_capacity {
            options.cache.capacity = capacity;
        }
        if let Some(density) = self.density {
            options.scale.density = density;
        }
        if let Some(stroke_dp) = self.stroke_dp {
            options.scale.stroke_dp = stroke_dp;
        }
        if let Some(easing) = self.easing {
            options.animation.easing = easing;
        }
        options
    }

    /// Build the renderer, loading the typeface if one was configured
    pub fn build(self) -> Result<MarkerRenderer> {
        let options = self.options();
        let typeface: SharedTypeface = match self.typeface {
            Some(TypefaceSource::Path(path)) => Arc::new(TtfTypeface::from_path(path)?),
            Some(TypefaceSource::Bytes(bytes)) => Arc::new(TtfTypeface::from_bytes(bytes)?),
            Some(TypefaceSource::Shared(typeface)) => typeface,
            None => {
                log::debug!("No typeface configured, using the fixed-pitch face");
                Arc::new(FixedPitchTypeface)
            }
        };

        Ok(MarkerRenderer::new(typeface, options))
    }
}

/// Convenience methods for common renderer configurations
impl MarkerRendererBuilder {
    /// Phone-class screens with plenty of memory
    pub fn high_density() -> Self {
        Self::new().with_profile(RenderProfile::HighDensity)
    }

    /// Small caches and coarse frame keys for constrained devices
    pub fn low_memory() -> Self {
        Self::new().with_profile(RenderProfile::LowMemory)
    }

    /// No caching; every call composites
    pub fn uncached() -> Self {
        Self::new().with_cache(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerError;

    #[test]
    fn test_overrides_apply_on_top_of_profile() {
        let options = MarkerRendererBuilder::low_memory()
            .with_density(4.0)
            .with_cache_capacity(7)
            .with_easing(EasingFunction::EaseInOutSine)
            .options();
        assert_eq!(options.scale.density, 4.0);
        assert_eq!(options.cache.capacity, 7);
        assert_eq!(options.cache.progress_steps, 100);
        assert_eq!(options.animation.easing, EasingFunction::EaseInOutSine);
    }

    #[test]
    fn test_default_build_uses_fixed_pitch_face() {
        let renderer = MarkerRendererBuilder::uncached().build().unwrap();
        assert_eq!(renderer.layout().typeface().id(), "fixed-pitch");
        assert!(!renderer.is_caching());
    }

    #[test]
    fn test_missing_font_fails_construction() {
        let err = MarkerRendererBuilder::new()
            .with_font_path("/nonexistent/font.ttf")
            .build()
            .unwrap_err();
        assert!(matches!(err, MarkerError::FontUnavailable { .. }));
    }
}
