//! Configuration system for marker rendering and animation
//!
//! Options are grouped by concern (scale, cache, animation) and can be picked
//! from a preset profile or supplied in full, e.g. deserialized from JSON.

use crate::animation::interpolation::EasingFunction;
use crate::core::constants::{
    DEFAULT_ICON_CACHE_CAPACITY, DEFAULT_MARKER_CACHE_CAPACITY, DEFAULT_PROGRESS_STEPS,
    DEFAULT_STROKE_DP, DEFAULT_TRANSITION_DURATION_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RenderProfile {
    #[default]
    Balanced,
    LowMemory,
    HighDensity,
    Custom(RenderOptions),
}

impl RenderProfile {
    pub fn resolve(&self) -> RenderOptions {
        match self {
            Self::Balanced => RenderOptions {
                scale: ScaleConfig {
                    density: 2.0,
                    stroke_dp: DEFAULT_STROKE_DP,
                },
                cache: CacheConfig {
                    enabled: true,
                    capacity: DEFAULT_MARKER_CACHE_CAPACITY,
                    icon_capacity: DEFAULT_ICON_CACHE_CAPACITY,
                    progress_steps: DEFAULT_PROGRESS_STEPS,
                },
                animation: AnimationConfig {
                    duration_ms: DEFAULT_TRANSITION_DURATION_MS,
                    target_fps: 30,
                    easing: EasingFunction::Linear,
                },
            },
            Self::LowMemory => RenderOptions {
                scale: ScaleConfig {
                    density: 1.0,
                    stroke_dp: DEFAULT_STROKE_DP,
                },
                cache: CacheConfig {
                    enabled: true,
                    capacity: 64,
                    icon_capacity: 16,
                    progress_steps: 100,
                },
                animation: AnimationConfig {
                    duration_ms: DEFAULT_TRANSITION_DURATION_MS,
                    target_fps: 12,
                    easing: EasingFunction::Linear,
                },
            },
            Self::HighDensity => RenderOptions {
                scale: ScaleConfig {
                    density: 3.0,
                    stroke_dp: DEFAULT_STROKE_DP,
                },
                cache: CacheConfig {
                    enabled: true,
                    capacity: 2048,
                    icon_capacity: 512,
                    progress_steps: DEFAULT_PROGRESS_STEPS,
                },
                animation: AnimationConfig {
                    duration_ms: DEFAULT_TRANSITION_DURATION_MS,
                    target_fps: 60,
                    easing: EasingFunction::EaseOutCubic,
                },
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub scale: ScaleConfig,
    pub cache: CacheConfig,
    pub animation: AnimationConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderProfile::default().resolve()
    }
}

impl RenderOptions {
    /// Parses options from a JSON document; missing sections take their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Converts density-independent units into logical pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub density: f32,
    pub stroke_dp: f32,
}

impl ScaleConfig {
    pub fn px(&self, dp: f32) -> f32 {
        dp * self.effective_density()
    }

    pub fn stroke_size(&self) -> f32 {
        self.px(self.stroke_dp.max(0.0))
    }

    /// Density used for layout; non-positive or non-finite values fall back to 1.0
    pub fn effective_density(&self) -> f32 {
        if self.density.is_finite() && self.density > 0.0 {
            self.density
        } else {
            1.0
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            stroke_dp: DEFAULT_STROKE_DP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: usize,
    pub icon_capacity: usize,
    /// Quantization steps for animation progress in frame cache keys
    pub progress_steps: u32,
}

impl CacheConfig {
    /// Snaps a progress value onto the quantization grid.
    /// 0.0 and 1.0 map to themselves.
    pub fn quantize_progress(&self, t: f32) -> (u32, f32) {
        let steps = self.progress_steps.max(1);
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let step = (t * steps as f32).round() as u32;
        (step, step as f32 / steps as f32)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_MARKER_CACHE_CAPACITY,
            icon_capacity: DEFAULT_ICON_CACHE_CAPACITY,
            progress_steps: DEFAULT_PROGRESS_STEPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
    pub target_fps: u32,
    pub easing: EasingFunction,
}

impl AnimationConfig {
    /// Number of frames a transition renders, at least one
    pub fn frame_count(&self) -> u32 {
        let frames = (self.duration_ms as f64 * self.target_fps as f64 / 1000.0).round();
        (frames as u32).max(1)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.duration_ms) / self.frame_count()
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_TRANSITION_DURATION_MS,
            target_fps: 30,
            easing: EasingFunction::Linear,
        }
    }
}
