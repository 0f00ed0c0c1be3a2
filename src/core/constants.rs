//! Marker geometry constants, in density-independent units.
//! Multiply by `ScaleConfig::density` to get logical pixels.

/// Default outline width of the bubble and pointer.
pub const DEFAULT_STROKE_DP: f32 = 1.5;

/// Corner radius large enough to turn any bubble into a pill.
pub const BUBBLE_CORNER_RADIUS: f32 = 1000.0;

/// Half the pointer base width.
pub const POINTER_HALF_WIDTH_DP: f32 = 7.0;

/// Height of the pointer below the bubble.
pub const POINTER_HEIGHT_DP: f32 = 6.0;

/// Icon edge length relative to the size class's minimum bubble height.
pub const ICON_TO_BUBBLE_RATIO: f32 = 4.0 / 9.0;

/// Icon circle edge length relative to the icon edge length.
pub const ICON_CIRCLE_TO_ICON_RATIO: f32 = 1.5;

/// Gap between the bubble's leading edge and the icon circle.
pub const ICON_LEADING_PADDING_DP: f32 = 5.0;

/// Gap between the icon circle and the label text.
pub const ICON_TRAILING_PADDING_DP: f32 = 3.0;

/// Extra space between consecutive label lines, relative to the line height.
pub const LINE_SPACING_RATIO: f32 = 0.15;

/// Default number of quantization steps for animation progress in cache keys.
pub const DEFAULT_PROGRESS_STEPS: u32 = 10_000;

/// Default number of composited markers kept in memory.
pub const DEFAULT_MARKER_CACHE_CAPACITY: usize = 512;

/// Default number of rasterized icons kept in memory.
pub const DEFAULT_ICON_CACHE_CAPACITY: usize = 128;

/// Transition length used by the marker animator.
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 2000;
