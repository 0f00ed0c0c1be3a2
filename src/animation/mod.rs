pub mod interpolation;
pub mod interpolator;
pub mod transitions;

// Re-export commonly used types and functions for convenience
pub use interpolation::{EasingFunction, Interpolatable};
pub use interpolator::{interpolate, Interpolator};
pub use transitions::{MarkerTransition, TransitionPlan};

#[cfg(feature = "render")]
pub use transitions::{AnimationFrame, TransitionFrames};

#[cfg(all(feature = "render", feature = "tokio-runtime"))]
pub use transitions::TransitionPlayer;
