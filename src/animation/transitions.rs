//! Marker state transitions: frame planning, lazy frame rendering and timed
//! playback.

use crate::animation::interpolator::Interpolator;
use crate::core::config::AnimationConfig;
use crate::marker::{ElementSetBuilder, MarkerDescription};
use std::time::Duration;

/// Progress values of every frame of a transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    progress: Vec<f32>,
    interval: Duration,
}

impl TransitionPlan {
    /// Frame `i` of `n` sits at `easing(i / n)` for `i` in `1..=n`, so the
    /// last frame always shows the end state.
    pub fn new(config: &AnimationConfig) -> Self {
        let frames = config.frame_count();
        let progress = (1..=frames)
            .map(|index| config.easing.apply(index as f32 / frames as f32))
            .collect();
        Self {
            progress,
            interval: config.frame_interval(),
        }
    }

    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    pub fn frame_count(&self) -> usize {
        self.progress.len()
    }

    /// Delay between two frames
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Animation from one marker description to another
#[derive(Debug, Clone)]
pub struct MarkerTransition {
    start: MarkerDescription,
    end: MarkerDescription,
    plan: TransitionPlan,
}

impl MarkerTransition {
    pub fn new(start: MarkerDescription, end: MarkerDescription, config: &AnimationConfig) -> Self {
        Self {
            start,
            end,
            plan: TransitionPlan::new(config),
        }
    }

    pub fn start(&self) -> &MarkerDescription {
        &self.start
    }

    pub fn end(&self) -> &MarkerDescription {
        &self.end
    }

    pub fn plan(&self) -> &TransitionPlan {
        &self.plan
    }

    /// Whether the marker ends up smaller than its first frame. Shrinking
    /// markers are drawn below the markers around them while animating.
    pub fn is_shrinking(&self, layout: &ElementSetBuilder) -> crate::Result<bool> {
        let start = layout.build(&self.start)?;
        let end = layout.build(&self.end)?;
        let interpolator = Interpolator::new();

        let first = self.plan.progress.first().copied().unwrap_or(1.0);
        let last = self.plan.progress.last().copied().unwrap_or(1.0);
        let first_area = interpolator.interpolate(&start, &end, first).extent().area();
        let last_area = interpolator.interpolate(&start, &end, last).extent().area();
        Ok(last_area < first_area)
    }
}

#[cfg(feature = "render")]
mod frames {
    use super::MarkerTransition;
    use crate::core::renderer::MarkerRenderer;
    use crate::rendering::MarkerImage;
    use std::sync::Arc;

    /// Rendered frame of a transition
    #[derive(Debug, Clone)]
    pub struct AnimationFrame {
        pub index: usize,
        pub progress: f32,
        pub image: Arc<MarkerImage>,
    }

    /// Renders transition frames on demand; dropping it stops the animation
    pub struct TransitionFrames<'a> {
        renderer: &'a MarkerRenderer,
        transition: &'a MarkerTransition,
        next: usize,
    }

    impl Iterator for TransitionFrames<'_> {
        type Item = crate::Result<AnimationFrame>;

        fn next(&mut self) -> Option<Self::Item> {
            let index = self.next;
            let progress = *self.transition.plan.progress.get(index)?;
            self.next += 1;
            Some(
                self.renderer
                    .render_transition(&self.transition.start, &self.transition.end, progress)
                    .map(|image| AnimationFrame {
                        index,
                        progress,
                        image,
                    }),
            )
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            let remaining = self.transition.plan.frame_count() - self.next;
            (remaining, Some(remaining))
        }
    }

    impl MarkerTransition {
        pub fn frames<'a>(&'a self, renderer: &'a MarkerRenderer) -> TransitionFrames<'a> {
            TransitionFrames {
                renderer,
                transition: self,
                next: 0,
            }
        }
    }
}

#[cfg(feature = "render")]
pub use frames::{AnimationFrame, TransitionFrames};

#[cfg(all(feature = "render", feature = "tokio-runtime"))]
mod player {
    use super::{AnimationFrame, MarkerTransition};
    use crate::core::renderer::MarkerRenderer;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;

    /// Plays transitions at their frame rate on the tokio runtime
    #[derive(Debug, Clone)]
    pub struct TransitionPlayer {
        renderer: Arc<MarkerRenderer>,
        buffer: usize,
    }

    impl TransitionPlayer {
        pub fn new(renderer: Arc<MarkerRenderer>) -> Self {
            Self {
                renderer,
                buffer: 4,
            }
        }

        /// Number of frames that may wait in the channel
        pub fn with_buffer(mut self, buffer: usize) -> Self {
            self.buffer = buffer.max(1);
            self
        }

        /// Spawns playback and returns the frame receiver. Playback ends after
        /// the last frame, after the first failed frame, or as soon as the
        /// receiver is dropped. Must be called inside a tokio runtime.
        pub fn play(
            &self,
            transition: MarkerTransition,
        ) -> (mpsc::Receiver<crate::Result<AnimationFrame>>, JoinHandle<()>) {
            let (sender, receiver) = mpsc::channel(self.buffer);
            let renderer = Arc::clone(&self.renderer);

            let handle = tokio::spawn(async move {
                let period = transition.plan().interval().max(Duration::from_millis(1));
                let mut ticker = tokio::time::interval(period);

                for frame in transition.frames(&renderer) {
                    ticker.tick().await;
                    let failed = frame.is_err();
                    if sender.send(frame).await.is_err() {
                        log::debug!("Transition receiver dropped, stopping playback");
                        return;
                    }
                    if failed {
                        return;
                    }
                }
            });

            (receiver, handle)
        }
    }
}

#[cfg(all(feature = "render", feature = "tokio-runtime"))]
pub use player::TransitionPlayer;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::interpolation::EasingFunction;
    use crate::core::config::ScaleConfig;
    use crate::text::FixedPitchTypeface;
    use std::sync::Arc;

    fn config(frames_per_second: u32) -> AnimationConfig {
        AnimationConfig {
            duration_ms: 1000,
            target_fps: frames_per_second,
            easing: EasingFunction::EaseOutQuad,
        }
    }

    #[test]
    fn test_plan_ends_at_one() {
        let plan = TransitionPlan::new(&config(10));
        assert_eq!(plan.frame_count(), 10);
        assert_eq!(plan.progress().last().copied(), Some(1.0));
        assert!(plan.progress().windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(plan.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_shrinking_detection() {
        let layout = ElementSetBuilder::new(Arc::new(FixedPitchTypeface), ScaleConfig::default());
        let long = MarkerDescription::new("Two bedroom apartment");
        let short = MarkerDescription::new("2");

        let shrinking = MarkerTransition::new(long.clone(), short.clone(), &config(10));
        assert!(shrinking.is_shrinking(&layout).unwrap());

        let growing = MarkerTransition::new(short, long, &config(10));
        assert!(!growing.is_shrinking(&layout).unwrap());
    }

    #[cfg(feature = "render")]
    #[test]
    fn test_frames_are_lazy() {
        use crate::core::builder::MarkerRendererBuilder;

        let renderer = MarkerRendererBuilder::new().build().unwrap();
        let transition = MarkerTransition::new(
            MarkerDescription::new("1"),
            MarkerDescription::new("1").selected(true),
            &config(10),
        );

        let mut frames = transition.frames(&renderer);
        assert_eq!(frames.size_hint(), (10, Some(10)));
        let first = frames.next().unwrap().unwrap();
        assert_eq!(first.index, 0);
        drop(frames);
        assert_eq!(renderer.stats().composites(), 1);
    }
}
