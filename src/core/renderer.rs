//! Renderer facade: layout, interpolation, compositing and the image cache
//! behind one handle.

use crate::animation::interpolator::Interpolator;
use crate::core::config::RenderOptions;
use crate::marker::{ElementSetBuilder, MarkerDescription, MarkerElementSet};
use crate::rendering::{CacheLookup, MarkerCache, MarkerCompositor, MarkerImage};
use crate::text::SharedTypeface;
use crate::Result;
use fxhash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Content key of a rendered image
///
/// Static renders leave `end` and `progress_step` empty. Float parameters are
/// keyed by their bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub start: MarkerDescription,
    pub end: Option<MarkerDescription>,
    pub progress_step: Option<u32>,
    pub font_id: String,
    pub stroke_bits: u32,
    pub density_bits: u32,
}

impl Fingerprint {
    /// Short hash for log lines
    pub fn digest(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Counters of compositing work
#[derive(Debug, Default)]
pub struct RenderStats {
    composites: AtomicU64,
    cache_hits: AtomicU64,
}

impl RenderStats {
    /// Number of compositing passes run so far
    pub fn composites(&self) -> u64 {
        self.composites.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }
}

/// Renders marker descriptions and transition frames into images
#[derive(Debug)]
pub struct MarkerRenderer {
    layout: ElementSetBuilder,
    interpolator: Interpolator,
    compositor: MarkerCompositor,
    cache: Option<MarkerCache<Fingerprint>>,
    options: RenderOptions,
    stats: RenderStats,
}

impl MarkerRenderer {
    pub fn new(typeface: SharedTypeface, options: RenderOptions) -> Self {
        let layout = ElementSetBuilder::new(Arc::clone(&typeface), options.scale.clone());
        let compositor = MarkerCompositor::new(
            typeface,
            layout.stroke_size(),
            options.cache.icon_capacity,
        );
        let cache = options
            .cache
            .enabled
            .then(|| MarkerCache::new(options.cache.capacity));

        Self {
            layout,
            interpolator: Interpolator::new(),
            compositor,
            cache,
            options,
            stats: RenderStats::default(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn layout(&self) -> &ElementSetBuilder {
        &self.layout
    }

    pub fn compositor(&self) -> &MarkerCompositor {
        &self.compositor
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of images currently cached
    pub fn cached_images(&self) -> usize {
        self.cache.as_ref().map_or(0, MarkerCache::len)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Lays out a single description
    pub fn build(&self, description: &MarkerDescription) -> Result<MarkerElementSet> {
        self.layout.build(description)
    }

    /// Element set of a transition frame, at the same quantized progress
    /// [`MarkerRenderer::render_transition`] uses
    pub fn frame(
        &self,
        start: &MarkerDescription,
        end: &MarkerDescription,
        t: f32,
    ) -> Result<MarkerElementSet> {
        let (_, progress) = self.quantize(t);
        let from = self.layout.build(start)?;
        let to = self.layout.build(end)?;
        Ok(self.interpolator.interpolate(&from, &to, progress))
    }

    /// Renders one static marker
    pub fn render(&self, description: &MarkerDescription) -> Result<Arc<MarkerImage>> {
        let key = self.fingerprint(description, None, None);
        self.render_keyed(key, || self.layout.build(description))
    }

    /// Renders the transition frame at progress `t`.
    ///
    /// Progress is snapped to the cache grid first, and the frame is drawn at
    /// the snapped value, so equal keys always hold equal images. Progress 0
    /// and 1 render the plain start and end markers once the other side has
    /// been checked to lay out.
    pub fn render_transition(
        &self,
        start: &MarkerDescription,
        end: &MarkerDescription,
        t: f32,
    ) -> Result<Arc<MarkerImage>> {
        let (step, progress) = self.quantize(t);
        if progress <= 0.0 {
            self.layout.build(end)?;
            return self.render(start);
        }
        if progress >= 1.0 {
            self.layout.build(start)?;
            return self.render(end);
        }

        let key = self.fingerprint(start, Some(end), Some(step));
        self.render_keyed(key, || {
            let from = self.layout.build(start)?;
            let to = self.layout.build(end)?;
            Ok(self.interpolator.interpolate(&from, &to, progress))
        })
    }

    fn quantize(&self, t: f32) -> (u32, f32) {
        if t.is_nan() {
            log::warn!("Transition progress is NaN; treating it as 0");
        }
        self.options.cache.quantize_progress(t)
    }

    fn fingerprint(
        &self,
        start: &MarkerDescription,
        end: Option<&MarkerDescription>,
        progress_step: Option<u32>,
    ) -> Fingerprint {
        Fingerprint {
            start: start.clone(),
            end: end.cloned(),
            progress_step,
            font_id: self.layout.typeface().id().to_string(),
            stroke_bits: self.layout.stroke_size().to_bits(),
            density_bits: self.options.scale.effective_density().to_bits(),
        }
    }

    fn render_keyed<F>(&self, key: Fingerprint, layout: F) -> Result<Arc<MarkerImage>>
    where
        F: FnOnce() -> Result<MarkerElementSet>,
    {
        let composite = || -> Result<MarkerImage> {
            let set = layout()?;
            let image = self.compositor.composite(&set)?;
            self.stats.composites.fetch_add(1, Ordering::Relaxed);
            Ok(image)
        };

        let Some(cache) = &self.cache else {
            return composite().map(Arc::new);
        };

        let (image, lookup) = cache.get_or_render(&key, composite)?;
        match lookup {
            CacheLookup::Hit => {
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("Marker cache hit {:016x}", key.digest());
            }
            CacheLookup::Miss => {
                log::debug!(
                    "Composited marker {:016x} ({}x{})",
                    key.digest(),
                    image.width(),
                    image.height()
                );
            }
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RenderProfile;
    use crate::text::FixedPitchTypeface;
    use crate::MarkerError;

    fn renderer(cache: bool) -> MarkerRenderer {
        let mut options = RenderProfile::LowMemory.resolve();
        options.cache.enabled = cache;
        MarkerRenderer::new(Arc::new(FixedPitchTypeface), options)
    }

    #[test]
    fn test_fingerprint_separates_frames() {
        let renderer = renderer(true);
        let start = MarkerDescription::new("1");
        let end = MarkerDescription::new("2");
        let still = renderer.fingerprint(&start, None, None);
        let frame = renderer.fingerprint(&start, Some(&end), Some(3));
        assert_ne!(still, frame);
        assert_ne!(still.digest(), frame.digest());
        assert_eq!(still, renderer.fingerprint(&start, None, None));
    }

    #[test]
    fn test_transition_endpoints_reuse_static_renders() {
        let renderer = renderer(true);
        let start = MarkerDescription::new("1");
        let end = MarkerDescription::new("2").selected(true);

        let still = renderer.render(&start).unwrap();
        let first = renderer.render_transition(&start, &end, 0.0).unwrap();
        assert!(Arc::ptr_eq(&still, &first));

        let last = renderer.render_transition(&start, &end, 1.0).unwrap();
        assert_eq!(*last, *renderer.render(&end).unwrap());
        assert_eq!(renderer.stats().composites(), 2);
    }

    #[test]
    fn test_nearby_progress_shares_a_frame() {
        // LowMemory quantizes to 100 steps
        let renderer = renderer(true);
        let start = MarkerDescription::new("1");
        let end = MarkerDescription::new("22");

        renderer.render_transition(&start, &end, 0.501).unwrap();
        renderer.render_transition(&start, &end, 0.502).unwrap();
        assert_eq!(renderer.stats().composites(), 1);
        assert_eq!(renderer.stats().cache_hits(), 1);
    }

    #[test]
    fn test_invalid_description_is_not_cached() {
        let renderer = renderer(true);
        assert!(renderer.render(&MarkerDescription::default()).is_err());
        assert_eq!(renderer.cached_images(), 0);
        assert_eq!(renderer.stats().composites(), 0);
    }

    #[test]
    fn test_transition_endpoints_check_both_sides() {
        let renderer = renderer(true);
        let valid = MarkerDescription::new("3");
        let empty = MarkerDescription::default();

        for t in [0.0, 1.0] {
            let err = renderer.render_transition(&valid, &empty, t).unwrap_err();
            assert!(matches!(err, MarkerError::InvalidDescription(_)));
            let err = renderer.render_transition(&empty, &valid, t).unwrap_err();
            assert!(matches!(err, MarkerError::InvalidDescription(_)));
        }
        assert_eq!(renderer.stats().composites(), 0);
    }

    #[test]
    fn test_uncached_renderer_always_composites() {
        let renderer = renderer(false);
        let description = MarkerDescription::new("5");
        renderer.render(&description).unwrap();
        renderer.render(&description).unwrap();
        assert!(!renderer.is_caching());
        assert_eq!(renderer.stats().composites(), 2);
    }
}
