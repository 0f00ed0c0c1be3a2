//! Typeface seam used for label measurement and glyph coverage.
//!
//! The layout code only ever asks a typeface for metrics; the compositor asks
//! it for coverage. Both go through [`Typeface`], so a renderer can run on a
//! real TrueType font or on the built-in fixed-pitch face.

use crate::MarkerError;
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use fxhash::FxHasher;
use std::fmt;
use std::hash::Hasher;
use std::path::Path;
use std::sync::Arc;

/// Horizontal extent and vertical metrics of a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    /// Distance from baseline to the top of the line, positive
    pub ascent: f32,
    /// Distance from baseline to the bottom of the line, negative
    pub descent: f32,
}

impl TextMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// A font resource
pub trait Typeface: Send + Sync + fmt::Debug {
    /// Stable identity, part of every cache key
    fn id(&self) -> &str;

    fn measure(&self, text: &str, px: f32) -> TextMetrics;

    /// Reports glyph coverage in `0.0..=1.0` for every touched pixel of `text`
    /// drawn with its baseline starting at (`origin_x`, `baseline_y`)
    fn rasterize(
        &self,
        text: &str,
        px: f32,
        origin_x: f32,
        baseline_y: f32,
        coverage: &mut dyn FnMut(i32, i32, f32),
    );
}

pub type SharedTypeface = Arc<dyn Typeface>;

/// TrueType/OpenType face backed by `ab_glyph`
#[derive(Clone)]
pub struct TtfTypeface {
    font: FontArc,
    id: String,
}

impl TtfTypeface {
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| MarkerError::FontUnavailable {
            source_name: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let typeface = Self::from_bytes_named(bytes, &path.display().to_string())?;
        log::info!("Loaded typeface {} from {}", typeface.id, path.display());
        Ok(typeface)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> crate::Result<Self> {
        let typeface = Self::from_bytes_named(bytes, "<memory>")?;
        log::info!("Loaded typeface {} from memory", typeface.id);
        Ok(typeface)
    }

    fn from_bytes_named(bytes: Vec<u8>, source_name: &str) -> crate::Result<Self> {
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        let id = format!("ttf-{:016x}", hasher.finish());

        let font = FontArc::try_from_vec(bytes).map_err(|err| MarkerError::FontUnavailable {
            source_name: source_name.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { font, id })
    }
}

impl fmt::Debug for TtfTypeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfTypeface").field("id", &self.id).finish()
    }
}

impl Typeface for TtfTypeface {
    fn id(&self) -> &str {
        &self.id
    }

    fn measure(&self, text: &str, px: f32) -> TextMetrics {
        let scaled = self.font.as_scaled(PxScale::from(px.max(0.0)));
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                width += scaled.kern(previous, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }

        TextMetrics {
            width: width.max(0.0),
            ascent: scaled.ascent(),
            descent: scaled.descent(),
        }
    }

    fn rasterize(
        &self,
        text: &str,
        px: f32,
        origin_x: f32,
        baseline_y: f32,
        coverage: &mut dyn FnMut(i32, i32, f32),
    ) {
        if px <= 0.0 {
            return;
        }
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let mut caret = origin_x;
        let mut previous = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(scale, point(caret, baseline_y));
            caret += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let left = bounds.min.x as i32;
                let top = bounds.min.y as i32;
                outlined.draw(|x, y, c| coverage(left + x as i32, top + y as i32, c));
            }
        }
    }
}

/// Built-in face with fixed proportions, drawing every visible character as a
/// solid block. Needs no font file and produces identical output everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPitchTypeface;

impl FixedPitchTypeface {
    const ADVANCE: f32 = 0.6;
    const ASCENT: f32 = 0.8;
    const DESCENT: f32 = -0.2;
    const CAP_HEIGHT: f32 = 0.7;
}

impl Typeface for FixedPitchTypeface {
    fn id(&self) -> &str {
        "fixed-pitch"
    }

    fn measure(&self, text: &str, px: f32) -> TextMetrics {
        let px = px.max(0.0);
        TextMetrics {
            width: text.chars().count() as f32 * Self::ADVANCE * px,
            ascent: Self::ASCENT * px,
            descent: Self::DESCENT * px,
        }
    }

    fn rasterize(
        &self,
        text: &str,
        px: f32,
        origin_x: f32,
        baseline_y: f32,
        coverage: &mut dyn FnMut(i32, i32, f32),
    ) {
        if px <= 0.0 {
            return;
        }
        let advance = Self::ADVANCE * px;
        let top = (baseline_y - Self::CAP_HEIGHT * px).round() as i32;
        let bottom = baseline_y.round() as i32;

        for (index, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = origin_x + index as f32 * advance;
            let left = (x0 + advance * 0.1).round() as i32;
            let right = (x0 + advance * 0.9).round() as i32;
            for y in top..bottom {
                for x in left..right {
                    coverage(x, y, 1.0);
                }
            }
        }
    }
}
