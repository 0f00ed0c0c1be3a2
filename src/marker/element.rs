//! Drawable primitives a marker decomposes into.

use crate::core::{color::Rgba, geometry::Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shape drawn inside an element's bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeHint {
    /// Rounded rectangle with fully rounded ends
    Capsule,
    Circle,
    /// Triangle pointing down, base on the top edge
    DownTriangle,
}

/// One line of label text
///
/// Font size and baseline are stored relative to the element height, so the
/// run scales with its bounds while a transition resizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    pub text: String,
    /// Font size in pixels divided by the line height
    pub em_ratio: f32,
    /// Distance from the top to the baseline divided by the line height
    pub ascent_ratio: f32,
}

impl GlyphRun {
    pub fn font_px(&self, bounds: &Rect) -> f32 {
        bounds.height * self.em_ratio
    }

    pub fn baseline(&self, bounds: &Rect) -> f32 {
        bounds.y + bounds.height * self.ascent_ratio
    }
}

/// Typed payload of an element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementData {
    #[default]
    None,
    GlyphRun(GlyphRun),
    /// SVG document of an icon
    IconRef { svg: Arc<str> },
    Shape { hint: ShapeHint },
    /// Two icons blended during a transition; `mix` is the incoming weight
    Crossfade {
        outgoing: Arc<str>,
        incoming: Arc<str>,
        mix: f32,
    },
}

impl ElementData {
    pub fn icon(svg: impl Into<Arc<str>>) -> Self {
        ElementData::IconRef { svg: svg.into() }
    }

    pub fn shape(hint: ShapeHint) -> Self {
        ElementData::Shape { hint }
    }

    pub fn glyph_run(&self) -> Option<&GlyphRun> {
        match self {
            ElementData::GlyphRun(run) => Some(run),
            _ => None,
        }
    }

    pub fn icon_svg(&self) -> Option<&Arc<str>> {
        match self {
            ElementData::IconRef { svg } => Some(svg),
            _ => None,
        }
    }

    pub fn shape_hint(&self) -> Option<ShapeHint> {
        match self {
            ElementData::Shape { hint } => Some(*hint),
            _ => None,
        }
    }
}

/// A single drawable primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerElement {
    pub bounds: Rect,
    pub fill_color: Rgba,
    pub stroke_color: Rgba,
    /// Multiplier applied on top of the color alphas
    pub alpha: f32,
    pub data: ElementData,
}

impl MarkerElement {
    pub fn new(bounds: Rect, fill_color: Rgba, stroke_color: Rgba, data: ElementData) -> Self {
        Self {
            bounds,
            fill_color,
            stroke_color,
            alpha: 1.0,
            data,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = clamp_alpha(alpha);
        self
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0 && !self.bounds.is_empty()
    }
}

/// Clamps to `0.0..=1.0`; NaN becomes fully transparent
pub fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

/// Full visual state of one marker
///
/// The named slots are fixed; `labels` holds one element per line in reading
/// order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerElementSet {
    pub canvas: Option<MarkerElement>,
    pub bubble: Option<MarkerElement>,
    pub icon: Option<MarkerElement>,
    pub icon_circle: Option<MarkerElement>,
    pub pointer: Option<MarkerElement>,
    pub labels: Vec<MarkerElement>,
}

impl MarkerElementSet {
    /// Elements in paint order: canvas, bubble, icon circle, icon, pointer, labels
    pub fn paint_order(&self) -> impl Iterator<Item = &MarkerElement> {
        self.canvas.iter().chain(self.content())
    }

    /// Every element drawn on top of the canvas, in paint order
    pub fn content(&self) -> impl Iterator<Item = &MarkerElement> {
        self.bubble
            .iter()
            .chain(self.icon_circle.iter())
            .chain(self.icon.iter())
            .chain(self.pointer.iter())
            .chain(self.labels.iter())
    }

    /// Union of the content bounds, `None` for a set with no content
    pub fn content_bounds(&self) -> Option<Rect> {
        self.content()
            .map(|element| element.bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Canvas bounds, or the union of every element when there is no canvas
    pub fn extent(&self) -> Rect {
        if let Some(canvas) = &self.canvas {
            return canvas.bounds;
        }
        self.paint_order()
            .map(|element| element.bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.paint_order().next().is_none()
    }
}
