//! Intermediate frames between two element sets.
//!
//! Slots present on both sides are interpolated field by field. A slot present
//! on one side only keeps its geometry and fades. Labels pair up by position;
//! unpaired lines fade out or in. The frame canvas grows to cover anything
//! left outside the blended canvas.

use crate::animation::interpolation::{mix, Interpolatable};
use crate::marker::element::{clamp_alpha, ElementData, GlyphRun, MarkerElement, MarkerElementSet};

/// Blends a start and an end element set
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator;

impl Interpolator {
    pub fn new() -> Self {
        Self
    }

    /// Frame at progress `t`, clamped to `0.0..=1.0` (NaN counts as 0).
    /// `t == 0` returns `start` and `t == 1` returns `end` unchanged.
    pub fn interpolate(
        &self,
        start: &MarkerElementSet,
        end: &MarkerElementSet,
        t: f32,
    ) -> MarkerElementSet {
        let t = normalize_progress(t);
        if t == 0.0 {
            return start.clone();
        }
        if t == 1.0 {
            return end.clone();
        }

        let mut frame = MarkerElementSet {
            canvas: blend_slot(start.canvas.as_ref(), end.canvas.as_ref(), t),
            bubble: blend_slot(start.bubble.as_ref(), end.bubble.as_ref(), t),
            icon: blend_slot(start.icon.as_ref(), end.icon.as_ref(), t),
            icon_circle: blend_slot(start.icon_circle.as_ref(), end.icon_circle.as_ref(), t),
            pointer: blend_slot(start.pointer.as_ref(), end.pointer.as_ref(), t),
            labels: blend_labels(&start.labels, &end.labels, t),
        };
        fit_canvas(&mut frame, mix(canvas_margin(start), canvas_margin(end), t));
        frame
    }
}

/// Shorthand for [`Interpolator::interpolate`]
pub fn interpolate(start: &MarkerElementSet, end: &MarkerElementSet, t: f32) -> MarkerElementSet {
    Interpolator.interpolate(start, end, t)
}

fn normalize_progress(t: f32) -> f32 {
    if t.is_nan() {
        log::warn!("Interpolation progress is NaN; treating it as 0");
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

/// Smallest gap between the canvas edge and the content of a set
fn canvas_margin(set: &MarkerElementSet) -> f32 {
    match (&set.canvas, set.content_bounds()) {
        (Some(canvas), Some(content)) => {
            let canvas = canvas.bounds;
            (content.left() - canvas.left())
                .min(content.top() - canvas.top())
                .min(canvas.right() - content.right())
                .min(canvas.bottom() - content.bottom())
                .max(0.0)
        }
        _ => 0.0,
    }
}

/// Grows the canvas over elements that fade in place outside of it
fn fit_canvas(frame: &mut MarkerElementSet, margin: f32) {
    let Some(content) = frame.content_bounds() else {
        return;
    };
    let fits = frame.canvas.as_ref().map_or(true, |canvas| {
        frame
            .content()
            .all(|element| canvas.bounds.contains_rect(&element.bounds))
    });
    if fits {
        return;
    }
    if let Some(canvas) = frame.canvas.as_mut() {
        canvas.bounds = canvas.bounds.union(&content.outset(margin));
    }
}

fn fade(element: &MarkerElement, opacity: f32) -> MarkerElement {
    element.clone().with_alpha(element.alpha * opacity)
}

fn blend_slot(
    start: Option<&MarkerElement>,
    end: Option<&MarkerElement>,
    t: f32,
) -> Option<MarkerElement> {
    match (start, end) {
        (Some(start), Some(end)) => Some(start.lerp(end, t)),
        (Some(start), None) => Some(fade(start, 1.0 - t)),
        (None, Some(end)) => Some(fade(end, t)),
        (None, None) => None,
    }
}

fn blend_labels(start: &[MarkerElement], end: &[MarkerElement], t: f32) -> Vec<MarkerElement> {
    let paired = start.len().min(end.len());
    let mut labels = Vec::with_capacity(start.len().max(end.len()) + paired);

    for (from, to) in start.iter().zip(end.iter()) {
        if same_text(from, to) {
            labels.push(from.lerp(to, t));
            continue;
        }
        // Different text cannot morph; both runs share the moving bounds.
        let bounds = from.bounds.lerp(&to.bounds, t);
        let fill_color = from.fill_color.lerp(&to.fill_color, t);
        labels.push(MarkerElement {
            bounds,
            fill_color,
            stroke_color: from.stroke_color,
            alpha: clamp_alpha(from.alpha * (1.0 - t)),
            data: from.data.clone(),
        });
        labels.push(MarkerElement {
            bounds,
            fill_color,
            stroke_color: to.stroke_color,
            alpha: clamp_alpha(to.alpha * t),
            data: to.data.clone(),
        });
    }

    labels.extend(start[paired..].iter().map(|label| fade(label, 1.0 - t)));
    labels.extend(end[paired..].iter().map(|label| fade(label, t)));
    labels
}

fn same_text(start: &MarkerElement, end: &MarkerElement) -> bool {
    match (start.data.glyph_run(), end.data.glyph_run()) {
        (Some(a), Some(b)) => a.text == b.text,
        _ => start.data == end.data,
    }
}

fn blend_data(start: &ElementData, end: &ElementData, t: f32) -> ElementData {
    if start == end {
        return start.clone();
    }
    match (start, end) {
        (ElementData::GlyphRun(a), ElementData::GlyphRun(b)) if a.text == b.text => {
            ElementData::GlyphRun(GlyphRun {
                text: a.text.clone(),
                em_ratio: mix(a.em_ratio, b.em_ratio, t),
                ascent_ratio: mix(a.ascent_ratio, b.ascent_ratio, t),
            })
        }
        (ElementData::IconRef { svg: outgoing }, ElementData::IconRef { svg: incoming }) => {
            ElementData::Crossfade {
                outgoing: outgoing.clone(),
                incoming: incoming.clone(),
                mix: t,
            }
        }
        _ if t < 0.5 => start.clone(),
        _ => end.clone(),
    }
}

impl Interpolatable for MarkerElement {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        MarkerElement {
            bounds: self.bounds.lerp(&other.bounds, t),
            fill_color: self.fill_color.lerp(&other.fill_color, t),
            stroke_color: self.stroke_color.lerp(&other.stroke_color, t),
            alpha: clamp_alpha(mix(self.alpha, other.alpha, t)),
            data: blend_data(&self.data, &other.data, t),
        }
    }
}
