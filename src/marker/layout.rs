//! Marker layout: turns a description into positioned elements.
//!
//! All lengths below are logical pixels; size-class metrics and constants are
//! converted from density-independent units through [`ScaleConfig`].

use crate::core::color::Rgba;
use crate::core::config::ScaleConfig;
use crate::core::constants::{
    ICON_CIRCLE_TO_ICON_RATIO, ICON_LEADING_PADDING_DP, ICON_TO_BUBBLE_RATIO,
    ICON_TRAILING_PADDING_DP, LINE_SPACING_RATIO, POINTER_HALF_WIDTH_DP, POINTER_HEIGHT_DP,
};
use crate::core::geometry::Rect;
use crate::marker::description::{IconAnchor, MarkerDescription, MarkerVariant, PaletteKey};
use crate::marker::element::{ElementData, GlyphRun, MarkerElement, MarkerElementSet, ShapeHint};
use crate::marker::palette::MarkerColors;
use crate::text::{SharedTypeface, TextMetrics};
use crate::{MarkerError, Result};

/// Builds element sets for one typeface and scale
#[derive(Debug, Clone)]
pub struct ElementSetBuilder {
    typeface: SharedTypeface,
    scale: ScaleConfig,
}

struct MeasuredLine<'a> {
    text: &'a str,
    metrics: TextMetrics,
}

impl ElementSetBuilder {
    pub fn new(typeface: SharedTypeface, scale: ScaleConfig) -> Self {
        Self { typeface, scale }
    }

    pub fn typeface(&self) -> &SharedTypeface {
        &self.typeface
    }

    pub fn scale(&self) -> &ScaleConfig {
        &self.scale
    }

    /// Outline width in logical pixels
    pub fn stroke_size(&self) -> f32 {
        self.scale.stroke_size()
    }

    /// Lays out `description`.
    ///
    /// Fails with [`MarkerError::InvalidDescription`] when there is neither a
    /// label nor an icon. Unrecognized size, variant or state strings fall
    /// back to the default palette entry.
    pub fn build(&self, description: &MarkerDescription) -> Result<MarkerElementSet> {
        if !description.has_content() {
            return Err(MarkerError::InvalidDescription(
                "marker has neither a label nor an icon".to_string(),
            ));
        }

        let key = PaletteKey::resolve(description);
        let colors = MarkerColors::for_key(&key);
        let size = key.size.metrics();
        let stroke = self.stroke_size();
        let px = |dp: f32| self.scale.px(dp);

        let text_px = px(size.text_size);
        let lines: Vec<MeasuredLine<'_>> = description
            .label_text()
            .map(|label| {
                label
                    .split('\n')
                    .filter(|line| !line.trim().is_empty())
                    .map(|text| MeasuredLine {
                        text,
                        metrics: self.typeface.measure(text, text_px),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let has_label = !lines.is_empty();
        let icon_svg = description.icon_source();

        let icon_size = px(size.min_height * ICON_TO_BUBBLE_RATIO);
        let circle_size = icon_size * ICON_CIRCLE_TO_ICON_RATIO;
        let leading = px(ICON_LEADING_PADDING_DP);

        let line_height = lines
            .first()
            .map(|line| line.metrics.line_height())
            .unwrap_or(0.0)
            .max(0.0);
        let line_gap = line_height * LINE_SPACING_RATIO;
        let block_height = if has_label {
            lines.len() as f32 * line_height + (lines.len() - 1) as f32 * line_gap
        } else {
            0.0
        };
        let text_width = lines
            .iter()
            .map(|line| line.metrics.width)
            .fold(0.0_f32, f32::max);

        let anchor = key.variant.icon_anchor(has_label);
        let icon_extra = match (icon_svg, anchor) {
            (Some(_), IconAnchor::Leading) => circle_size + px(ICON_TRAILING_PADDING_DP),
            _ => 0.0,
        };

        let (content_width, content_height) = if has_label {
            (
                text_width + icon_extra + 2.0 * px(size.padding_horizontal),
                block_height + 2.0 * px(size.padding_vertical),
            )
        } else {
            (circle_size + 2.0 * leading, circle_size + 2.0 * leading)
        };
        let mut bubble_height = content_height.max(px(size.min_height));
        if icon_svg.is_some() {
            bubble_height = bubble_height.max(circle_size + 2.0 * leading);
        }
        let bubble_rect = Rect::new(
            stroke,
            stroke,
            content_width.max(px(size.min_width)),
            bubble_height,
        );

        let mut set = MarkerElementSet {
            bubble: Some(MarkerElement::new(
                bubble_rect,
                colors.bubble,
                colors.stroke,
                ElementData::shape(ShapeHint::Capsule),
            )),
            ..MarkerElementSet::default()
        };

        let block_top = bubble_rect.center_y() - block_height / 2.0;
        let text_center_x = bubble_rect.x + (bubble_rect.width + icon_extra) / 2.0;
        for (index, line) in lines.iter().enumerate() {
            let bounds = Rect::new(
                text_center_x - line.metrics.width / 2.0,
                block_top + index as f32 * (line_height + line_gap),
                line.metrics.width,
                line_height,
            );
            let (em_ratio, ascent_ratio) = if line_height > 0.0 {
                (text_px / line_height, line.metrics.ascent / line_height)
            } else {
                (0.0, 0.0)
            };
            set.labels.push(MarkerElement::new(
                bounds,
                colors.text,
                Rgba::TRANSPARENT,
                ElementData::GlyphRun(GlyphRun {
                    text: line.text.to_string(),
                    em_ratio,
                    ascent_ratio,
                }),
            ));
        }

        if let Some(svg) = icon_svg {
            let circle_rect = match anchor {
                IconAnchor::Leading => Rect::new(
                    bubble_rect.x + leading,
                    bubble_rect.center_y() - circle_size / 2.0,
                    circle_size,
                    circle_size,
                ),
                IconAnchor::Center => Rect::new(
                    bubble_rect.center_x() - circle_size / 2.0,
                    bubble_rect.center_y() - circle_size / 2.0,
                    circle_size,
                    circle_size,
                ),
            };
            let icon_rect = Rect::new(
                circle_rect.center_x() - icon_size / 2.0,
                circle_rect.center_y() - icon_size / 2.0,
                icon_size,
                icon_size,
            );

            let wants_circle =
                key.is_selected || key.is_visualized || key.variant == MarkerVariant::Special;
            if wants_circle {
                set.icon_circle = Some(MarkerElement::new(
                    circle_rect,
                    colors.icon_circle,
                    Rgba::TRANSPARENT,
                    ElementData::shape(ShapeHint::Circle),
                ));
            }
            set.icon = Some(MarkerElement::new(
                icon_rect,
                colors.icon,
                Rgba::TRANSPARENT,
                ElementData::icon(svg),
            ));
        }

        if description.has_pointer {
            let half_width = px(POINTER_HALF_WIDTH_DP);
            set.pointer = Some(MarkerElement::new(
                Rect::new(
                    bubble_rect.center_x() - half_width,
                    bubble_rect.bottom() - stroke / 2.0,
                    2.0 * half_width,
                    px(POINTER_HEIGHT_DP),
                ),
                colors.bubble,
                colors.stroke,
                ElementData::shape(ShapeHint::DownTriangle),
            ));
        }

        let extent = set
            .paint_order()
            .map(|element| element.bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
            .unwrap_or(bubble_rect);
        set.canvas = Some(MarkerElement::new(
            extent.outset(stroke),
            Rgba::TRANSPARENT,
            Rgba::TRANSPARENT,
            ElementData::None,
        ));

        log::debug!(
            "Laid out marker {:?}: {} label line(s), canvas {:?}",
            description.label_text(),
            set.labels.len(),
            set.extent()
        );
        Ok(set)
    }
}
