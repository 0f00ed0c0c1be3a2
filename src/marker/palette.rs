//! Marker color palette.

use crate::core::color::Rgba;
use crate::marker::description::{MarkerState, MarkerVariant, PaletteKey};

/// Colors for every element of one marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerColors {
    pub bubble: Rgba,
    pub stroke: Rgba,
    pub text: Rgba,
    pub icon: Rgba,
    pub icon_circle: Rgba,
}

fn default_stroke() -> Rgba {
    Rgba::from_rgb8(217, 219, 208)
}

fn brand_blue() -> Rgba {
    Rgba::from_rgb8(57, 87, 189)
}

impl MarkerColors {
    /// Looks up the colors for a resolved palette key.
    ///
    /// Selection wins over visualization; the special variant recolors the
    /// icon unless the marker is visualized and not selected.
    pub fn for_key(key: &PaletteKey) -> Self {
        let mut colors = MarkerColors {
            bubble: Rgba::WHITE,
            stroke: default_stroke(),
            text: Rgba::BLACK,
            icon: Rgba::BLACK,
            icon_circle: Rgba::from_rgb8(248, 249, 245),
        };

        if key.is_visualized {
            colors.bubble = Rgba::from_rgb8(217, 219, 208);
            colors.text = Rgba::BLACK;
            colors.stroke = Rgba::from_rgb8(197, 201, 186);
            colors.icon_circle = Rgba::WHITE;
        }
        if key.is_selected {
            colors.bubble = brand_blue();
            colors.text = Rgba::WHITE;
            colors.stroke = default_stroke();
            colors.icon_circle = Rgba::WHITE;
        }
        if key.variant == MarkerVariant::Special && (!key.is_visualized || key.is_selected) {
            colors.icon_circle = Rgba::from_rgb8(240, 243, 255);
            colors.icon = brand_blue();
        }
        if key.state == MarkerState::Dragging {
            colors.stroke = brand_blue();
        }

        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let colors = MarkerColors::for_key(&PaletteKey::default());
        assert_eq!(colors.bubble, Rgba::WHITE);
        assert_eq!(colors.text, Rgba::BLACK);
        assert_eq!(colors.stroke.to_rgba8(), [217, 219, 208, 255]);
    }

    #[test]
    fn test_selection_overrides_visualization() {
        let key = PaletteKey {
            is_selected: true,
            is_visualized: true,
            ..PaletteKey::default()
        };
        let colors = MarkerColors::for_key(&key);
        assert_eq!(colors.bubble.to_rgba8(), [57, 87, 189, 255]);
        assert_eq!(colors.text, Rgba::WHITE);
        assert_eq!(colors.stroke.to_rgba8(), [217, 219, 208, 255]);
    }

    #[test]
    fn test_special_variant_icon_colors() {
        let special = PaletteKey {
            variant: MarkerVariant::Special,
            ..PaletteKey::default()
        };
        assert_eq!(
            MarkerColors::for_key(&special).icon_circle.to_rgba8(),
            [240, 243, 255, 255]
        );

        let visualized_special = PaletteKey {
            is_visualized: true,
            ..special
        };
        assert_eq!(MarkerColors::for_key(&visualized_special).icon, Rgba::BLACK);
    }

    #[test]
    fn test_dragging_outline() {
        let key = PaletteKey {
            state: MarkerState::Dragging,
            ..PaletteKey::default()
        };
        assert_eq!(MarkerColors::for_key(&key).stroke, brand_blue());
    }
}
