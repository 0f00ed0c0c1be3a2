//! Marker description: the value a marker controller hands over per render
//! request, and the palette keys resolved from its string fields.

use crate::MarkerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Visual description of one marker state
///
/// Field names follow the controller's camelCase payload, so a description
/// can be deserialized straight from the message it arrives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerDescription {
    pub label: Option<String>,
    /// SVG document for the icon
    pub icon: Option<String>,
    #[serde(alias = "hasTail")]
    pub has_pointer: bool,
    pub is_selected: bool,
    pub is_visualized: bool,
    pub state: String,
    pub variant: String,
    pub size: String,
    pub is_animated: bool,
}

impl MarkerDescription {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, svg: impl Into<String>) -> Self {
        self.icon = Some(svg.into());
        self
    }

    pub fn with_pointer(mut self, has_pointer: bool) -> Self {
        self.has_pointer = has_pointer;
        self
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    pub fn visualized(mut self, is_visualized: bool) -> Self {
        self.is_visualized = is_visualized;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn animated(mut self, is_animated: bool) -> Self {
        self.is_animated = is_animated;
        self
    }

    /// Label text, if present and non-empty
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.trim().is_empty())
    }

    /// Icon document, if present and non-empty
    pub fn icon_source(&self) -> Option<&str> {
        self.icon.as_deref().filter(|icon| !icon.trim().is_empty())
    }

    /// Whether there is anything to draw
    pub fn has_content(&self) -> bool {
        self.label_text().is_some() || self.icon_source().is_some()
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Lifecycle state of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerState {
    #[default]
    Default,
    Dragging,
}

/// Visual variant of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerVariant {
    #[default]
    Default,
    Special,
}

/// Where the icon sits inside the bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAnchor {
    /// Leading edge, label to its right
    Leading,
    /// Bubble center, used when there is no label
    Center,
}

impl MarkerVariant {
    pub fn icon_anchor(&self, has_label: bool) -> IconAnchor {
        match (self, has_label) {
            (_, false) => IconAnchor::Center,
            (MarkerVariant::Default | MarkerVariant::Special, true) => IconAnchor::Leading,
        }
    }
}

/// Size class of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Dimensions of one size class, in density-independent units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeMetrics {
    pub text_size: f32,
    pub padding_vertical: f32,
    pub padding_horizontal: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl MarkerSize {
    pub fn metrics(&self) -> SizeMetrics {
        match self {
            MarkerSize::Small => SizeMetrics {
                text_size: 10.0,
                padding_vertical: 8.0,
                padding_horizontal: 9.0,
                min_width: 32.0,
                min_height: 27.0,
            },
            MarkerSize::Medium => SizeMetrics {
                text_size: 12.0,
                padding_vertical: 12.0,
                padding_horizontal: 11.5,
                min_width: 40.0,
                min_height: 36.0,
            },
            MarkerSize::Large => SizeMetrics {
                text_size: 14.0,
                padding_vertical: 14.0,
                padding_horizontal: 14.0,
                min_width: 48.0,
                min_height: 45.0,
            },
        }
    }
}

fn unknown(field: &'static str, value: &str) -> MarkerError {
    MarkerError::UnknownPaletteKey {
        field,
        value: value.to_string(),
    }
}

impl FromStr for MarkerState {
    type Err = MarkerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "resting" | "idle" => Ok(MarkerState::Default),
            "dragging" | "drag" => Ok(MarkerState::Dragging),
            _ => Err(unknown("state", value)),
        }
    }
}

impl FromStr for MarkerVariant {
    type Err = MarkerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(MarkerVariant::Default),
            "special" => Ok(MarkerVariant::Special),
            _ => Err(unknown("variant", value)),
        }
    }
}

impl FromStr for MarkerSize {
    type Err = MarkerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(MarkerSize::Small),
            "" | "default" | "medium" | "regular" => Ok(MarkerSize::Medium),
            "large" | "big" => Ok(MarkerSize::Large),
            _ => Err(unknown("size", value)),
        }
    }
}

/// Fully resolved palette lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteKey {
    pub state: MarkerState,
    pub variant: MarkerVariant,
    pub size: MarkerSize,
    pub is_selected: bool,
    pub is_visualized: bool,
}

impl PaletteKey {
    /// Strict resolution: fails on the first unrecognized field
    pub fn try_from_description(description: &MarkerDescription) -> crate::Result<Self> {
        Ok(Self {
            state: description.state.parse()?,
            variant: description.variant.parse()?,
            size: description.size.parse()?,
            is_selected: description.is_selected,
            is_visualized: description.is_visualized,
        })
    }

    /// Lenient resolution: unrecognized fields fall back to their default entry.
    /// The fallback only depends on the input, so the same description always
    /// resolves to the same key.
    pub fn resolve(description: &MarkerDescription) -> Self {
        Self {
            state: parse_or_default(&description.state),
            variant: parse_or_default(&description.variant),
            size: parse_or_default(&description.size),
            is_selected: description.is_selected,
            is_visualized: description.is_visualized,
        }
    }
}

fn parse_or_default<T>(value: &str) -> T
where
    T: FromStr<Err = MarkerError> + Default,
{
    value.parse().unwrap_or_else(|err: MarkerError| {
        log::warn!("{}; using the default palette entry", err);
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_from_controller_json() {
        let description = MarkerDescription::from_json(
            r#"{
                "label": "R$ 1.200",
                "icon": null,
                "hasPointer": true,
                "isSelected": true,
                "isVisualized": false,
                "state": "default",
                "variant": "special",
                "size": "small",
                "isAnimated": true
            }"#,
        )
        .unwrap();

        assert_eq!(description.label_text(), Some("R$ 1.200"));
        assert!(description.has_pointer);
        assert!(description.is_selected);
        assert_eq!(description.variant, "special");
        assert!(description.is_animated);
    }

    #[test]
    fn test_has_tail_alias() {
        let description = MarkerDescription::from_json(r#"{ "label": "1", "hasTail": true }"#).unwrap();
        assert!(description.has_pointer);
    }

    #[test]
    fn test_blank_content_is_not_content() {
        let description = MarkerDescription {
            label: Some("   ".to_string()),
            icon: Some(String::new()),
            ..MarkerDescription::default()
        };
        assert!(!description.has_content());
        assert!(MarkerDescription::new("9").has_content());
    }

    #[test]
    fn test_strict_palette_key_rejects_unknown_values() {
        let description = MarkerDescription::new("1").with_size("gigantic");
        let err = PaletteKey::try_from_description(&description).unwrap_err();
        assert!(matches!(
            err,
            MarkerError::UnknownPaletteKey { field: "size", .. }
        ));
    }

    #[test]
    fn test_lenient_palette_key_falls_back_deterministically() {
        let description = MarkerDescription::new("1")
            .with_size("gigantic")
            .with_variant("rainbow")
            .with_state("floating")
            .selected(true);

        let first = PaletteKey::resolve(&description);
        let second = PaletteKey::resolve(&description);
        assert_eq!(first, second);
        assert_eq!(first.size, MarkerSize::Medium);
        assert_eq!(first.variant, MarkerVariant::Default);
        assert_eq!(first.state, MarkerState::Default);
        assert!(first.is_selected);
    }

    #[test]
    fn test_parsing_is_case_insensitive() {
        assert_eq!("SMALL".parse::<MarkerSize>().unwrap(), MarkerSize::Small);
        assert_eq!(" Special ".parse::<MarkerVariant>().unwrap(), MarkerVariant::Special);
        assert_eq!("Dragging".parse::<MarkerState>().unwrap(), MarkerState::Dragging);
    }
}
