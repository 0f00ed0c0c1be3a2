//! Marker model: descriptions, palette, element sets and their layout.

pub mod description;
pub mod element;
pub mod layout;
pub mod palette;

pub use description::{MarkerDescription, MarkerSize, MarkerState, MarkerVariant, PaletteKey};
pub use element::{ElementData, GlyphRun, MarkerElement, MarkerElementSet, ShapeHint};
pub use layout::ElementSetBuilder;
pub use palette::MarkerColors;
