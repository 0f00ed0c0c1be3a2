pub mod typeface;

pub use typeface::{FixedPitchTypeface, SharedTypeface, TextMetrics, TtfTypeface, Typeface};
