pub mod cache;
pub mod compositor;
pub mod icons;
pub mod raster;
pub mod surface;

// Re-export main types
pub use cache::{CacheLookup, MarkerCache};
pub use compositor::MarkerCompositor;
pub use icons::{IconBitmap, IconRasterizer};
pub use raster::{MarkerImage, PixmapSurface};
pub use surface::{DrawSurface, MarkerPath, PathCommand, StrokeStyle};
