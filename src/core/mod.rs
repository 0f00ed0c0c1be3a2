pub mod color;
pub mod config;
pub mod constants;
pub mod geometry;

#[cfg(feature = "render")]
pub mod builder;
#[cfg(feature = "render")]
pub mod renderer;
