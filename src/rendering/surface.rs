//! Drawing surface abstraction the compositor paints through.

use crate::core::{color::Rgba, geometry::Rect};
use crate::marker::element::GlyphRun;
use crate::rendering::icons::IconBitmap;
use crate::text::Typeface;
use crate::Result;

/// One step of a [`MarkerPath`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Close,
}

/// Polyline path in surface coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPath {
    commands: Vec<PathCommand>,
}

impl MarkerPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Closed triangle with its base on the top edge of `rect`
    pub fn down_triangle(rect: &Rect) -> Self {
        Self::new()
            .move_to(rect.left(), rect.top())
            .line_to(rect.center_x(), rect.bottom())
            .line_to(rect.right(), rect.top())
            .close()
    }

    /// The two slanted sides of [`MarkerPath::down_triangle`], left open
    pub fn down_triangle_sides(rect: &Rect) -> Self {
        Self::new()
            .move_to(rect.left(), rect.top())
            .line_to(rect.center_x(), rect.bottom())
            .line_to(rect.right(), rect.top())
    }
}

/// Outline paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.color.is_visible()
    }
}

/// Raster target for marker compositing
///
/// Colors arrive unrounded with the element alpha already applied; the
/// surface decides how to quantize them.
pub trait DrawSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> Result<()>;

    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        fill: Rgba,
        stroke: Option<StrokeStyle>,
    ) -> Result<()>;

    fn draw_glyph_run(
        &mut self,
        typeface: &dyn Typeface,
        run: &GlyphRun,
        bounds: Rect,
        color: Rgba,
    ) -> Result<()>;

    fn draw_path(
        &mut self,
        path: &MarkerPath,
        fill: Option<Rgba>,
        stroke: Option<StrokeStyle>,
    ) -> Result<()>;

    fn draw_icon(&mut self, icon: &IconBitmap, bounds: Rect, opacity: f32) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_triangle_path() {
        let rect = Rect::new(10.0, 20.0, 14.0, 6.0);
        assert_eq!(
            MarkerPath::down_triangle(&rect).commands(),
            &[
                PathCommand::MoveTo(10.0, 20.0),
                PathCommand::LineTo(17.0, 26.0),
                PathCommand::LineTo(24.0, 20.0),
                PathCommand::Close,
            ]
        );
        assert_eq!(MarkerPath::down_triangle_sides(&rect).commands().len(), 3);
    }
}
