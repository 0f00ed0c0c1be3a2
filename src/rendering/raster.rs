//! CPU raster surface backed by `tiny_skia`, and the image it produces.

use crate::core::{color::Rgba, geometry::Rect};
use crate::marker::element::GlyphRun;
use crate::rendering::icons::IconBitmap;
use crate::rendering::surface::{DrawSurface, MarkerPath, PathCommand, StrokeStyle};
use crate::text::Typeface;
use crate::{MarkerError, Result};
use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia::{
    self, Color, FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};
use std::io::Cursor;
use std::path::Path;

/// Cubic control point offset approximating a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Composited marker bitmap, straight (non-premultiplied) RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerImage {
    image: RgbaImage,
}

impl MarkerImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

/// [`DrawSurface`] over a `tiny_skia` pixmap
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(MarkerError::SurfaceAllocation { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn into_image(self) -> MarkerImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (target, source) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let color = source.demultiply();
            target.0 = [color.red(), color.green(), color.blue(), color.alpha()];
        }
        MarkerImage { image }
    }
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(r, g, b, a));
    paint.anti_alias = true;
    paint
}

fn stroke_for(style: &StrokeStyle) -> Stroke {
    Stroke {
        width: style.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn rounded_rect_path(rect: &Rect, radius: f32) -> Option<tiny_skia::Path> {
    let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    if r <= 0.0 {
        let rect = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?;
        return Some(PathBuilder::from_rect(rect));
    }

    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

fn marker_path(path: &MarkerPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(x, y) => pb.move_to(x, y),
            PathCommand::LineTo(x, y) => pb.line_to(x, y),
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

impl DrawSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> Result<()> {
        if !color.is_visible() {
            return Ok(());
        }
        if let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            self.pixmap
                .fill_rect(rect, &paint_for(color), Transform::identity(), None);
        }
        Ok(())
    }

    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        fill: Rgba,
        stroke: Option<StrokeStyle>,
    ) -> Result<()> {
        let Some(path) = rounded_rect_path(&rect, radius) else {
            return Ok(());
        };
        if fill.is_visible() {
            self.pixmap.fill_path(
                &path,
                &paint_for(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if let Some(stroke) = stroke.filter(StrokeStyle::is_visible) {
            self.pixmap.stroke_path(
                &path,
                &paint_for(stroke.color),
                &stroke_for(&stroke),
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn draw_glyph_run(
        &mut self,
        typeface: &dyn Typeface,
        run: &GlyphRun,
        bounds: Rect,
        color: Rgba,
    ) -> Result<()> {
        let px = run.font_px(&bounds);
        if !color.is_visible() || px <= 0.0 || run.text.is_empty() {
            return Ok(());
        }

        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut mask = Mask::new(width, height).ok_or(MarkerError::SurfaceAllocation {
            width,
            height,
        })?;
        let coverage = mask.data_mut();
        typeface.rasterize(
            &run.text,
            px,
            bounds.x,
            run.baseline(&bounds),
            &mut |x, y, c| {
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    return;
                }
                let index = y as usize * width as usize + x as usize;
                let value = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                coverage[index] = coverage[index].max(value);
            },
        );

        if let Some(full) = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
            self.pixmap
                .fill_rect(full, &paint_for(color), Transform::identity(), Some(&mask));
        }
        Ok(())
    }

    fn draw_path(
        &mut self,
        path: &MarkerPath,
        fill: Option<Rgba>,
        stroke: Option<StrokeStyle>,
    ) -> Result<()> {
        let Some(path) = marker_path(path) else {
            return Ok(());
        };
        if let Some(fill) = fill.filter(Rgba::is_visible) {
            self.pixmap.fill_path(
                &path,
                &paint_for(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if let Some(stroke) = stroke.filter(StrokeStyle::is_visible) {
            self.pixmap.stroke_path(
                &path,
                &paint_for(stroke.color),
                &stroke_for(&stroke),
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn draw_icon(&mut self, icon: &IconBitmap, bounds: Rect, opacity: f32) -> Result<()> {
        if opacity <= 0.0 {
            return Ok(());
        }
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            bounds.x.round() as i32,
            bounds.y.round() as i32,
            icon.pixmap().as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
        Ok(())
    }
}
