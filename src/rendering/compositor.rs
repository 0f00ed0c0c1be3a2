//! Paints element sets onto a [`DrawSurface`].

use crate::core::constants::BUBBLE_CORNER_RADIUS;
use crate::core::geometry::Rect;
use crate::marker::element::{ElementData, MarkerElement, MarkerElementSet, ShapeHint};
use crate::rendering::icons::IconRasterizer;
use crate::rendering::raster::{MarkerImage, PixmapSurface};
use crate::rendering::surface::{DrawSurface, MarkerPath, StrokeStyle};
use crate::text::SharedTypeface;
use crate::Result;

/// Turns element sets into images
#[derive(Debug)]
pub struct MarkerCompositor {
    typeface: SharedTypeface,
    stroke_size: f32,
    icons: IconRasterizer,
}

impl MarkerCompositor {
    pub fn new(typeface: SharedTypeface, stroke_size: f32, icon_capacity: usize) -> Self {
        Self {
            typeface,
            stroke_size: stroke_size.max(0.0),
            icons: IconRasterizer::new(icon_capacity),
        }
    }

    pub fn icons(&self) -> &IconRasterizer {
        &self.icons
    }

    /// Allocates a surface the size of the set's canvas (rounded up) and
    /// paints the set onto it
    pub fn composite(&self, set: &MarkerElementSet) -> Result<MarkerImage> {
        let extent = set.extent();
        let width = extent.width.ceil() as u32;
        let height = extent.height.ceil() as u32;
        let mut surface = PixmapSurface::new(width, height)?;
        self.paint(set, &mut surface)?;
        Ok(surface.into_image())
    }

    /// Paints canvas, bubble, icon circle, icon, pointer and labels, in that
    /// order, with the canvas origin at the surface origin
    pub fn paint(&self, set: &MarkerElementSet, surface: &mut dyn DrawSurface) -> Result<()> {
        let origin = set.extent();
        for element in set.paint_order() {
            if !element.is_visible() {
                continue;
            }
            let bounds = element.bounds.translate(-origin.x, -origin.y);
            self.paint_element(element, bounds, surface)?;
        }
        Ok(())
    }

    fn paint_element(
        &self,
        element: &MarkerElement,
        bounds: Rect,
        surface: &mut dyn DrawSurface,
    ) -> Result<()> {
        let fill = element.fill_color.with_opacity(element.alpha);
        let stroke = StrokeStyle::new(
            element.stroke_color.with_opacity(element.alpha),
            self.stroke_size,
        );

        match &element.data {
            ElementData::None => surface.fill_rect(bounds, fill),
            ElementData::Shape { hint } => match hint {
                ShapeHint::Capsule => surface.draw_rounded_rect(
                    bounds,
                    BUBBLE_CORNER_RADIUS.min(bounds.height / 2.0),
                    fill,
                    Some(stroke),
                ),
                ShapeHint::Circle => surface.draw_rounded_rect(
                    bounds,
                    bounds.width.min(bounds.height) / 2.0,
                    fill,
                    Some(stroke),
                ),
                ShapeHint::DownTriangle => {
                    // The base stays open so the pointer merges into the bubble.
                    surface.draw_path(&MarkerPath::down_triangle(&bounds), Some(fill), None)?;
                    surface.draw_path(
                        &MarkerPath::down_triangle_sides(&bounds),
                        None,
                        Some(stroke),
                    )
                }
            },
            ElementData::GlyphRun(run) => {
                surface.draw_glyph_run(self.typeface.as_ref(), run, bounds, fill)
            }
            ElementData::IconRef { svg } => self.paint_icon(svg, element, bounds, 1.0, surface),
            ElementData::Crossfade {
                outgoing,
                incoming,
                mix,
            } => {
                let mix = mix.clamp(0.0, 1.0);
                self.paint_icon(outgoing, element, bounds, 1.0 - mix, surface)?;
                self.paint_icon(incoming, element, bounds, mix, surface)
            }
        }
    }

    fn paint_icon(
        &self,
        svg: &str,
        element: &MarkerElement,
        bounds: Rect,
        weight: f32,
        surface: &mut dyn DrawSurface,
    ) -> Result<()> {
        let opacity = element.alpha * element.fill_color.a * weight;
        if opacity <= 0.0 {
            return Ok(());
        }
        let width = bounds.width.round().max(1.0) as u32;
        let height = bounds.height.round().max(1.0) as u32;
        let bitmap = self
            .icons
            .rasterize(svg, width, height, element.fill_color)?;
        surface.draw_icon(&bitmap, bounds, opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Rgba;
    use crate::marker::element::GlyphRun;
    use crate::rendering::icons::IconBitmap;
    use crate::text::{FixedPitchTypeface, Typeface};
    use crate::MarkerError;
    use std::sync::Arc;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#000" d="M0 0h24v24H0z"/></svg>"##;

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
    }

    impl DrawSurface for RecordingSurface {
        fn width(&self) -> u32 {
            100
        }

        fn height(&self) -> u32 {
            100
        }

        fn fill_rect(&mut self, _rect: Rect, _color: Rgba) -> Result<()> {
            self.calls.push("rect".to_string());
            Ok(())
        }

        fn draw_rounded_rect(
            &mut self,
            _rect: Rect,
            radius: f32,
            _fill: Rgba,
            _stroke: Option<StrokeStyle>,
        ) -> Result<()> {
            self.calls.push(format!("rounded:{}", radius));
            Ok(())
        }

        fn draw_glyph_run(
            &mut self,
            _typeface: &dyn Typeface,
            run: &GlyphRun,
            _bounds: Rect,
            _color: Rgba,
        ) -> Result<()> {
            self.calls.push(format!("text:{}", run.text));
            Ok(())
        }

        fn draw_path(
            &mut self,
            _path: &MarkerPath,
            fill: Option<Rgba>,
            _stroke: Option<StrokeStyle>,
        ) -> Result<()> {
            self.calls.push(if fill.is_some() { "path:fill" } else { "path:stroke" }.to_string());
            Ok(())
        }

        fn draw_icon(&mut self, _icon: &IconBitmap, _bounds: Rect, opacity: f32) -> Result<()> {
            self.calls.push(format!("icon:{}", opacity));
            Ok(())
        }
    }

    fn compositor() -> MarkerCompositor {
        MarkerCompositor::new(Arc::new(FixedPitchTypeface), 1.5, 8)
    }

    fn element(bounds: Rect, data: ElementData) -> MarkerElement {
        MarkerElement::new(bounds, Rgba::WHITE, Rgba::BLACK, data)
    }

    fn full_set() -> MarkerElementSet {
        MarkerElementSet {
            canvas: Some(MarkerElement::new(
                Rect::new(0.0, 0.0, 60.0, 46.0),
                Rgba::BLACK,
                Rgba::TRANSPARENT,
                ElementData::None,
            )),
            bubble: Some(element(
                Rect::new(1.5, 1.5, 57.0, 36.0),
                ElementData::shape(ShapeHint::Capsule),
            )),
            icon_circle: Some(element(
                Rect::new(6.5, 7.5, 24.0, 24.0),
                ElementData::shape(ShapeHint::Circle),
            )),
            icon: Some(element(Rect::new(10.5, 11.5, 16.0, 16.0), ElementData::icon(SVG))),
            pointer: Some(element(
                Rect::new(23.0, 36.75, 14.0, 6.0),
                ElementData::shape(ShapeHint::DownTriangle),
            )),
            labels: vec![element(
                Rect::new(35.0, 13.5, 12.0, 12.0),
                ElementData::GlyphRun(GlyphRun {
                    text: "12".to_string(),
                    em_ratio: 1.0,
                    ascent_ratio: 0.8,
                }),
            )],
        }
    }

    #[test]
    fn test_paint_order() {
        let mut surface = RecordingSurface::default();
        compositor().paint(&full_set(), &mut surface).unwrap();
        assert_eq!(
            surface.calls,
            vec![
                "rect",
                "rounded:18",
                "rounded:12",
                "icon:1",
                "path:fill",
                "path:stroke",
                "text:12",
            ]
        );
    }

    #[test]
    fn test_invisible_elements_are_skipped() {
        let mut set = full_set();
        set.pointer = set.pointer.map(|pointer| pointer.with_alpha(0.0));
        let mut surface = RecordingSurface::default();
        compositor().paint(&set, &mut surface).unwrap();
        assert!(!surface.calls.iter().any(|call| call.starts_with("path")));
    }

    #[test]
    fn test_crossfade_draws_both_icons() {
        let mut set = MarkerElementSet::default();
        set.icon = Some(element(
            Rect::new(0.0, 0.0, 16.0, 16.0),
            ElementData::Crossfade {
                outgoing: SVG.into(),
                incoming: SVG.replace("#000", "#fff").into(),
                mix: 0.25,
            },
        ));
        let mut surface = RecordingSurface::default();
        compositor().paint(&set, &mut surface).unwrap();
        assert_eq!(surface.calls, vec!["icon:0.75", "icon:0.25"]);
    }

    #[test]
    fn test_composite_size_rounds_up() {
        let mut set = full_set();
        if let Some(canvas) = set.canvas.as_mut() {
            canvas.bounds = Rect::new(0.0, 0.0, 60.2, 45.5);
        }
        let image = compositor().composite(&set).unwrap();
        assert_eq!((image.width(), image.height()), (61, 46));
    }

    #[test]
    fn test_broken_icon_fails_composite() {
        let mut set = full_set();
        set.icon = Some(element(
            Rect::new(10.0, 10.0, 16.0, 16.0),
            ElementData::icon("<not-svg"),
        ));
        let err = compositor().composite(&set).unwrap_err();
        assert!(matches!(err, MarkerError::IconDecode(_)));
    }

    #[test]
    fn test_empty_set_cannot_allocate() {
        let err = compositor()
            .composite(&MarkerElementSet::default())
            .unwrap_err();
        assert!(matches!(err, MarkerError::SurfaceAllocation { .. }));
    }
}
