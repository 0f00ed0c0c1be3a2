use cozymark::core::config::ScaleConfig;
use cozymark::marker::{ElementSetBuilder, MarkerDescription, MarkerElementSet};
use cozymark::text::FixedPitchTypeface;
use cozymark::{interpolate, Rgba};
use std::sync::Arc;

const HOUSE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#000" d="M3 11l9-8 9 8v10H3z"/></svg>"##;
const STAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#000" d="M12 2l3 7h7l-6 4 2 8-6-5-6 5 2-8-6-4h7z"/></svg>"##;

#[cfg(test)]
mod interpolation_tests {
    use super::*;

    fn build(description: &MarkerDescription) -> MarkerElementSet {
        ElementSetBuilder::new(Arc::new(FixedPitchTypeface), ScaleConfig::default())
            .build(description)
            .unwrap()
    }

    fn pairs() -> Vec<(MarkerElementSet, MarkerElementSet)> {
        vec![
            (
                build(&MarkerDescription::new("12")),
                build(&MarkerDescription::new("12").selected(true)),
            ),
            (
                build(&MarkerDescription::new("Loft").with_pointer(true)),
                build(&MarkerDescription::new("Loft\n2 rooms").with_icon(HOUSE_SVG)),
            ),
            (
                build(&MarkerDescription::default().with_icon(HOUSE_SVG).visualized(true)),
                build(&MarkerDescription::new("R$ 1.200").with_icon(STAR_SVG).selected(true)),
            ),
            (
                build(&MarkerDescription::new("A\nB\nC").with_size("large")),
                build(&MarkerDescription::new("D").with_size("small").with_pointer(true)),
            ),
        ]
    }

    #[test]
    fn test_endpoints_reproduce_inputs() {
        for (start, end) in pairs() {
            assert_eq!(interpolate(&start, &end, 0.0), start);
            assert_eq!(interpolate(&start, &end, 1.0), end);
        }
    }

    #[test]
    fn test_frames_stay_in_range() {
        for (start, end) in pairs() {
            for step in 0..=20 {
                let t = step as f32 / 20.0;
                let frame = interpolate(&start, &end, t);
                for element in frame.paint_order() {
                    assert!((0.0..=1.0).contains(&element.alpha), "alpha at t={}", t);
                    assert!(element.bounds.width >= 0.0, "width at t={}", t);
                    assert!(element.bounds.height >= 0.0, "height at t={}", t);
                }
            }
        }
    }

    #[test]
    fn test_frame_canvas_contains_every_element() {
        let mut cases = pairs();
        cases.push((
            build(&MarkerDescription::new("7").with_pointer(true)),
            build(&MarkerDescription::new("7")),
        ));
        cases.push((
            build(&MarkerDescription::new("A\nB\nC")),
            build(&MarkerDescription::new("A")),
        ));

        for (start, end) in cases {
            for step in 0..=20 {
                let t = step as f32 / 20.0;
                let frame = interpolate(&start, &end, t);
                let canvas = frame.canvas.as_ref().unwrap().bounds;
                for element in frame.content() {
                    assert!(
                        canvas.contains_rect(&element.bounds),
                        "{:?} outside canvas {:?} at t={}",
                        element.bounds,
                        canvas,
                        t
                    );
                }
            }
        }
    }

    /// One label line growing to two
    #[test]
    fn test_appearing_line_fades_in() {
        let start = build(&MarkerDescription::new("Studio"));
        let end = build(&MarkerDescription::new("Studio\n30 m²"));

        assert_eq!(interpolate(&start, &end, 0.0).labels[0], start.labels[0]);
        assert_eq!(interpolate(&start, &end, 1.0).labels[0], end.labels[0]);

        let mut previous = 0.0;
        for step in 1..=10 {
            let frame = interpolate(&start, &end, step as f32 / 10.0);
            assert_eq!(frame.labels.len(), 2);
            let appearing = frame.labels[1].alpha;
            assert!(appearing > previous);
            previous = appearing;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn test_selection_midpoint_color() {
        let start = build(&MarkerDescription::new("12"));
        let end = build(&MarkerDescription::new("12").selected(true));
        let c0 = start.bubble.as_ref().unwrap().fill_color;
        let c1 = end.bubble.as_ref().unwrap().fill_color;

        let frame = interpolate(&start, &end, 0.5);
        let mid = frame.bubble.unwrap().fill_color;
        assert_eq!(
            mid,
            Rgba::new(
                c0.r * 0.5 + c1.r * 0.5,
                c0.g * 0.5 + c1.g * 0.5,
                c0.b * 0.5 + c1.b * 0.5,
                c0.a * 0.5 + c1.a * 0.5,
            )
        );
    }

    #[test]
    fn test_pointer_fades_without_moving() {
        let start = build(&MarkerDescription::new("7").with_pointer(true));
        let end = build(&MarkerDescription::new("7"));
        let pointer = start.pointer.clone().unwrap();

        let frame = interpolate(&start, &end, 0.4);
        let fading = frame.pointer.unwrap();
        assert_eq!(fading.bounds, pointer.bounds);
        approx::assert_relative_eq!(fading.alpha, 0.6);
    }
}
