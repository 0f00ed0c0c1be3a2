//! SVG icon rasterization with an in-memory LRU of recolored bitmaps.

use crate::core::color::Rgba;
use crate::MarkerError;
use fxhash::FxHasher;
use lru::LruCache;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

static FILL_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"fill\s*=\s*"([^"]*)""#).expect("fill attribute pattern is valid")
});

/// Rasterized icon, premultiplied RGBA
#[derive(Debug, Clone)]
pub struct IconBitmap {
    pixmap: Pixmap,
}

impl IconBitmap {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct IconKey {
    svg_hash: u64,
    width: u32,
    height: u32,
    color: [u8; 3],
}

/// Rewrites every `fill` attribute except `none` to `color`. Documents
/// without any fill attribute get one on the root element.
pub fn recolor_svg(svg: &str, color: Rgba) -> String {
    let hex = color.to_hex_rgb();
    if !FILL_ATTR.is_match(svg) {
        return svg.replacen("<svg", &format!("<svg fill=\"{}\"", hex), 1);
    }
    FILL_ATTR
        .replace_all(svg, |caps: &Captures<'_>| {
            if caps[1].trim().eq_ignore_ascii_case("none") {
                caps[0].to_string()
            } else {
                format!("fill=\"{}\"", hex)
            }
        })
        .into_owned()
}

/// Turns icon documents into bitmaps, memoized by document, size and color
#[derive(Debug)]
pub struct IconRasterizer {
    cache: Mutex<LruCache<IconKey, Arc<IconBitmap>>>,
}

impl IconRasterizer {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn rasterize(
        &self,
        svg: &str,
        width: u32,
        height: u32,
        color: Rgba,
    ) -> crate::Result<Arc<IconBitmap>> {
        let [r, g, b, _] = color.to_rgba8();
        let mut hasher = FxHasher::default();
        svg.hash(&mut hasher);
        let key = IconKey {
            svg_hash: hasher.finish(),
            width: width.max(1),
            height: height.max(1),
            color: [r, g, b],
        };

        if let Some(bitmap) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(bitmap));
        }

        let bitmap = Arc::new(render_svg(&recolor_svg(svg, color), key.width, key.height)?);
        log::debug!(
            "Rasterized icon {:016x} at {}x{}",
            key.svg_hash,
            key.width,
            key.height
        );
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, Arc::clone(&bitmap));
        Ok(bitmap)
    }

    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn render_svg(svg: &str, width: u32, height: u32) -> crate::Result<IconBitmap> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|err| MarkerError::IconDecode(err.to_string()))?;
    let size = tree.size();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(MarkerError::SurfaceAllocation { width, height })?;

    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(IconBitmap { pixmap })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path fill="#123456" d="M0 0h24v24H0z"/><path fill="none" d="M0 0h1v1H0z"/></svg>"##;

    #[test]
    fn test_recolor_keeps_none() {
        let recolored = recolor_svg(SQUARE, Rgba::from_rgb8(57, 87, 189));
        assert!(recolored.contains(r##"fill="#3957BD""##));
        assert!(recolored.contains(r#"fill="none""#));
        assert!(!recolored.contains("#123456"));
    }

    #[test]
    fn test_recolor_injects_root_fill() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0h2v2H0z"/></svg>"#;
        let recolored = recolor_svg(svg, Rgba::WHITE);
        assert!(recolored.starts_with(r##"<svg fill="#FFFFFF""##));
    }

    #[test]
    fn test_rasterize_and_memoize() {
        let icons = IconRasterizer::new(4);
        let first = icons.rasterize(SQUARE, 16, 16, Rgba::BLACK).unwrap();
        let second = icons.rasterize(SQUARE, 16, 16, Rgba::BLACK).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.width(), 16);
        assert_eq!(icons.len(), 1);

        let center = first.pixmap().pixel(8, 8).unwrap();
        assert_eq!(center.alpha(), 255);

        icons.rasterize(SQUARE, 16, 16, Rgba::WHITE).unwrap();
        assert_eq!(icons.len(), 2);
    }

    #[test]
    fn test_invalid_svg_is_not_cached() {
        let icons = IconRasterizer::new(4);
        let err = icons.rasterize("not an svg", 16, 16, Rgba::BLACK).unwrap_err();
        assert!(matches!(err, MarkerError::IconDecode(_)));
        assert!(icons.is_empty());
    }
}
