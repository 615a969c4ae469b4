//! Rasterise SVG icon sources to RGBA so they can go through the same
//! normalisation as PNG glyphs.
//!
//! Uses `usvg` (via `resvg`'s re-export) for parsing and `resvg` for
//! rendering into a `tiny-skia` pixmap.

use image::RgbaImage;
use log::debug;
use resvg::{
    render,
    usvg::{Options as UsvgOptions, Transform, Tree},
};
use thiserror::Error;
use tiny_skia::Pixmap;

#[derive(Debug, Error)]
pub enum SvgImageError {
    /// Error parsing the SVG data.
    #[error("SVG parse error: {0}")]
    Parse(String),
    /// Error creating a pixmap for rendering.
    #[error("pixmap creation error: {0}x{1}")]
    Pixmap(u32, u32),
    /// The document has no drawable area.
    #[error("SVG has an empty canvas")]
    EmptyCanvas,
}

/// Cheap sniff for SVG documents, used to pick a decoder
pub fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Render `data` into a `size` x `size` RGBA image
///
/// The drawing is scaled uniformly to fit and centered; uncovered pixels
/// stay fully transparent.
pub fn rasterize_svg(data: &[u8], size: u32) -> Result<RgbaImage, SvgImageError> {
    let tree = Tree::from_data(data, &UsvgOptions::default())
        .map_err(|e| SvgImageError::Parse(format!("{:?}", e)))?;

    let svg_size = tree.size();
    if svg_size.width() <= 0.0 || svg_size.height() <= 0.0 {
        return Err(SvgImageError::EmptyCanvas);
    }

    let mut pixmap = Pixmap::new(size, size).ok_or(SvgImageError::Pixmap(size, size))?;

    let scale = (size as f32 / svg_size.width()).min(size as f32 / svg_size.height());
    let dx = (size as f32 - svg_size.width() * scale) / 2.0;
    let dy = (size as f32 - svg_size.height() * scale) / 2.0;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, dx, dy);
    render(&tree, transform, &mut pixmap.as_mut());

    let mut out = RgbaImage::new(size, size);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    debug!("SVG {}x{} rasterised at {}px", svg_size.width(), svg_size.height(), size);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect x="5" y="0" width="10" height="10" fill="black"/>
    </svg>"#;

    #[test]
    fn test_sniff() {
        assert!(looks_like_svg(SQUARE.as_bytes()));
        assert!(looks_like_svg(b"<?xml version=\"1.0\"?>\n<svg></svg>"));
        assert!(!looks_like_svg(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_rasterize_fits_and_centers() {
        let img = rasterize_svg(SQUARE.as_bytes(), 40).unwrap();
        assert_eq!(img.dimensions(), (40, 40));
        // scaled 2x, placed at y offset 10; the rect spans x 10..30
        assert_eq!(img.get_pixel(20, 20).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(20, 2).0[3], 0);
        assert_eq!(img.get_pixel(2, 20).0[3], 0);
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(matches!(rasterize_svg(b"not svg", 10), Err(SvgImageError::Parse(_))));
    }
}
