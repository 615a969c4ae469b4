/*
 *  display/fonts.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Typefaces, sized fonts and the per-render font cache
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use embedded_graphics::mono_font::iso_8859_1::{
    FONT_10X20, FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X10, FONT_6X12, FONT_6X13, FONT_6X9,
    FONT_7X13, FONT_7X14, FONT_8X13, FONT_9X15, FONT_9X18,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
use log::{debug, info, warn};
use rusttype::{point, Font, PositionedGlyph, Scale};

/// Identifier of the built-in bitmap typeface
pub const BUILTIN_FACE_ID: &str = "builtin-mono";

/// Largest integer magnification applied to bitmap glyphs
const MAX_MAGNIFICATION: u32 = 4;

/// Coverage at or above which a TrueType sample becomes ink
const COVERAGE_THRESHOLD: f32 = 0.5;

/// Bitmap fonts ordered by cell height, narrower first on equal height
const BITMAP_LADDER: [&MonoFont<'static>; 13] = [
    &FONT_4X6,
    &FONT_5X7,
    &FONT_5X8,
    &FONT_6X9,
    &FONT_6X10,
    &FONT_6X12,
    &FONT_6X13,
    &FONT_7X13,
    &FONT_8X13,
    &FONT_7X14,
    &FONT_9X15,
    &FONT_9X18,
    &FONT_10X20,
];

/// Pixel extent of a rendered string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// A typeface the fit search can request at any pixel size
#[derive(Clone)]
pub enum Typeface {
    /// Outline font loaded from a TrueType file
    TrueType { id: String, font: Arc<Font<'static>> },

    /// ISO-8859-1 mono bitmap fonts with integer magnification
    Builtin,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typeface::TrueType { id, .. } => write!(f, "Typeface::TrueType({})", id),
            Typeface::Builtin => write!(f, "Typeface::Builtin"),
        }
    }
}

impl Typeface {
    /// Stable identifier, used as part of the cache key
    pub fn id(&self) -> &str {
        match self {
            Typeface::TrueType { id, .. } => id,
            Typeface::Builtin => BUILTIN_FACE_ID,
        }
    }

    /// Parse TrueType data, None if the bytes are not a usable font
    pub fn from_bytes(id: impl Into<String>, data: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(data).map(|font| Typeface::TrueType {
            id: id.into(),
            font: Arc::new(font),
        })
    }

    /// Load the first candidate that exists and parses
    ///
    /// Falls back to the built-in bitmap typeface when none does.
    pub fn load_first<P: AsRef<Path>>(candidates: &[P]) -> Self {
        for path in candidates.iter().map(AsRef::as_ref) {
            if !path.exists() {
                debug!("font candidate {} not present", path.display());
                continue;
            }
            match std::fs::read(path) {
                Ok(data) => {
                    if let Some(face) = Self::from_bytes(path.display().to_string(), data) {
                        info!("using typeface {}", path.display());
                        return face;
                    }
                    warn!("font file {} could not be parsed", path.display());
                }
                Err(e) => warn!("font file {} unreadable: {}", path.display(), e),
            }
        }
        info!("no TrueType font available, using built-in bitmap typeface");
        Typeface::Builtin
    }

    /// Resolve this typeface at a pixel size
    pub fn sized(&self, px: u32) -> SizedFont {
        let kind = match self {
            Typeface::TrueType { font, .. } => {
                SizedKind::Outline { font: Arc::clone(font), scale: Scale::uniform(px as f32) }
            }
            Typeface::Builtin => {
                let (font, factor) = pick_bitmap(px);
                SizedKind::Bitmap { font, factor }
            }
        };
        SizedFont { px, kind }
    }
}

pub fn default_candidates() -> Vec<PathBuf> {
    crate::constants::DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect()
}

/// Tallest ladder font * factor not exceeding `px`, smaller factor on ties
fn pick_bitmap(px: u32) -> (&'static MonoFont<'static>, u32) {
    let mut best = (BITMAP_LADDER[0], 1u32);
    let mut best_h = 0u32;
    for factor in 1..=MAX_MAGNIFICATION {
        for font in BITMAP_LADDER {
            let h = font.character_size.height * factor;
            if h <= px && h > best_h {
                best = (font, factor);
                best_h = h;
            }
        }
    }
    best
}

#[derive(Clone)]
enum SizedKind {
    Outline { font: Arc<Font<'static>>, scale: Scale },
    Bitmap { font: &'static MonoFont<'static>, factor: u32 },
}

/// A typeface fixed at one pixel size
#[derive(Clone)]
pub struct SizedFont {
    px: u32,
    kind: SizedKind,
}

impl fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SizedKind::Outline { .. } => write!(f, "SizedFont(outline, {}px)", self.px),
            SizedKind::Bitmap { font, factor } => write!(
                f,
                "SizedFont(bitmap {}x{} x{}, {}px)",
                font.character_size.width, font.character_size.height, factor, self.px
            ),
        }
    }
}

impl SizedFont {
    /// Extent of `text`: ink box for outlines, cell box for bitmaps
    pub fn measure(&self, text: &str) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }
        match &self.kind {
            SizedKind::Outline { font, scale } => outline_layout(font, *scale, text)
                .map(|(_, bounds)| TextExtent {
                    width: (bounds.max.x - bounds.min.x) as u32,
                    height: (bounds.max.y - bounds.min.y) as u32,
                })
                .unwrap_or_default(),
            SizedKind::Bitmap { font, factor } => {
                let style = MonoTextStyle::new(*font, BinaryColor::On);
                let size = style
                    .measure_string(text, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size;
                TextExtent { width: size.width * factor, height: size.height * factor }
            }
        }
    }

    /// Draw `text` with its extent box starting at `top_left`
    pub fn draw<D>(
        &self,
        target: &mut D,
        text: &str,
        top_left: Point,
        color: BinaryColor,
    ) -> Result<TextExtent, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        match &self.kind {
            SizedKind::Outline { font, scale } => {
                let Some((glyphs, bounds)) = outline_layout(font, *scale, text) else {
                    return Ok(TextExtent::default());
                };
                let mut pixels = Vec::new();
                for glyph in &glyphs {
                    let Some(bb) = glyph.pixel_bounding_box() else { continue };
                    let dx = top_left.x + bb.min.x - bounds.min.x;
                    let dy = top_left.y + bb.min.y - bounds.min.y;
                    glyph.draw(|gx, gy, coverage| {
                        if coverage >= COVERAGE_THRESHOLD {
                            pixels.push(Pixel(Point::new(dx + gx as i32, dy + gy as i32), color));
                        }
                    });
                }
                target.draw_iter(pixels)?;
                Ok(TextExtent {
                    width: (bounds.max.x - bounds.min.x) as u32,
                    height: (bounds.max.y - bounds.min.y) as u32,
                })
            }
            SizedKind::Bitmap { font, factor } => {
                let style = MonoTextStyle::new(*font, color);
                if *factor == 1 {
                    Text::with_baseline(text, top_left, style, Baseline::Top).draw(target)?;
                } else {
                    let mut magnified = Magnify { target, origin: top_left, factor: *factor };
                    Text::with_baseline(text, Point::zero(), style, Baseline::Top)
                        .draw(&mut magnified)?;
                }
                Ok(self.measure(text))
            }
        }
    }
}

/// Glyphs laid out on one line plus the union of their pixel boxes
fn outline_layout(
    font: &Font<'static>,
    scale: Scale,
    text: &str,
) -> Option<(Vec<PositionedGlyph<'static>>, rusttype::Rect<i32>)> {
    let ascent = font.v_metrics(scale).ascent;
    let glyphs: Vec<PositionedGlyph<'static>> = font.layout(text, scale, point(0.0, ascent)).collect();
    let bounds = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .reduce(|a, b| rusttype::Rect {
            min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        })?;
    Some((glyphs, bounds))
}

/// Draw target adapter scaling every pixel to a `factor` x `factor` block
struct Magnify<'a, D> {
    target: &'a mut D,
    origin: Point,
    factor: u32,
}

impl<D: DrawTarget> OriginDimensions for Magnify<'_, D> {
    fn size(&self) -> Size {
        self.target.bounding_box().size
    }
}

impl<D: DrawTarget> DrawTarget for Magnify<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new(self.factor, self.factor);
        for Pixel(p, c) in pixels {
            let at = self.origin + p * self.factor as i32;
            self.target.fill_solid(&Rectangle::new(at, block), c)?;
        }
        Ok(())
    }
}

/// Sized fonts keyed by (typeface id, pixel size)
///
/// Owned by a single render call, so nothing is shared between renders.
#[derive(Debug, Default)]
pub struct FontCache {
    entries: HashMap<(String, u32), Arc<SizedFont>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, face: &Typeface, px: u32) -> Arc<SizedFont> {
        Arc::clone(
            self.entries
                .entry((face.id().to_string(), px))
                .or_insert_with(|| Arc::new(face.sized(px))),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
