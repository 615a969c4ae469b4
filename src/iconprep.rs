/*
 *  iconprep.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Normalise condition glyphs into square 1-bit icons
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

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, RgbaImage};
use log::{error, info};
use thiserror::Error;

use crate::constants::{ICON_PADDING, ICON_WHITE_CUTOFF, OPENWEATHER_ICON_URL};
use crate::iconstore::DirIconStore;
#[cfg(feature = "svg-icons")]
use crate::svgimage::{looks_like_svg, rasterize_svg, SvgImageError};
use crate::weather::{OpenWeatherClient, WeatherError};

const INK_LUMA: u8 = 0;
const PAPER_LUMA: u8 = 255;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[cfg(feature = "svg-icons")]
    #[error(transparent)]
    Svg(#[from] SvgImageError),

    #[error("SVG sources need the svg-icons feature")]
    SvgUnsupported,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no source image for icon {0}")]
    MissingSource(String),

    #[error("download failed: {0}")]
    Fetch(#[from] WeatherError),

    #[error("invalid icon key {0:?}")]
    InvalidKey(String),
}

/// Tunables of the normaliser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// A pixel is ink when any channel is below this
    pub cutoff: u8,

    /// Margin kept around the ink bounding box
    pub padding: u32,

    /// Raster size for SVG sources
    pub svg_size: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            cutoff: ICON_WHITE_CUTOFF,
            padding: ICON_PADDING,
            svg_size: crate::constants::SVG_RASTER_SIZE,
        }
    }
}

/// Black-on-white 1-bit icon, pixels are exactly 0 or 255
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    image: GrayImage,
}

impl IconAsset {
    /// Wrap an image, thresholding anything not clearly dark to paper
    pub fn from_image(image: GrayImage) -> Self {
        let mut image = image;
        for p in image.pixels_mut() {
            p.0[0] = if p.0[0] < 128 { INK_LUMA } else { PAPER_LUMA };
        }
        Self { image }
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y).0[0] == INK_LUMA
    }

    /// Ink bounding box as (left, top, right, bottom), right/bottom exclusive
    pub fn ink_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        ink_bounds(&self.image)
    }

    /// Nearest-neighbour copy at `side` x `side`
    pub fn resized(&self, side: u32) -> IconAsset {
        let (w, h) = self.image.dimensions();
        if (w, h) == (side, side) || w == 0 || h == 0 {
            return self.clone();
        }
        // sample at destination pixel centres
        let image = GrayImage::from_fn(side, side, |x, y| {
            let sx = ((2 * x + 1) * w / (2 * side)).min(w - 1);
            let sy = ((2 * y + 1) * h / (2 * side)).min(h - 1);
            *self.image.get_pixel(sx, sy)
        });
        IconAsset { image }
    }

    /// Load a stored icon; transparent pixels read as paper
    pub fn load_png(path: &Path) -> Result<Self, IconError> {
        let flat = flatten_on_white(&image::open(path)?.to_rgba8());
        Ok(Self::from_image(DynamicImage::ImageRgb8(flat).to_luma8()))
    }

    pub fn save_png(&self, path: &Path) -> Result<(), IconError> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Source bytes to a canonical icon
///
/// Malformed bytes are a decode error. An image without any ink comes
/// back as its binarised self, with no trim or squaring.
pub fn normalize_icon(data: &[u8], opts: &NormalizeOptions) -> Result<IconAsset, IconError> {
    let rgba = decode_source(data, opts)?;
    Ok(normalize_image(&rgba, opts))
}

/// Same pipeline for an already decoded image
pub fn normalize_image(rgba: &RgbaImage, opts: &NormalizeOptions) -> IconAsset {
    let bw = binarize(&flatten_on_white(rgba), opts.cutoff);
    match trim(&bw, opts.padding) {
        Some(trimmed) => IconAsset { image: square(&trimmed) },
        None => IconAsset { image: bw },
    }
}

/// Decode PNG/JPEG/etc. or rasterise SVG into RGBA
pub fn decode_source(data: &[u8], opts: &NormalizeOptions) -> Result<RgbaImage, IconError> {
    #[cfg(feature = "svg-icons")]
    if looks_like_svg(data) {
        return Ok(rasterize_svg(data, opts.svg_size)?);
    }
    #[cfg(not(feature = "svg-icons"))]
    {
        let _ = opts;
        let head = String::from_utf8_lossy(&data[..data.len().min(256)]).to_string();
        if head.contains("<svg") {
            return Err(IconError::SvgUnsupported);
        }
    }
    Ok(image::load_from_memory(data)?.to_rgba8())
}

/// Composite over opaque white
pub fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let mix = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([mix(r), mix(g), mix(b)])
    })
}

/// Ink wherever any channel is below `cutoff`
pub fn binarize(rgb: &RgbImage, cutoff: u8) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let ink = rgb.get_pixel(x, y).0.iter().any(|&c| c < cutoff);
        Luma([if ink { INK_LUMA } else { PAPER_LUMA }])
    })
}

/// (left, top, right, bottom) of ink pixels, right/bottom exclusive
pub fn ink_bounds(bw: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in bw.enumerate_pixels() {
        if p.0[0] != INK_LUMA {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }
    bounds
}

/// Crop to the ink box grown by `padding`, clamped to the image
///
/// None when there is no ink or the clamped box is empty.
pub fn trim(bw: &GrayImage, padding: u32) -> Option<GrayImage> {
    let (l, t, r, b) = ink_bounds(bw)?;
    let left = l.saturating_sub(padding);
    let top = t.saturating_sub(padding);
    let right = (r + padding).min(bw.width());
    let bottom = (b + padding).min(bw.height());
    if right <= left || bottom <= top {
        return None;
    }
    Some(image::imageops::crop_imm(bw, left, top, right - left, bottom - top).to_image())
}

/// Center on a white square of side max(w, h)
pub fn square(bw: &GrayImage) -> GrayImage {
    let (w, h) = bw.dimensions();
    let side = w.max(h);
    let mut out = GrayImage::from_pixel(side, side, Luma([PAPER_LUMA]));
    image::imageops::replace(&mut out, bw, ((side - w) / 2) as i64, ((side - h) / 2) as i64);
    out
}

/// Outcome of building an icon set
#[derive(Debug, Default)]
pub struct PrepareReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, String)>,
}

impl PrepareReport {
    fn record(&mut self, id: &str, result: Result<PathBuf, IconError>) {
        match result {
            Ok(path) => {
                info!("  -> saved {}", path.display());
                self.written.push(path);
            }
            Err(e) => {
                error!("icon {} failed: {}", id, e);
                self.failed.push((id.to_string(), e.to_string()));
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Locate a source glyph for `id` in `dir`
pub fn find_source(dir: &Path, id: &str) -> Option<PathBuf> {
    [format!("{id}.png"), format!("{id}@2x.png"), format!("{id}.svg")]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Normalise every id from glyphs found under `src`
pub fn prepare_from_dir(
    src: &Path,
    store: &DirIconStore,
    ids: &[&str],
    opts: &NormalizeOptions,
) -> Result<PrepareReport, IconError> {
    store.ensure_dir()?;
    let mut report = PrepareReport::default();
    for id in ids {
        info!("Preparing {} ...", id);
        let result = find_source(src, id)
            .ok_or_else(|| IconError::MissingSource(id.to_string()))
            .and_then(|path| {
                std::fs::read(&path).map_err(|source| IconError::Io { path, source })
            })
            .and_then(|data| normalize_icon(&data, opts))
            .and_then(|icon| store.put(id, &icon));
        report.record(id, result);
    }
    Ok(report)
}

/// Download every id from the OpenWeatherMap icon set and normalise it
pub async fn prepare_from_web(
    client: &OpenWeatherClient,
    store: &DirIconStore,
    ids: &[&str],
    opts: &NormalizeOptions,
) -> Result<PrepareReport, IconError> {
    store.ensure_dir()?;
    let mut report = PrepareReport::default();
    for id in ids {
        let url = OPENWEATHER_ICON_URL.replace("{icon}", id);
        info!("Downloading {} ...", id);
        let result = match client.download(&url).await {
            Ok(data) => normalize_icon(&data, opts).and_then(|icon| store.put(id, &icon)),
            Err(e) => Err(e.into()),
        };
        report.record(id, result);
    }
    Ok(report)
}
