/*
 *  display/renderer.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  One weather record in, a black and a red plane out
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

use chrono::NaiveDateTime;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::RgbImage;
use log::{debug, info};

use crate::display::components::{
    draw_banner, draw_content, place_icon, BannerPlacement, BannerText, ContentPlacement,
    ContentText,
};
use crate::display::compositor::composite_preview;
use crate::display::error::DisplayError;
use crate::display::fonts::{FontCache, Typeface};
use crate::display::layout::LayoutConfig;
use crate::display::planes::Planes;
use crate::iconstore::IconStore;
use crate::weather::WeatherSummary;

/// Inputs that are not part of the weather record
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Time printed in the banner
    pub now: NaiveDateTime,

    /// Banner country label overriding the record's code
    pub country: Option<&'a str>,
}

impl RenderContext<'_> {
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now, country: None }
    }

    pub fn local_now() -> Self {
        Self::at(chrono::Local::now().naive_local())
    }
}

/// Everything the layout decided for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutReport {
    pub banner: BannerPlacement,
    pub content: ContentPlacement,
    /// Icon slot, None when no icon was placed
    pub icon: Option<Rectangle>,
}

/// Rendered frame
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub planes: Planes,
    pub report: LayoutReport,
}

/// Paths written by `Dashboard::save`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub black: PathBuf,
    pub red: PathBuf,
    pub preview: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, prefix: &str) -> Self {
        Self {
            black: dir.join(format!("{prefix}_black.png")),
            red: dir.join(format!("{prefix}_red.png")),
            preview: dir.join(format!("{prefix}_preview.png")),
        }
    }
}

impl Dashboard {
    /// Full color composite for normal screens
    pub fn preview(&self) -> RgbImage {
        composite_preview(&self.planes)
    }

    /// Write `<prefix>_black.png`, `<prefix>_red.png` and `<prefix>_preview.png`
    pub fn save(&self, dir: &Path, prefix: &str) -> Result<OutputPaths, DisplayError> {
        let paths = OutputPaths::new(dir, prefix);
        self.planes.save_pngs(&paths.black, &paths.red)?;
        self.preview().save(&paths.preview)?;
        info!(
            "Wrote {}, {}, {}",
            paths.black.display(),
            paths.red.display(),
            paths.preview.display()
        );
        Ok(paths)
    }
}

/// Layout engine bound to a canvas and a typeface
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: LayoutConfig,
    typeface: Typeface,
}

impl Renderer {
    pub fn new(layout: LayoutConfig, typeface: Typeface) -> Self {
        Self { layout, typeface }
    }

    /// Lay out and draw one record
    ///
    /// Never fails: missing readings print a placeholder, a missing icon
    /// leaves the slot empty and text that cannot fit uses the floor size.
    pub fn render(
        &self,
        summary: &WeatherSummary,
        ctx: &RenderContext<'_>,
        icons: &dyn IconStore,
    ) -> Dashboard {
        let mut planes = Planes::new(self.layout.width, self.layout.height);
        let Ok(report) = self.compose(&mut planes.black, &mut planes.red, summary, ctx, icons);
        Dashboard { planes, report }
    }

    /// Draw every region of the frame onto a black and a red target
    pub fn compose<D>(
        &self,
        black: &mut D,
        red: &mut D,
        summary: &WeatherSummary,
        ctx: &RenderContext<'_>,
        icons: &dyn IconStore,
    ) -> Result<LayoutReport, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let layout = &self.layout;
        let mut cache = FontCache::new();

        let banner_text = BannerText::new(summary, ctx.now, ctx.country);
        let banner = draw_banner(red, layout, &mut cache, &self.typeface, &banner_text)?;

        if summary.temperature_c.is_none() {
            debug!("temperature missing, drawing placeholder");
        }
        let content_text = ContentText::new(summary);
        let content = draw_content(black, layout, &mut cache, &self.typeface, &content_text)?;

        let asset = summary
            .icon
            .as_deref()
            .filter(|k| !k.is_empty())
            .and_then(|key| {
                let found = icons.icon(key);
                if found.is_none() {
                    debug!("no icon asset for {:?}, slot left empty", key);
                }
                found
            });
        let icon = place_icon(black, red, layout, asset.as_deref(), content.top, content.height)?;

        debug!(
            "rendered {}x{} with {} sized fonts ({} refinement passes)",
            layout.width,
            layout.height,
            cache.len(),
            content.refinements
        );

        Ok(LayoutReport { banner, content, icon })
    }
}
