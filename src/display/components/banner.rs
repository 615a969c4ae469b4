/*
 *  display/components/banner.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Red banner with knockout location, time and date
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

use chrono::NaiveDateTime;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::display::color::{BACKGROUND, INK};
use crate::display::components::TextPlacement;
use crate::display::fit::{fit_lines, fit_width};
use crate::display::fonts::{FontCache, Typeface};
use crate::display::layout::LayoutConfig;
use crate::weather::WeatherSummary;

/// Strings shown in the banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerText {
    /// "City, CC"
    pub location: String,
    pub time: String,
    pub date: String,
}

impl BannerText {
    /// Banner strings for a record at `now`
    ///
    /// `country` replaces the record's country code when given, so a
    /// caller can show a display label such as "UK" instead of "GB".
    pub fn new(summary: &WeatherSummary, now: NaiveDateTime, country: Option<&str>) -> Self {
        let country = country
            .or(summary.location.country.as_deref())
            .unwrap_or_default()
            .trim()
            .to_uppercase();
        let city = summary.location.city.trim();
        let location = if country.is_empty() {
            city.to_string()
        } else {
            format!("{}, {}", city, country)
        };
        Self {
            location,
            time: now.format(TIME_FORMAT).to_string(),
            date: now.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Resolved banner geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerPlacement {
    /// Rows `0..height` belong to the banner
    pub height: u32,
    pub time: TextPlacement,
    pub date: TextPlacement,
    pub location: TextPlacement,
}

/// Fill the banner on the red plane and knock the text out of it
pub fn draw_banner<D>(
    red: &mut D,
    layout: &LayoutConfig,
    cache: &mut FontCache,
    face: &Typeface,
    text: &BannerText,
) -> Result<BannerPlacement, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let banner = &layout.banner;
    let bh = layout.banner_height();
    let width = layout.width as i32;
    let pad = layout.padding as i32;

    red.fill_solid(&Rectangle::new(Point::zero(), Size::new(layout.width, bh)), INK)?;

    // time over date, one size for both, right aligned
    let clock = fit_lines(
        cache,
        face,
        &[&text.time, &text.date],
        banner.line_gap,
        layout.right_block_max_width(),
        layout.banner_inner_height(),
        banner.clock_sizes,
    );
    let clock_font = cache.get(face, clock.size);
    let te = clock_font.measure(&text.time);
    let de = clock_font.measure(&text.date);
    let right_w = te.width.max(de.width) as i32;
    let right_h = (te.height + banner.line_gap + de.height) as i32;
    let rx = width - pad - right_w;
    let ry = centered(bh as i32, right_h);

    let time_at = Point::new(width - pad - te.width as i32, ry);
    let date_at = Point::new(width - pad - de.width as i32, ry + (te.height + banner.line_gap) as i32);
    clock_font.draw(red, &text.time, time_at, BACKGROUND)?;
    clock_font.draw(red, &text.date, date_at, BACKGROUND)?;

    let left_max_w = (banner.left_min_width as i32).max(rx - pad - banner.block_gap as i32);
    let loc = fit_width(cache, face, &text.location, left_max_w, banner.location_sizes);
    let loc_font = cache.get(face, loc.size);
    let le = loc_font.measure(&text.location);
    let loc_at = Point::new(pad, centered(bh as i32, le.height as i32));
    loc_font.draw(red, &text.location, loc_at, BACKGROUND)?;

    debug!(
        "banner {}px: clock {}px{} location {}px{} (budget {})",
        bh,
        clock.size,
        if clock.fitted { "" } else { " (floor)" },
        loc.size,
        if loc.fitted { "" } else { " (floor)" },
        left_max_w
    );

    Ok(BannerPlacement {
        height: bh,
        time: TextPlacement {
            text: text.time.clone(),
            size: clock.size,
            fitted: clock.fitted,
            rect: Rectangle::new(time_at, Size::new(te.width, te.height)),
        },
        date: TextPlacement {
            text: text.date.clone(),
            size: clock.size,
            fitted: clock.fitted,
            rect: Rectangle::new(date_at, Size::new(de.width, de.height)),
        },
        location: TextPlacement {
            text: text.location.clone(),
            size: loc.size,
            fitted: loc.fitted,
            rect: Rectangle::new(loc_at, Size::new(le.width, le.height)),
        },
    })
}

/// Offset that centers `inner` in `outer`, floored
pub(crate) fn centered(outer: i32, inner: i32) -> i32 {
    (outer - inner).div_euclid(2)
}
