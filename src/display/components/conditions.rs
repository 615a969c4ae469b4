/*
 *  display/components/conditions.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Temperature, metrics and condition block below the banner
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

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::constants::{PLACEHOLDER, TEMP_UNIT};
use crate::display::color::{BACKGROUND, INK};
use crate::display::components::banner::centered;
use crate::display::components::TextPlacement;
use crate::display::fit::{fit_descending, fit_width, Fit};
use crate::display::fonts::{FontCache, Typeface};
use crate::display::layout::LayoutConfig;
use crate::weather::WeatherSummary;

/// Strings shown in the content block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentText {
    /// Rounded digits or the placeholder
    pub temperature: String,
    pub unit: String,
    pub feels: String,
    pub humidity: String,
    /// Capitalized condition, empty when the record has none
    pub condition: String,
}

impl ContentText {
    pub fn new(summary: &WeatherSummary) -> Self {
        Self {
            temperature: reading(summary.temperature_c),
            unit: TEMP_UNIT.to_string(),
            feels: format!("Feels: {}{}", reading(summary.feels_like_c), TEMP_UNIT),
            humidity: format!("Humid: {}%", reading(summary.humidity_pct)),
            condition: capitalize(summary.conditions.as_deref().unwrap_or_default().trim()),
        }
    }
}

/// Whole-number reading, placeholder when missing
fn reading(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}", v),
        None => PLACEHOLDER.to_string(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolved content geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPlacement {
    /// Top row the block was finally drawn at
    pub top: i32,

    /// Measured block height, icon slot included
    pub height: u32,

    /// Height guessed before the condition font was known
    pub estimated_height: u32,

    /// Number of clear-and-redraw passes taken
    pub refinements: u32,

    pub temperature: TextPlacement,
    pub unit: TextPlacement,
    pub feels: TextPlacement,
    pub humidity: TextPlacement,
    pub condition: Option<TextPlacement>,
}

/// Font sizes fixed before any drawing happens
#[derive(Debug, Clone, Copy)]
struct ContentFonts {
    temp: Fit,
    unit: u32,
}

/// Draw the content block on the black plane, centered below the banner
pub fn draw_content<D>(
    black: &mut D,
    layout: &LayoutConfig,
    cache: &mut FontCache,
    face: &Typeface,
    text: &ContentText,
) -> Result<ContentPlacement, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let content = &layout.content;
    let fonts = fit_temperature(layout, cache, face, text);

    let num = cache.get(face, fonts.temp.size).measure(&text.temperature);
    let unit = cache.get(face, fonts.unit).measure(&text.unit);
    let temp_h = num.height.max(unit.height);

    let condition_rel = content.metrics_top + content.condition_top;
    let condition_guess = if text.condition.is_empty() {
        0
    } else {
        cache.get(face, content.metrics_size).measure(&text.condition).height
    };
    let estimated = temp_h.max(condition_rel + condition_guess).max(layout.icon.size);

    let mut top = content_top(layout, estimated);
    let mut placed = draw_pass(black, layout, cache, face, text, fonts, top)?;
    let mut refinements = 0;
    while refinements < content.max_refinement_passes {
        let refined = content_top(layout, placed.height);
        if refined == top {
            break;
        }
        debug!(
            "content height {} != estimate {}, redrawing at {} (was {})",
            placed.height, estimated, refined, top
        );
        let bh = layout.banner_height();
        black.fill_solid(
            &Rectangle::new(
                Point::new(0, bh as i32),
                Size::new(layout.width, layout.height.saturating_sub(bh)),
            ),
            BACKGROUND,
        )?;
        top = refined;
        placed = draw_pass(black, layout, cache, face, text, fonts, top)?;
        refinements += 1;
    }

    debug!(
        "content top {} height {}: temp {}px{} unit {}px condition {}",
        top,
        placed.height,
        fonts.temp.size,
        if fonts.temp.fitted { "" } else { " (floor)" },
        fonts.unit,
        placed
            .condition
            .as_ref()
            .map(|c| format!("{}px", c.size))
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(ContentPlacement {
        top,
        height: placed.height,
        estimated_height: estimated,
        refinements,
        temperature: placed.temperature,
        unit: placed.unit,
        feels: placed.feels,
        humidity: placed.humidity,
        condition: placed.condition,
    })
}

/// Shrink digits (and the unit with them) until both fit the width cap
fn fit_temperature(
    layout: &LayoutConfig,
    cache: &mut FontCache,
    face: &Typeface,
    text: &ContentText,
) -> ContentFonts {
    let content = &layout.content;
    let temp = fit_descending(
        content.temp_start_size,
        content.temp_min_size,
        content.temp_step,
        |px| {
            let digits = cache.get(face, px).measure(&text.temperature).width;
            let unit = cache.get(face, layout.unit_size_for(px)).measure(&text.unit).width;
            digits + unit <= content.max_temp_width
        },
    );
    ContentFonts { temp, unit: layout.unit_size_for(temp.size) }
}

/// Top row for a block of `height`, centered in the area below the banner
fn content_top(layout: &LayoutConfig, height: u32) -> i32 {
    let bh = layout.banner_height() as i32;
    bh + centered(layout.content_area_height() as i32, height as i32).max(0)
}

struct Pass {
    height: u32,
    temperature: TextPlacement,
    unit: TextPlacement,
    feels: TextPlacement,
    humidity: TextPlacement,
    condition: Option<TextPlacement>,
}

fn draw_pass<D>(
    black: &mut D,
    layout: &LayoutConfig,
    cache: &mut FontCache,
    face: &Typeface,
    text: &ContentText,
    fonts: ContentFonts,
    top: i32,
) -> Result<Pass, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let content = &layout.content;
    let pad = layout.padding as i32;

    let num_font = cache.get(face, fonts.temp.size);
    let num_at = Point::new(pad, top);
    let num = num_font.draw(black, &text.temperature, num_at, INK)?;

    let unit_font = cache.get(face, fonts.unit);
    let unit_ext = unit_font.measure(&text.unit);
    let unit_at = Point::new(
        pad + num.width as i32,
        top + ((num.height as i32 - unit_ext.height as i32) / 2).max(0) - content.unit_raise,
    );
    let unit = unit_font.draw(black, &text.unit, unit_at, INK)?;

    let temp_w = num.width + unit.width;
    let temp_h = num.height.max(unit.height);

    let metrics_x = pad + temp_w as i32 + content.metrics_gap as i32;
    let metrics_y = top + content.metrics_top as i32;
    let small = cache.get(face, content.metrics_size);
    let feels_at = Point::new(metrics_x, metrics_y);
    let humid_at = Point::new(metrics_x, metrics_y + content.metrics_line_gap as i32);
    let feels = small.draw(black, &text.feels, feels_at, INK)?;
    let humid = small.draw(black, &text.humidity, humid_at, INK)?;

    let condition_rel = content.metrics_top + content.condition_top;
    let (condition, height) = if text.condition.is_empty() {
        (None, temp_h.max(layout.icon.size))
    } else {
        let reserved = (layout.icon.size + layout.padding + content.icon_gap) as i32;
        let max_w = layout.width as i32 - metrics_x - reserved;
        let fit = fit_width(cache, face, &text.condition, max_w, content.condition_sizes);
        let font = cache.get(face, fit.size);
        let at = Point::new(metrics_x, top + condition_rel as i32);
        let ext = font.draw(black, &text.condition, at, INK)?;
        let placement = TextPlacement {
            text: text.condition.clone(),
            size: fit.size,
            fitted: fit.fitted,
            rect: Rectangle::new(at, Size::new(ext.width, ext.height)),
        };
        let height = temp_h.max(condition_rel + ext.height).max(layout.icon.size);
        (Some(placement), height)
    };

    Ok(Pass {
        height,
        temperature: TextPlacement {
            text: text.temperature.clone(),
            size: fonts.temp.size,
            fitted: fonts.temp.fitted,
            rect: Rectangle::new(num_at, Size::new(num.width, num.height)),
        },
        unit: TextPlacement {
            text: text.unit.clone(),
            size: fonts.unit,
            fitted: fonts.temp.fitted,
            rect: Rectangle::new(unit_at, Size::new(unit.width, unit.height)),
        },
        feels: TextPlacement {
            text: text.feels.clone(),
            size: content.metrics_size,
            fitted: true,
            rect: Rectangle::new(feels_at, Size::new(feels.width, feels.height)),
        },
        humidity: TextPlacement {
            text: text.humidity.clone(),
            size: content.metrics_size,
            fitted: true,
            rect: Rectangle::new(humid_at, Size::new(humid.width, humid.height)),
        },
        condition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::planes::{ink_count, Planes};

    fn text_for(json: &str) -> ContentText {
        ContentText::new(&WeatherSummary::from_json_str(json).unwrap())
    }

    fn draw(json: &str) -> (Planes, ContentPlacement) {
        let layout = LayoutConfig::default();
        let mut planes = Planes::new(layout.width, layout.height);
        let mut cache = FontCache::new();
        let Ok(placed) =
            draw_content(&mut planes.black, &layout, &mut cache, &Typeface::Builtin, &text_for(json));
        (planes, placed)
    }

    const FULL: &str = r#"{"location": {"city": "London", "country": "GB"},
        "temperature_c": 21.4, "feels_like_c": 19.8, "humidity_pct": 55,
        "conditions": "light rain", "icon": "10d"}"#;

    #[test]
    fn test_content_text_formatting() {
        let t = text_for(FULL);
        assert_eq!(t.temperature, "21");
        assert_eq!(t.feels, "Feels: 20°C");
        assert_eq!(t.humidity, "Humid: 55%");
        assert_eq!(t.condition, "Light rain");
    }

    #[test]
    fn test_missing_readings_use_placeholder() {
        let t = text_for(r#"{"location": {"city": "Nowhere"}}"#);
        assert_eq!(t.temperature, "--");
        assert_eq!(t.feels, "Feels: --°C");
        assert_eq!(t.humidity, "Humid: --%");
        assert_eq!(t.condition, "");
    }

    #[test]
    fn test_capitalize_only_first_char() {
        assert_eq!(capitalize("overcast clouds"), "Overcast clouds");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_layout_for_full_record() {
        let (planes, placed) = draw(FULL);
        assert_eq!(placed.temperature.size, 46);
        assert!(placed.temperature.fitted);
        assert_eq!(placed.temperature.rect, Rectangle::new(Point::new(4, 50), Size::new(54, 45)));
        assert_eq!(placed.unit.size, 23);
        assert_eq!(placed.unit.rect, Rectangle::new(Point::new(58, 60), Size::new(30, 21)));
        assert_eq!(placed.feels.rect.top_left, Point::new(98, 58));
        assert_eq!(placed.humidity.rect.top_left, Point::new(98, 76));

        let cond = placed.condition.expect("condition drawn");
        assert_eq!(cond.size, 14);
        assert_eq!(cond.rect, Rectangle::new(Point::new(98, 98), Size::new(70, 14)));

        assert_eq!(placed.estimated_height, 62);
        assert_eq!(placed.height, 62);
        assert_eq!((placed.top, placed.refinements), (50, 0));

        assert!(ink_count(&planes.black, placed.temperature.rect) > 0);
        assert_eq!(ink_count(&planes.red, planes.red.bounds()), 0);
    }

    #[test]
    fn test_long_condition_triggers_one_refinement() {
        let (planes, placed) = draw(
            r#"{"location": {"city": "X"}, "temperature_c": 3,
                "conditions": "thunderstorm with heavy drizzle and hail"}"#,
        );
        let cond = placed.condition.expect("condition drawn");
        assert_eq!(cond.size, 10);
        assert!(!cond.fitted);
        assert_eq!(placed.estimated_height, 62);
        assert_eq!(placed.height, 60);
        assert_eq!(placed.refinements, 1);
        assert_eq!(placed.top, 51);
        assert_eq!(placed.temperature.rect.top_left.y, 51);

        // nothing left behind from the first pass at row 50
        let row50 = Rectangle::new(Point::new(0, 50), Size::new(250, 1));
        assert_eq!(ink_count(&planes.black, row50), 0);
    }

    #[test]
    fn test_refinement_disabled_keeps_estimate() {
        let mut layout = LayoutConfig::default();
        layout.content.max_refinement_passes = 0;
        let mut planes = Planes::new(layout.width, layout.height);
        let mut cache = FontCache::new();
        let text = text_for(r#"{"location": {"city": "X"}, "conditions": "thunderstorm with heavy drizzle and hail"}"#);
        let Ok(placed) = draw_content(&mut planes.black, &layout, &mut cache, &Typeface::Builtin, &text);
        assert_eq!((placed.top, placed.refinements), (50, 0));
    }

    #[test]
    fn test_content_stays_inside_canvas() {
        for conditions in ["", "mist", "light intensity shower rain and some more words"] {
            let json = format!(
                r#"{{"location": {{"city": "X"}}, "temperature_c": -12.6, "conditions": "{}"}}"#,
                conditions
            );
            let (_, placed) = draw(&json);
            assert!(placed.top >= 40);
            assert!(placed.top + placed.height as i32 <= 122);
        }
    }

    #[test]
    fn test_no_condition_height_ignores_condition_row() {
        let (_, placed) = draw(r#"{"location": {"city": "X"}, "temperature_c": 8}"#);
        assert!(placed.condition.is_none());
        assert_eq!(placed.height, 60);
        assert_eq!(placed.estimated_height, 60);
    }
}
