/*
 *  constants.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel geometry, icon set and service endpoints
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

/// Landscape canvas width of the 2.13" tri-color panel.
pub const CANVAS_WIDTH: u32 = 250;
/// Landscape canvas height of the 2.13" tri-color panel.
pub const CANVAS_HEIGHT: u32 = 122;

/// Placeholder shown for any missing numeric reading.
pub const PLACEHOLDER: &str = "--";
/// Unit glyph drawn after the big temperature digits.
pub const TEMP_UNIT: &str = "°C";

/// Banner clock and date formats.
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Icon preprocessing defaults: near-white cutoff and trim margin.
pub const ICON_WHITE_CUTOFF: u8 = 250;
pub const ICON_PADDING: u32 = 3;
/// Raster size used for SVG icon sources (matches the @2x PNG set).
pub const SVG_RASTER_SIZE: u32 = 100;

/// Condition icon keys of the OpenWeatherMap icon set.
pub const ICON_IDS: [&str; 18] = [
    "01d", "01n", "02d", "02n", "03d", "03n", "04d", "04n",
    "09d", "09n", "10d", "10n", "11d", "11n", "13d", "13n",
    "50d", "50n",
];

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
/// `{icon}` is replaced with an icon key.
pub const OPENWEATHER_ICON_URL: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";
pub const OPENWEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// TrueType candidates tried in order.
pub const DEFAULT_FONT_PATHS: [&str; 2] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
];

pub const DEFAULT_ICON_DIR: &str = "icons";
pub const DEFAULT_OUTPUT_PREFIX: &str = "dash";
