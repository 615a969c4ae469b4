/*
 *  display/layout.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layout constants for the banner + content dashboard template
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

use serde::{Deserialize, Serialize};

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Inclusive font pixel-size range searched from `max` down to `min`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub max: u32,
    pub min: u32,
}

impl SizeRange {
    pub const fn new(max: u32, min: u32) -> Self {
        Self { max, min }
    }
}

/// Layout configuration for the dashboard template
///
/// The constants are tuned for the 250x122 landscape canvas of a
/// 2.13" tri-color panel. Other sizes render, but are not re-tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Outer padding used on every edge
    pub padding: u32,

    pub banner: BannerLayout,

    pub content: ContentLayout,

    pub icon: IconSlotLayout,
}

/// Red banner across the top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerLayout {
    /// Banner height as a fraction of canvas height
    pub height_fraction: f32,

    /// Clamp for the computed banner height
    pub min_height: u32,
    pub max_height: u32,

    /// Share of canvas width the time/date block may use
    pub right_block_fraction: f32,

    /// Gap between the time and date lines
    pub line_gap: u32,

    /// Gap between the location text and the time/date block
    pub block_gap: u32,

    /// Location text never gets less width than this
    pub left_min_width: u32,

    /// Time/date font search
    pub clock_sizes: SizeRange,

    /// Location font search
    pub location_sizes: SizeRange,
}

/// Temperature, metrics and condition text below the banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLayout {
    /// Temperature digits start here and shrink by `temp_step`
    pub temp_start_size: u32,
    pub temp_min_size: u32,
    pub temp_step: u32,

    /// Unit glyph size relative to the digits
    pub unit_ratio: f32,
    pub unit_min_size: u32,

    /// Upper bound for digits + unit width
    pub max_temp_width: u32,

    /// The unit sits this many pixels above its centered position
    pub unit_raise: i32,

    /// Metrics column sits this far right of the temperature block
    pub metrics_gap: u32,

    /// Font size of the two metric lines
    pub metrics_size: u32,

    /// First metric line offset from the content top
    pub metrics_top: u32,

    /// Distance between the two metric line tops
    pub metrics_line_gap: u32,

    /// Condition line offset below the first metric line
    pub condition_top: u32,

    /// Condition font search
    pub condition_sizes: SizeRange,

    /// Space kept between the condition text and the icon slot
    pub icon_gap: u32,

    /// Re-centering passes after the condition font is known
    pub max_refinement_passes: u32,
}

/// Fixed icon slot at the right edge of the content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSlotLayout {
    pub size: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl Default for BannerLayout {
    fn default() -> Self {
        Self {
            height_fraction: 0.33,
            min_height: 34,
            max_height: 46,
            right_block_fraction: 0.40,
            line_gap: 4,
            block_gap: 6,
            left_min_width: 20,
            clock_sizes: SizeRange::new(34, 10),
            location_sizes: SizeRange::new(22, 12),
        }
    }
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self {
            temp_start_size: 46,
            temp_min_size: 30,
            temp_step: 2,
            unit_ratio: 0.5,
            unit_min_size: 12,
            max_temp_width: 125,
            unit_raise: 2,
            metrics_gap: 10,
            metrics_size: 14,
            metrics_top: 8,
            metrics_line_gap: 18,
            condition_top: 40,
            condition_sizes: SizeRange::new(16, 10),
            icon_gap: 4,
            max_refinement_passes: 1,
        }
    }
}

impl Default for IconSlotLayout {
    fn default() -> Self {
        Self { size: 60 }
    }
}

impl LayoutConfig {
    /// Template constants for a canvas of the given size
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: 4,
            banner: BannerLayout::default(),
            content: ContentLayout::default(),
            icon: IconSlotLayout::default(),
        }
    }

    /// Banner height: fraction of the canvas, clamped
    ///
    /// An inverted clamp resolves to `min_height`; the result never
    /// exceeds the canvas.
    pub fn banner_height(&self) -> u32 {
        let raw = (self.height as f32 * self.banner.height_fraction).round() as u32;
        let (min, max) = (self.banner.min_height, self.banner.max_height);
        raw.max(min).min(max.max(min)).min(self.height)
    }

    /// Banner height minus top and bottom padding
    pub fn banner_inner_height(&self) -> u32 {
        self.banner_height().saturating_sub(self.padding * 2)
    }

    /// Width budget of the time/date block
    pub fn right_block_max_width(&self) -> u32 {
        ((self.width as f32 * self.banner.right_block_fraction) as u32)
            .saturating_sub(self.padding * 2)
    }

    /// Vertical space left for the content block
    pub fn content_area_height(&self) -> u32 {
        self.height.saturating_sub(self.banner_height())
    }

    /// Unit glyph pixel size for a digit size
    pub fn unit_size_for(&self, digit_size: u32) -> u32 {
        ((digit_size as f32 * self.content.unit_ratio) as u32).max(self.content.unit_min_size)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("canvas width/height must be > 0".into());
        }
        if self.banner.min_height > self.banner.max_height {
            return Err("banner min_height must not exceed max_height".into());
        }
        for (name, range) in [
            ("clock_sizes", self.banner.clock_sizes),
            ("location_sizes", self.banner.location_sizes),
            ("condition_sizes", self.content.condition_sizes),
        ] {
            if range.min == 0 || range.min > range.max {
                return Err(format!("{name} must satisfy 0 < min <= max"));
            }
        }
        if self.content.temp_step == 0 || self.content.temp_min_size == 0 {
            return Err("temperature step and minimum size must be > 0".into());
        }
        if self.icon.size == 0 {
            return Err("icon slot size must be > 0".into());
        }
        Ok(())
    }
}
