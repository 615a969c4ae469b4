/*
 *  display/components/mod.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Dashboard components drawn onto the black and red planes
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

pub mod banner;
pub mod conditions;
pub mod icon_slot;

use embedded_graphics::primitives::Rectangle;

// Re-exports
pub use banner::{draw_banner, BannerPlacement, BannerText};
pub use conditions::{draw_content, ContentPlacement, ContentText};
pub use icon_slot::place_icon;

/// Where a text element ended up and at which size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPlacement {
    pub text: String,

    /// Pixel size the fit search settled on
    pub size: u32,

    /// False when the size is a floor fallback that may overflow
    pub fitted: bool,

    /// Extent box on the canvas
    pub rect: Rectangle,
}
