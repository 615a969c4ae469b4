/*
 *  display/color.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Two-plane ink model and the preview palette
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

/// Plane pixel meaning ink
pub const INK: BinaryColor = BinaryColor::On;

/// Plane pixel meaning background
pub const BACKGROUND: BinaryColor = BinaryColor::Off;

/// What a composited pixel shows on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Unprinted paper
    Paper,

    /// Black pigment
    Black,

    /// Accent (red) pigment
    Accent,
}

impl Ink {
    /// Resolve a pixel from both planes; black wins when both claim it
    pub fn resolve(black: BinaryColor, red: BinaryColor) -> Self {
        if black.is_on() {
            Ink::Black
        } else if red.is_on() {
            Ink::Accent
        } else {
            Ink::Paper
        }
    }

    /// Preview RGB for this ink
    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            Ink::Paper => PAPER_RGB,
            Ink::Black => BLACK_RGB,
            Ink::Accent => ACCENT_RGB,
        }
    }
}

pub const PAPER_RGB: [u8; 3] = [255, 255, 255];
pub const BLACK_RGB: [u8; 3] = [0, 0, 0];
pub const ACCENT_RGB: [u8; 3] = [200, 0, 0];

/// Grayscale value used when a plane is written as an image
pub fn plane_luma(color: BinaryColor) -> u8 {
    if color.is_on() { 0 } else { 255 }
}

/// Plane color for a grayscale sample read back from an image
pub fn luma_to_plane(luma: u8) -> BinaryColor {
    if luma < 128 { INK } else { BACKGROUND }
}
