/*
 *  display/compositor.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Full color preview from the two planes
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

use image::{Rgb, RgbImage};

use crate::display::color::{Ink, BACKGROUND};
use crate::display::planes::Planes;

/// RGB preview for normal screens, never sent to the panel
pub fn composite_preview(planes: &Planes) -> RgbImage {
    let (w, h) = planes.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let black = planes.black.pixel(x, y).unwrap_or(BACKGROUND);
        let red = planes.red.pixel(x, y).unwrap_or(BACKGROUND);
        Rgb(Ink::resolve(black, red).to_rgb())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::{ACCENT_RGB, BLACK_RGB, INK, PAPER_RGB};

    #[test]
    fn test_overlap_shows_black() {
        let mut planes = Planes::new(3, 1);
        planes.black.set_pixel(0, 0, INK);
        planes.red.set_pixel(0, 0, INK);
        planes.red.set_pixel(1, 0, INK);

        let preview = composite_preview(&planes);
        assert_eq!(preview.get_pixel(0, 0).0, BLACK_RGB);
        assert_eq!(preview.get_pixel(1, 0).0, ACCENT_RGB);
        assert_eq!(preview.get_pixel(2, 0).0, PAPER_RGB);
    }
}
