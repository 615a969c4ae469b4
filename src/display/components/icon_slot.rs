/*
 *  display/components/icon_slot.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Condition icon pasted into the red plane
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

use crate::display::color::{luma_to_plane, BACKGROUND};
use crate::display::layout::LayoutConfig;
use crate::iconprep::IconAsset;

/// Icon slot rectangle for a content block drawn at `top`
pub fn icon_rect(layout: &LayoutConfig, top: i32, content_height: u32) -> Rectangle {
    let side = layout.icon.size;
    let x = layout.width as i32 - layout.padding as i32 - side as i32;
    let y = top + (content_height as i32 - side as i32).div_euclid(2);
    Rectangle::new(Point::new(x, y), Size::new(side, side))
}

/// Paste `icon` into the red plane and carve the same rect out of black
///
/// The asset is resized into a copy; the shared asset is never touched.
/// Returns the slot used, or None when there is no icon to place.
pub fn place_icon<D>(
    black: &mut D,
    red: &mut D,
    layout: &LayoutConfig,
    icon: Option<&IconAsset>,
    top: i32,
    content_height: u32,
) -> Result<Option<Rectangle>, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let Some(icon) = icon else {
        return Ok(None);
    };
    let rect = icon_rect(layout, top, content_height);
    let sized = icon.resized(rect.size.width);

    let colors = sized.image().pixels().map(|p| luma_to_plane(p.0[0]));
    red.fill_contiguous(&rect, colors)?;
    black.fill_solid(&rect, BACKGROUND)?;
    Ok(Some(rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::INK;
    use crate::display::planes::{ink_count, Planes};
    use image::{GrayImage, Luma};

    fn checker(side: u32) -> IconAsset {
        IconAsset::from_image(GrayImage::from_fn(side, side, |x, y| {
            Luma([if (x / 5 + y / 5) % 2 == 0 { 0 } else { 255 }])
        }))
    }

    #[test]
    fn test_icon_rect_centered_on_content() {
        let layout = LayoutConfig::default();
        assert_eq!(icon_rect(&layout, 50, 62), Rectangle::new(Point::new(186, 51), Size::new(60, 60)));
        assert_eq!(icon_rect(&layout, 51, 60), Rectangle::new(Point::new(186, 51), Size::new(60, 60)));
    }

    #[test]
    fn test_place_icon_red_only() {
        let layout = LayoutConfig::default();
        let mut planes = Planes::new(layout.width, layout.height);
        let all = planes.black.bounds();
        let Ok(()) = planes.black.fill_solid(&all, INK);

        let rect = place_icon(&mut planes.black, &mut planes.red, &layout, Some(&checker(30)), 50, 62)
            .unwrap()
            .expect("icon placed");

        assert_eq!(ink_count(&planes.black, rect), 0);
        let red = ink_count(&planes.red, rect);
        assert_eq!(red, 1800);
        // black outside the slot untouched
        assert_eq!(ink_count(&planes.black, planes.black.bounds()), 250 * 122 - 3600);
    }

    #[test]
    fn test_place_icon_overwrites_red_in_slot() {
        let layout = LayoutConfig::default();
        let mut planes = Planes::new(layout.width, layout.height);
        let all = planes.red.bounds();
        let Ok(()) = planes.red.fill_solid(&all, INK);
        let blank = IconAsset::from_image(GrayImage::from_pixel(10, 10, Luma([255])));
        let rect = place_icon(&mut planes.black, &mut planes.red, &layout, Some(&blank), 50, 62)
            .unwrap()
            .expect("icon placed");
        assert_eq!(ink_count(&planes.red, rect), 0);
    }

    #[test]
    fn test_missing_icon_is_skipped() {
        let layout = LayoutConfig::default();
        let mut planes = Planes::new(layout.width, layout.height);
        let Ok(placed) = place_icon(&mut planes.black, &mut planes.red, &layout, None, 50, 62);
        assert_eq!(placed, None);
        assert_eq!(planes, Planes::new(layout.width, layout.height));
    }
}
