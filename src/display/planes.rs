/*
 *  display/planes.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Black and red monochrome planes, packing and image conversion
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

use std::path::Path;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::{GrayImage, Luma};

use crate::display::color::{luma_to_plane, plane_luma, BACKGROUND, INK};
use crate::display::error::DisplayError;
use crate::vframebuf::VarFrameBuf;

/// One monochrome plane, `BinaryColor::On` is ink
pub type Plane = VarFrameBuf<BinaryColor>;

/// The pair of planes that make up one two-color frame
#[derive(Debug, Clone, PartialEq)]
pub struct Planes {
    pub black: Plane,
    pub red: Plane,
}

impl Planes {
    /// Fresh planes, both background
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            black: Plane::new(width, height, BACKGROUND),
            red: Plane::new(width, height, BACKGROUND),
        }
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.black.width() as u32, self.black.height() as u32)
    }

    pub fn rotated_180(&self) -> Self {
        Self {
            black: self.black.rotated_180(),
            red: self.red.rotated_180(),
        }
    }

    pub fn resized(&self, width: u32, height: u32) -> Self {
        Self {
            black: self.black.resized(width, height),
            red: self.red.resized(width, height),
        }
    }

    /// Build planes from a pair of black-on-white images
    pub fn from_images(black: &GrayImage, red: &GrayImage) -> Result<Self, DisplayError> {
        if black.dimensions() != red.dimensions() {
            return Err(DisplayError::PlaneSizeMismatch {
                black: black.dimensions(),
                red: red.dimensions(),
            });
        }
        Ok(Self {
            black: image_to_plane(black),
            red: image_to_plane(red),
        })
    }

    /// Load planes previously written by `save_pngs`
    pub fn load_pngs(black_path: &Path, red_path: &Path) -> Result<Self, DisplayError> {
        let black = image::open(black_path)?.to_luma8();
        let red = image::open(red_path)?.to_luma8();
        Self::from_images(&black, &red)
    }

    /// Write both planes as 1-bit looking grayscale PNGs
    pub fn save_pngs(&self, black_path: &Path, red_path: &Path) -> Result<(), DisplayError> {
        plane_to_image(&self.black).save(black_path)?;
        plane_to_image(&self.red).save(red_path)?;
        Ok(())
    }
}

/// Plane as a grayscale image, ink black on white
pub fn plane_to_image(plane: &Plane) -> GrayImage {
    let (w, h) = (plane.width() as u32, plane.height() as u32);
    GrayImage::from_fn(w, h, |x, y| {
        Luma([plane_luma(plane.pixel(x, y).unwrap_or(BACKGROUND))])
    })
}

/// Threshold a grayscale image into a plane
pub fn image_to_plane(img: &GrayImage) -> Plane {
    let mut plane = Plane::new(img.width(), img.height(), BACKGROUND);
    for (x, y, p) in img.enumerate_pixels() {
        plane.set_pixel(x, y, luma_to_plane(p.0[0]));
    }
    plane
}

/// Count ink pixels inside a region (clipped to the plane)
pub fn ink_count(plane: &Plane, region: Rectangle) -> usize {
    region
        .intersection(&plane.bounding_box())
        .points()
        .filter(|p| plane.pixel(p.x as u32, p.y as u32).is_some_and(|c| c.is_on()))
        .count()
}

/// Convert a plane to the packed panel format
///
/// Row-major, 8 pixels per byte MSB first, rows padded to whole bytes.
/// A set bit is background (white) and a clear bit is ink.
pub fn to_packed_bytes(plane: &Plane) -> Vec<u8> {
    let (w, h) = (plane.width(), plane.height());
    let stride = w.div_ceil(8);
    let mut bytes = vec![0xFFu8; stride * h];

    for (i, &pixel) in plane.as_slice().iter().enumerate() {
        if pixel.is_on() {
            let (x, y) = (i % w, i / w);
            let byte_idx = y * stride + x / 8;
            bytes[byte_idx] &= !(0x80 >> (x % 8));
        }
    }

    bytes
}

/// Inverse of `to_packed_bytes`
pub fn from_packed_bytes(bytes: &[u8], width: u32, height: u32) -> Result<Plane, DisplayError> {
    let expected = packed_len(width, height);
    if bytes.len() != expected {
        return Err(DisplayError::BufferSizeMismatch { expected, actual: bytes.len() });
    }
    let stride = (width as usize).div_ceil(8);
    let mut plane = Plane::new(width, height, BACKGROUND);
    for y in 0..height {
        for x in 0..width {
            let byte = bytes[y as usize * stride + x as usize / 8];
            if byte & (0x80 >> (x % 8)) == 0 {
                plane.set_pixel(x, y, INK);
            }
        }
    }
    Ok(plane)
}

/// Expected length of `to_packed_bytes` output for a size
pub fn packed_len(width: u32, height: u32) -> usize {
    (width as usize).div_ceil(8) * height as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_bytes_layout() {
        let mut plane = Plane::new(10, 2, BACKGROUND);
        plane.set_pixel(0, 0, INK);
        plane.set_pixel(9, 1, INK);
        let bytes = to_packed_bytes(&plane);
        assert_eq!(bytes.len(), packed_len(10, 2));
        assert_eq!(bytes, vec![0x7F, 0xFF, 0xFF, 0xBF]);
    }

    #[test]
    fn test_unpack_inverts_pack() {
        let mut plane = Plane::new(10, 2, BACKGROUND);
        plane.set_pixel(3, 0, INK);
        plane.set_pixel(8, 1, INK);
        assert_eq!(from_packed_bytes(&to_packed_bytes(&plane), 10, 2).unwrap(), plane);
        assert!(from_packed_bytes(&[0xFF; 3], 10, 2).is_err());
    }

    #[test]
    fn test_image_round_trip() {
        let mut plane = Plane::new(4, 3, BACKGROUND);
        plane.set_pixel(1, 2, INK);
        assert_eq!(image_to_plane(&plane_to_image(&plane)), plane);
    }

    #[test]
    fn test_mismatched_images_rejected() {
        let a = GrayImage::new(4, 4);
        let b = GrayImage::new(4, 5);
        assert!(matches!(
            Planes::from_images(&a, &b),
            Err(DisplayError::PlaneSizeMismatch { .. })
        ));
    }
}
