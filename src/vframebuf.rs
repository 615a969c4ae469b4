/*
 *  vframebuf.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime-sized framebuffer used for both color planes
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A runtime-sized framebuffer for embedded-graphics.
#[derive(Debug, Clone, PartialEq)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor + Clone> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access, row-major
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Clear to a color
    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Pixel at (x,y), None outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<C> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: C) {
        if let Some(i) = self.idx(Point::new(x as i32, y as i32)) {
            self.buf[i] = color;
        }
    }

    /// Area covered by the buffer
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size())
    }

    /// Copy rotated by 180 degrees
    pub fn rotated_180(&self) -> Self {
        let mut buf = self.buf.clone();
        buf.reverse();
        Self { buf, w: self.w, h: self.h }
    }

    /// Nearest-neighbour resample to a new size
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let (nw, nh) = (width as usize, height as usize);
        if (nw == self.w && nh == self.h) || self.buf.is_empty() {
            return self.clone();
        }
        let mut buf = Vec::with_capacity(nw * nh);
        for y in 0..nh {
            let sy = y * self.h / nh;
            for x in 0..nw {
                let sx = x * self.w / nw;
                buf.push(self.buf[sy * self.w + sx]);
            }
        }
        Self { buf, w: nw, h: nh }
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor + Clone> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clipped row fills, the layout clears large regions often
        let clipped = area.intersection(&self.bounds());
        if clipped.size.width == 0 || clipped.size.height == 0 {
            return Ok(());
        }
        let x0 = clipped.top_left.x as usize;
        let y0 = clipped.top_left.y as usize;
        let w = clipped.size.width as usize;
        for row in y0..y0 + clipped.size.height as usize {
            let base = row * self.w + x0;
            self.buf[base..base + w].fill(color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // colors arrive for the unclipped area, drop the ones falling outside
        let pixels = area
            .points()
            .zip(colors)
            .map(|(p, c)| Pixel(p, c));
        self.draw_iter(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;

    #[test]
    fn test_fill_solid_clips_to_buffer() {
        let mut fb = VarFrameBuf::new(8, 4, BinaryColor::Off);
        fb.fill_solid(&Rectangle::new(Point::new(6, -2), Size::new(10, 4)), BinaryColor::On)
            .unwrap();
        assert_eq!(fb.pixel(6, 0), Some(BinaryColor::On));
        assert_eq!(fb.pixel(7, 1), Some(BinaryColor::On));
        assert_eq!(fb.pixel(5, 0), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(6, 2), Some(BinaryColor::Off));
        // nothing wrapped into the next row
        assert_eq!(fb.pixel(0, 1), Some(BinaryColor::Off));
    }

    #[test]
    fn test_rotated_180_moves_corner() {
        let mut fb = VarFrameBuf::new(5, 3, BinaryColor::Off);
        fb.set_pixel(0, 0, BinaryColor::On);
        let r = fb.rotated_180();
        assert_eq!(r.pixel(4, 2), Some(BinaryColor::On));
        assert_eq!(r.pixel(0, 0), Some(BinaryColor::Off));
    }

    #[test]
    fn test_resized_nearest() {
        let mut fb = VarFrameBuf::new(2, 2, BinaryColor::Off);
        fb.set_pixel(1, 1, BinaryColor::On);
        let r = fb.resized(4, 4);
        assert_eq!((r.width(), r.height()), (4, 4));
        assert_eq!(r.pixel(3, 3), Some(BinaryColor::On));
        assert_eq!(r.pixel(2, 2), Some(BinaryColor::On));
        assert_eq!(r.pixel(1, 1), Some(BinaryColor::Off));
    }

    #[test]
    fn test_out_of_bounds_pixel_ignored() {
        let mut fb = VarFrameBuf::new(3, 3, BinaryColor::Off);
        fb.set_pixel(9, 9, BinaryColor::On);
        assert!(fb.as_slice().iter().all(|c| *c == BinaryColor::Off));
        assert_eq!(fb.pixel(3, 0), None);
    }
}
