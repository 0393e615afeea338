/*
 *  display/framebuffer.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime sized 1-bit canvas the layout engine draws into
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
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::error::DisplayError;

/// Monochrome framebuffer, origin top-left.
///
/// `BinaryColor::On` is ink (black on the panel), `Off` is paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl Canvas {
    /// Blank (all paper) canvas
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![BinaryColor::Off; w * h], w, h }
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.w as u32, self.h as u32)
    }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[BinaryColor] { &self.buf }

    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y) == Some(BinaryColor::On)
    }

    /// Count number of inked pixels
    pub fn ink_count(&self) -> usize {
        self.buf.iter().filter(|&&p| p == BinaryColor::On).count()
    }

    /// Inked pixels inside `area`, clipped to the canvas
    pub fn ink_in(&self, area: &Rectangle) -> usize {
        area.points()
            .filter_map(|p| self.idx(p))
            .filter(|&i| self.buf[i] == BinaryColor::On)
            .count()
    }

    /// Pack for a panel: row-major, 8 pixels per byte, MSB first, rows padded to a byte
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let stride = (self.w + 7) / 8;
        let mut bytes = vec![0u8; stride * self.h];
        for (i, &pixel) in self.buf.iter().enumerate() {
            if pixel.is_on() {
                let (x, y) = (i % self.w, i / self.w);
                bytes[y * stride + x / 8] |= 0x80 >> (x % 8);
            }
        }
        bytes
    }

    /// Clockwise rotation by 0, 90, 180 or 270 degrees
    pub fn rotated(&self, degrees: u16) -> Result<Canvas, DisplayError> {
        let (w, h) = (self.w, self.h);
        let mut out = match degrees {
            0 => return Ok(self.clone()),
            90 | 270 => Canvas::new(h as u32, w as u32),
            180 => Canvas::new(w as u32, h as u32),
            other => return Err(DisplayError::InvalidRotation(other)),
        };
        for y in 0..h {
            for x in 0..w {
                let (nx, ny) = match degrees {
                    90 => (h - 1 - y, x),
                    180 => (w - 1 - x, h - 1 - y),
                    _ => (y, w - 1 - x),
                };
                out.buf[ny * out.w + nx] = self.buf[y * w + x];
            }
        }
        Ok(out)
    }

    /// Swap ink and paper, for panels with inverted polarity
    pub fn inverted(mut self) -> Canvas {
        self.buf.iter_mut().for_each(|p| *p = p.invert());
        self
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

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
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
        self.buf.fill(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // fast path only when the whole area is on the canvas, colours map 1:1 to rows
        let fits = area.top_left.x >= 0
            && area.top_left.y >= 0
            && area.top_left.x as usize + area.size.width as usize <= self.w
            && area.top_left.y as usize + area.size.height as usize <= self.h;
        if !fits {
            return self.draw_iter(area.points().zip(colors).map(|(p, c)| Pixel(p, c)));
        }

        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        let w = area.size.width as usize;
        let mut it = colors.into_iter();
        for row in 0..area.size.height as usize {
            let base = (y0 + row) * self.w + x0;
            for slot in &mut self.buf[base..base + w] {
                match it.next() {
                    Some(c) => *slot = c,
                    None => return Ok(()),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_new_canvas_is_paper() {
        let canvas = Canvas::new(16, 8);
        assert_eq!(canvas.dimensions(), (16, 8));
        assert_eq!(canvas.ink_count(), 0);
        assert_eq!(canvas.pixel(16, 0), None);
    }

    #[test]
    fn test_packed_bytes_msb_first() {
        let mut canvas = Canvas::new(10, 2);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut canvas).unwrap();
        Pixel(Point::new(9, 1), BinaryColor::On).draw(&mut canvas).unwrap();
        assert_eq!(canvas.to_packed_bytes(), vec![0x80, 0x00, 0x00, 0x40]);
    }

    #[test]
    fn test_clipped_fill_keeps_colour_order() {
        let mut canvas = Canvas::new(4, 4);
        let area = Rectangle::new(Point::new(-1, 0), Size::new(2, 1));
        canvas
            .fill_contiguous(&area, [BinaryColor::On, BinaryColor::Off])
            .unwrap();
        // (-1,0) is dropped, (0,0) takes the second colour
        assert_eq!(canvas.ink_count(), 0);

        canvas
            .fill_contiguous(&area, [BinaryColor::Off, BinaryColor::On])
            .unwrap();
        assert!(canvas.is_ink(0, 0));
    }

    #[test]
    fn test_rotation() {
        let mut canvas = Canvas::new(4, 2);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut canvas).unwrap();

        let r90 = canvas.rotated(90).unwrap();
        assert_eq!(r90.dimensions(), (2, 4));
        assert!(r90.is_ink(1, 0));

        let r180 = canvas.rotated(180).unwrap();
        assert!(r180.is_ink(3, 1));

        let r270 = canvas.rotated(270).unwrap();
        assert!(r270.is_ink(0, 3));

        assert!(matches!(canvas.rotated(45), Err(DisplayError::InvalidRotation(45))));
        assert_eq!(canvas.rotated(0).unwrap(), canvas);
    }

    #[test]
    fn test_ink_in_region() {
        let mut canvas = Canvas::new(20, 20);
        Line::new(Point::new(0, 5), Point::new(19, 5))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();
        assert_eq!(canvas.ink_in(&Rectangle::new(Point::new(0, 5), Size::new(20, 1))), 20);
        assert_eq!(canvas.ink_in(&Rectangle::new(Point::new(0, 6), Size::new(20, 14))), 0);
        assert_eq!(canvas.clone().inverted().ink_count(), 380);
    }
}
