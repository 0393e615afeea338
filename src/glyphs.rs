/*
 *  glyphs.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Packed 1-bit bitmaps and the generated label icon set
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

use embedded_graphics::{
    image::ImageRaw,
    mono_font::{iso_8859_2::FONT_10X20, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::display::framebuffer::Canvas;
use crate::weather_glyph::{IconError, IconId, IconStore};

/// Bytes per row for a 1-bit image, rows padded to a whole byte
#[inline]
pub fn row_stride(width: u32) -> usize {
    (width as usize + 7) / 8
}

/// Row-major 1-bit image, MSB first, set bit = ink.
///
/// Same layout `ImageRaw<BinaryColor>` expects, so a bitmap can be blitted
/// without conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// All paper, used as the placeholder for missing icon assets
    pub fn blank(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0u8; row_stride(width) * height as usize] }
    }

    /// Wrap already packed rows; None when the length does not match
    pub fn from_packed(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != row_stride(width) * height as usize {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Pack a canvas (on = ink)
    pub fn from_canvas(canvas: &Canvas) -> Self {
        let (w, h) = canvas.dimensions();
        let mut bmp = Bitmap::blank(w, h);
        for y in 0..h {
            for x in 0..w {
                if canvas.is_ink(x, y) {
                    bmp.set(x, y, true);
                }
            }
        }
        bmp
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn as_bytes(&self) -> &[u8] { &self.data }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * row_stride(self.width) + (x as usize / 8);
        self.data[idx] & (0x80 >> (x % 8)) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * row_stride(self.width) + (x as usize / 8);
        let mask = 0x80 >> (x % 8);
        if on {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
    }

    pub fn ink_count(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .count()
    }

    /// Nearest-neighbour resample, deterministic for identical input
    pub fn scaled(&self, width: u32, height: u32) -> Bitmap {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Bitmap::blank(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                if self.get(sx, sy) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }

    /// View for `Image::new(&raw, point)`
    pub fn as_raw(&self) -> ImageRaw<'_, BinaryColor> {
        ImageRaw::<BinaryColor>::new(&self.data, self.width)
    }
}

/// Icons generated in memory: a framed square with a short centred label.
///
/// Used when no icon directory is configured, so the panel always has
/// something to show for every condition.
#[derive(Debug, Clone)]
pub struct LabelIconStore {
    size: u32,
}

impl LabelIconStore {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    fn label(id: IconId) -> &'static str {
        match id {
            IconId::Sunny => "S",
            IconId::PartlySunny => "PS",
            IconId::PartlyCloudy => "PC",
            IconId::Cloudy => "C",
            IconId::Rain => "R",
            IconId::Thunderstorm => "T",
            IconId::Snow => "SN",
            IconId::Fog => "F",
            IconId::Windy => "W",
            IconId::Ice => "I",
            IconId::Sleet => "SL",
            IconId::Hot => "H",
            IconId::Cold => "CL",
            IconId::Clear => "CL",
            IconId::PartlyClear => "PCL",
            IconId::Unknown => "?",
        }
    }
}

impl IconStore for LabelIconStore {
    fn get(&self, id: IconId) -> Result<Bitmap, IconError> {
        let mut canvas = Canvas::new(self.size, self.size);
        let frame = Rectangle::new(Point::new(2, 2), Size::new(self.size.saturating_sub(4), self.size.saturating_sub(4)));
        // Canvas drawing cannot fail, the error type is Infallible
        let Ok(()) = frame
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
            .draw(&mut canvas);

        let centre = Point::new(self.size as i32 / 2, self.size as i32 / 2);
        let style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let Ok(_) = Text::with_text_style(Self::label(id), centre, MonoTextStyle::new(&FONT_10X20, BinaryColor::On), style)
            .draw(&mut canvas);

        Ok(Bitmap::from_canvas(&canvas))
    }
}
