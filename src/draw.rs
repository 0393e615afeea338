/*
 *  draw.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Anchored text, rules and bitmap blits shared by the layout components
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
    image::Image,
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::glyphs::Bitmap;

/// Where the reference point sits relative to the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Left edge, on the baseline
    LeftBaseline,
    /// Horizontal centre, top of the glyph cell
    CenterTop,
    /// Right edge, on the baseline
    RightBaseline,
}

impl Anchor {
    fn alignment(&self) -> (Alignment, Baseline) {
        match self {
            Anchor::LeftBaseline => (Alignment::Left, Baseline::Alphabetic),
            Anchor::CenterTop => (Alignment::Center, Baseline::Top),
            Anchor::RightBaseline => (Alignment::Right, Baseline::Alphabetic),
        }
    }
}

pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    at: Point,
    anchor: Anchor,
    font: &MonoFont,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let (alignment, baseline) = anchor.alignment();
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    Text::with_text_style(text, at, MonoTextStyle::new(font, BinaryColor::On), text_style)
        .draw(target)?;
    Ok(())
}

/// One pixel horizontal rule, both ends inclusive
pub fn draw_hline<D>(target: &mut D, y: i32, x0: i32, x1: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Line::new(Point::new(x0, y), Point::new(x1, y))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)
}

/// One pixel frame around the whole target
pub fn draw_border<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let size = target.size();
    Rectangle::new(Point::zero(), size)
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(BinaryColor::On)
                .stroke_width(1)
                .build(),
        )
        .draw(target)
}

/// Blit a packed bitmap, ink only; paper pixels are drawn as paper
pub fn draw_bitmap<D>(target: &mut D, bitmap: &Bitmap, top_left: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let raw = bitmap.as_raw();
    Image::new(&raw, top_left).draw(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::Canvas;
    use embedded_graphics::mono_font::iso_8859_2::FONT_6X10;

    #[test]
    fn test_right_baseline_ends_at_anchor() {
        let mut canvas = Canvas::new(100, 20);
        draw_text(&mut canvas, "WWW", Point::new(60, 15), Anchor::RightBaseline, &FONT_6X10).unwrap();
        let right_of_anchor = Rectangle::new(Point::new(61, 0), Size::new(39, 20));
        assert_eq!(canvas.ink_in(&right_of_anchor), 0);
        assert!(canvas.ink_count() > 0);
    }

    #[test]
    fn test_center_top_hangs_below_anchor() {
        let mut canvas = Canvas::new(100, 40);
        draw_text(&mut canvas, "WWW", Point::new(50, 20), Anchor::CenterTop, &FONT_6X10).unwrap();
        let above = Rectangle::new(Point::zero(), Size::new(100, 20));
        assert_eq!(canvas.ink_in(&above), 0);
        let left = Rectangle::new(Point::zero(), Size::new(40, 40));
        assert_eq!(canvas.ink_in(&left), 0);
    }

    #[test]
    fn test_border_and_rule() {
        let mut canvas = Canvas::new(10, 10);
        draw_border(&mut canvas).unwrap();
        assert_eq!(canvas.ink_count(), 36);
        draw_hline(&mut canvas, 5, 0, 9).unwrap();
        assert_eq!(canvas.ink_count(), 44);
    }

    #[test]
    fn test_bitmap_blit() {
        let mut bmp = Bitmap::blank(8, 8);
        bmp.set(3, 4, true);
        let mut canvas = Canvas::new(20, 20);
        draw_bitmap(&mut canvas, &bmp, Point::new(10, 10)).unwrap();
        assert!(canvas.is_ink(13, 14));
        assert_eq!(canvas.ink_count(), 1);
    }
}
