/*
 *  display/layout.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Band geometry and font metrics for the weather canvas
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

use embedded_graphics::mono_font::{
    iso_8859_2::{FONT_10X20, FONT_6X10, FONT_7X14, FONT_9X18_BOLD},
    MonoFont,
};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::constants::{
    CURRENT_SHARE, FORECAST_SHARE, HEADER_FRACTION, LARGE_ICON_FRACTION, MARGIN, SMALL_ICON_FRACTION,
};

/// Font size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// 6x10, footer and forecast details
    Small,

    /// 7x14, header date, day labels, humidity
    Medium,

    /// 9x18 bold, title
    Large,

    /// 10x20, primary temperature
    Huge,
}

/// Font metrics provider.
///
/// Latin-2 glyph sets so Polish labels and the degree sign render.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontSet;

impl FontSet {
    pub fn font(&self, size: FontSize) -> &'static MonoFont<'static> {
        match size {
            FontSize::Small => &FONT_6X10,
            FontSize::Medium => &FONT_7X14,
            FontSize::Large => &FONT_9X18_BOLD,
            FontSize::Huge => &FONT_10X20,
        }
    }

    /// Advance width of `text` in pixels
    pub fn text_width(&self, size: FontSize, text: &str) -> u32 {
        let font = self.font(size);
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        n * font.character_size.width + (n - 1) * font.character_spacing
    }

    pub fn line_height(&self, size: FontSize) -> u32 {
        self.font(size).character_size.height
    }
}

/// Resolved band rectangles for one canvas size.
///
/// Header takes a fixed fraction of the height, the footer one small text
/// line plus margins, and the body in between splits current:forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGeometry {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    pub header: Rectangle,
    pub current: Rectangle,
    pub forecast: Rectangle,
    pub footer: Rectangle,

    /// Edge length of the current conditions icon
    pub large_icon: u32,

    /// Edge length of the forecast column icons
    pub small_icon: u32,
}

impl LayoutGeometry {
    pub fn for_canvas(width: u32, height: u32, fonts: &FontSet) -> Self {
        let header_h = (height as f32 * HEADER_FRACTION).round() as u32;
        let footer_h = fonts.line_height(FontSize::Small) + 2 * MARGIN;
        let body_h = height.saturating_sub(header_h + footer_h);
        let current_h = body_h * CURRENT_SHARE / (CURRENT_SHARE + FORECAST_SHARE);
        let forecast_h = body_h - current_h;

        let band = |y: u32, h: u32| Rectangle::new(Point::new(0, y as i32), Size::new(width, h));

        Self {
            width,
            height,
            header: band(0, header_h),
            current: band(header_h, current_h),
            forecast: band(header_h + current_h, forecast_h),
            footer: band(header_h + current_h + forecast_h, footer_h),
            large_icon: (current_h as f32 * LARGE_ICON_FRACTION) as u32,
            small_icon: (forecast_h as f32 * SMALL_ICON_FRACTION) as u32,
        }
    }

    /// Row the header separator is drawn on
    pub fn header_rule_y(&self) -> i32 {
        self.header.top_left.y + self.header.size.height as i32
    }

    /// Row the forecast separator is drawn on
    pub fn forecast_rule_y(&self) -> i32 {
        self.forecast.top_left.y
    }

    /// Equal width columns across the forecast strip, inside the margins
    pub fn forecast_columns(&self, count: usize) -> Vec<Rectangle> {
        if count == 0 {
            return Vec::new();
        }
        let inner = self.width.saturating_sub(2 * MARGIN);
        let col_w = inner / count as u32;
        (0..count)
            .map(|i| {
                Rectangle::new(
                    Point::new((MARGIN + col_w * i as u32) as i32, self.forecast.top_left.y),
                    Size::new(col_w, self.forecast.size.height),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};

    #[test]
    fn test_bands_tile_the_canvas() {
        let g = LayoutGeometry::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, &FontSet);
        assert_eq!(g.header.size.height, 48);
        assert_eq!(g.current.top_left.y, 48);
        assert_eq!(g.forecast.top_left.y, g.current.top_left.y + g.current.size.height as i32);
        assert_eq!(g.footer.top_left.y, g.forecast.top_left.y + g.forecast.size.height as i32);
        assert_eq!(g.footer.top_left.y as u32 + g.footer.size.height, CANVAS_HEIGHT);
        assert!(g.current.size.height > g.forecast.size.height);
    }

    #[test]
    fn test_icon_sizes_follow_bands() {
        let g = LayoutGeometry::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, &FontSet);
        assert_eq!(g.large_icon, 100);
        assert_eq!(g.small_icon, 27);
    }

    #[test]
    fn test_forecast_columns_equal_width() {
        let g = LayoutGeometry::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, &FontSet);
        let cols = g.forecast_columns(5);
        assert_eq!(cols.len(), 5);
        assert!(cols.iter().all(|c| c.size.width == cols[0].size.width));
        assert!(cols.windows(2).all(|w| w[0].top_left.x < w[1].top_left.x));
        assert!(g.forecast_columns(0).is_empty());
    }

    #[test]
    fn test_text_width() {
        let fonts = FontSet;
        assert_eq!(fonts.text_width(FontSize::Small, ""), 0);
        assert_eq!(fonts.text_width(FontSize::Small, "abc"), 18);
        // multi byte characters count once
        assert_eq!(fonts.text_width(FontSize::Medium, "Dziś"), 28);
    }
}
