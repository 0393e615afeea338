/*
 *  display/components/current.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Current conditions band
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

use crate::constants::TEXT_INSET;
use crate::display::layout::{FontSet, FontSize, LayoutGeometry};
use crate::draw::{draw_bitmap, draw_text, Anchor};
use crate::translate::Locale;
use crate::weather::ConditionSnapshot;
use crate::weather_glyph::IconResolver;

/// Gap between the icon and the temperature column
const ICON_GAP: i32 = 12;

/// Large icon left, temperature and feels-like beside it, humidity and
/// precipitation stacked on the right
pub struct CurrentConditions<'a> {
    geometry: &'a LayoutGeometry,
    fonts: &'a FontSet,
    icons: &'a IconResolver,
    locale: Locale,
}

impl<'a> CurrentConditions<'a> {
    pub fn new(geometry: &'a LayoutGeometry, fonts: &'a FontSet, icons: &'a IconResolver, locale: Locale) -> Self {
        Self { geometry, fonts, icons, locale }
    }

    pub fn feels_like_label(&self, current: &ConditionSnapshot) -> String {
        format!("{}: {}", self.locale.text("feels_like"), current.feels_like.with_degree())
    }

    pub fn humidity_label(&self, current: &ConditionSnapshot) -> String {
        format!("{}: {}%", self.locale.text("humidity"), current.humidity)
    }

    pub fn precipitation_label(&self, current: &ConditionSnapshot) -> Option<String> {
        current
            .precipitation_probability
            .map(|p| format!("{}: {}%", self.locale.text("precipitation"), p))
    }

    pub fn render<D>(&self, target: &mut D, current: &ConditionSnapshot) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let band = &self.geometry.current;
        let top = band.top_left.y;
        let height = band.size.height as i32;
        let icon_size = self.geometry.large_icon;

        let icon = self.icons.icon_for(current.condition_code);
        let icon = icon.scaled(icon_size, icon_size);
        let icon_top = top + (height - icon_size as i32) / 2;
        draw_bitmap(target, &icon, Point::new(TEXT_INSET, icon_top))?;

        let text_x = TEXT_INSET + icon_size as i32 + ICON_GAP;
        let temp_y = top + height / 2;
        draw_text(
            target,
            &current.temperature.with_unit(),
            Point::new(text_x, temp_y),
            Anchor::LeftBaseline,
            self.fonts.font(FontSize::Huge),
        )?;

        let small = FontSize::Small;
        let feels_y = temp_y + self.fonts.line_height(small) as i32 + 6;
        draw_text(
            target,
            &self.feels_like_label(current),
            Point::new(text_x, feels_y),
            Anchor::LeftBaseline,
            self.fonts.font(small),
        )?;

        // right portion, starting at three fifths of the width
        let right_x = (self.geometry.width * 3 / 5) as i32;
        let medium = FontSize::Medium;
        draw_text(
            target,
            &self.humidity_label(current),
            Point::new(right_x, temp_y),
            Anchor::LeftBaseline,
            self.fonts.font(medium),
        )?;
        if let Some(label) = self.precipitation_label(current) {
            let y = temp_y + self.fonts.line_height(medium) as i32 + 4;
            draw_text(target, &label, Point::new(right_x, y), Anchor::LeftBaseline, self.fonts.font(medium))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::Canvas;
    use crate::glyphs::LabelIconStore;
    use crate::weather::{Temperature, TemperatureUnit};
    use chrono::NaiveDate;

    fn snapshot(precip: Option<u8>) -> ConditionSnapshot {
        ConditionSnapshot {
            observed_at: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(12, 0, 0).unwrap(),
            temperature: Temperature::new(20.5, TemperatureUnit::Celsius),
            feels_like: Temperature::new(-0.5, TemperatureUnit::Celsius),
            humidity: 65,
            precipitation_probability: precip,
            condition_code: 12,
        }
    }

    #[test]
    fn test_labels() {
        let g = LayoutGeometry::for_canvas(400, 300, &FontSet);
        let fonts = FontSet;
        let icons = IconResolver::new(Box::new(LabelIconStore::new(64)), 64);
        let c = CurrentConditions::new(&g, &fonts, &icons, Locale::En);
        assert_eq!(c.feels_like_label(&snapshot(None)), "Feels like: -1°");
        assert_eq!(c.humidity_label(&snapshot(None)), "Humidity: 65%");
        assert_eq!(c.precipitation_label(&snapshot(None)), None);
        assert_eq!(c.precipitation_label(&snapshot(Some(40))).as_deref(), Some("Precipitation: 40%"));
    }

    #[test]
    fn test_draws_inside_band() {
        let g = LayoutGeometry::for_canvas(400, 300, &FontSet);
        let fonts = FontSet;
        let icons = IconResolver::new(Box::new(LabelIconStore::new(64)), 64);
        let mut canvas = Canvas::new(400, 300);
        CurrentConditions::new(&g, &fonts, &icons, Locale::Pl)
            .render(&mut canvas, &snapshot(Some(80)))
            .unwrap();
        assert!(canvas.ink_count() > 0);
        assert_eq!(canvas.ink_count(), canvas.ink_in(&g.current));
    }
}
