/*
 *  display/components/forecast.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Multi-day forecast strip
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

use chrono::{Datelike, NaiveDate};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::constants::{FORECAST_DISPLAY_CAP, MARGIN};
use crate::display::layout::{FontSet, FontSize, LayoutGeometry};
use crate::draw::{draw_bitmap, draw_hline, draw_text, Anchor};
use crate::translate::Locale;
use crate::weather::DailyForecastEntry;
use crate::weather_glyph::IconResolver;

/// Pick the entries that get a column: dated today or later, ascending,
/// at most min(horizon, display cap).
pub fn select_days(today: NaiveDate, entries: &[DailyForecastEntry], horizon: usize) -> Vec<&DailyForecastEntry> {
    let mut days: Vec<&DailyForecastEntry> = entries.iter().filter(|e| e.date >= today).collect();
    days.sort_by_key(|e| e.date);
    days.truncate(horizon.min(FORECAST_DISPLAY_CAP));
    days
}

/// "today", "tomorrow" or the abbreviated weekday
pub fn day_label(locale: Locale, today: NaiveDate, date: NaiveDate) -> &'static str {
    if date == today {
        locale.text("today")
    } else if today.succ_opt() == Some(date) {
        locale.text("tomorrow")
    } else {
        locale.weekday(date.weekday())
    }
}

/// One column of the strip, resolved before drawing
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastColumn<'e> {
    pub area: Rectangle,
    pub label: &'static str,
    pub entry: &'e DailyForecastEntry,
}

impl ForecastColumn<'_> {
    pub fn center_x(&self) -> i32 {
        self.area.top_left.x + self.area.size.width as i32 / 2
    }
}

pub struct ForecastStrip<'a> {
    geometry: &'a LayoutGeometry,
    fonts: &'a FontSet,
    icons: &'a IconResolver,
    locale: Locale,
    horizon: usize,
}

impl<'a> ForecastStrip<'a> {
    pub fn new(
        geometry: &'a LayoutGeometry,
        fonts: &'a FontSet,
        icons: &'a IconResolver,
        locale: Locale,
        horizon: usize,
    ) -> Self {
        Self { geometry, fonts, icons, locale, horizon }
    }

    /// Column plan for `entries`; empty when nothing is dated today or later
    pub fn columns<'e>(&self, today: NaiveDate, entries: &'e [DailyForecastEntry]) -> Vec<ForecastColumn<'e>> {
        let days = select_days(today, entries, self.horizon);
        self.geometry
            .forecast_columns(days.len())
            .into_iter()
            .zip(days)
            .map(|(area, entry)| ForecastColumn {
                area,
                label: day_label(self.locale, today, entry.date),
                entry,
            })
            .collect()
    }

    /// Rule plus columns; draws nothing for an empty plan
    pub fn render<D>(&self, target: &mut D, today: NaiveDate, entries: &[DailyForecastEntry]) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let columns = self.columns(today, entries);
        if columns.is_empty() {
            return Ok(());
        }
        draw_hline(target, self.geometry.forecast_rule_y(), 0, self.geometry.width as i32 - 1)?;

        let icon_size = self.geometry.small_icon;
        let label_h = self.fonts.line_height(FontSize::Medium) as i32;
        let small_h = self.fonts.line_height(FontSize::Small) as i32;
        let small = self.fonts.font(FontSize::Small);

        for col in &columns {
            let cx = col.center_x();
            let mut y = col.area.top_left.y + MARGIN as i32 + 2;

            draw_text(target, col.label, Point::new(cx, y), Anchor::CenterTop, self.fonts.font(FontSize::Medium))?;
            y += label_h + 3;

            let icon = self.icons.icon_for(col.entry.condition_code).scaled(icon_size, icon_size);
            draw_bitmap(target, &icon, Point::new(cx - icon_size as i32 / 2, y))?;
            y += icon_size as i32 + 3;

            if let Some(range) = col.entry.min_max_label() {
                draw_text(target, &range, Point::new(cx, y), Anchor::CenterTop, small)?;
            }
            // keep the row even when the range is skipped so columns line up
            y += small_h + 2;

            if let Some(p) = col.entry.precipitation_probability {
                draw_text(target, &format!("{}%", p), Point::new(cx, y), Anchor::CenterTop, small)?;
            }
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

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn entry(d: u32) -> DailyForecastEntry {
        DailyForecastEntry {
            date: day(d),
            min: Some(Temperature::new(2.0, TemperatureUnit::Celsius)),
            max: Some(Temperature::new(9.6, TemperatureUnit::Celsius)),
            condition_code: 7,
            precipitation_probability: Some(30),
        }
    }

    #[test]
    fn test_select_days_filters_sorts_and_caps() {
        let entries: Vec<_> = [21, 17, 18, 24, 19, 20, 22, 23].into_iter().map(entry).collect();
        let picked = select_days(day(18), &entries, 5);
        let dates: Vec<_> = picked.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(18), day(19), day(20), day(21), day(22)]);

        assert_eq!(select_days(day(18), &entries, 3).len(), 3);
        assert_eq!(select_days(day(18), &entries, 9).len(), 5);
        assert!(select_days(day(25), &entries, 5).is_empty());
    }

    #[test]
    fn test_day_labels() {
        // 2026-10-18 is a Sunday
        assert_eq!(day_label(Locale::En, day(18), day(18)), "Today");
        assert_eq!(day_label(Locale::Pl, day(18), day(19)), "Jutro");
        assert_eq!(day_label(Locale::En, day(18), day(20)), "Tue");
        assert_eq!(day_label(Locale::Pl, day(18), day(21)), "Śr");
    }

    #[test]
    fn test_empty_forecast_draws_nothing() {
        let g = LayoutGeometry::for_canvas(400, 300, &FontSet);
        let fonts = FontSet;
        let icons = IconResolver::new(Box::new(LabelIconStore::new(64)), 64);
        let mut canvas = Canvas::new(400, 300);
        ForecastStrip::new(&g, &fonts, &icons, Locale::En, 5)
            .render(&mut canvas, day(18), &[entry(10)])
            .unwrap();
        assert_eq!(canvas.ink_count(), 0);
    }

    #[test]
    fn test_columns_stay_in_strip() {
        let g = LayoutGeometry::for_canvas(400, 300, &FontSet);
        let fonts = FontSet;
        let icons = IconResolver::new(Box::new(LabelIconStore::new(64)), 64);
        let entries: Vec<_> = (18..25).map(entry).collect();
        let mut canvas = Canvas::new(400, 300);
        let strip = ForecastStrip::new(&g, &fonts, &icons, Locale::En, 5);
        strip.render(&mut canvas, day(18), &entries).unwrap();

        assert_eq!(canvas.ink_count(), canvas.ink_in(&g.forecast));
        for col in strip.columns(day(18), &entries) {
            assert!(canvas.ink_in(&col.area) > 0);
        }
    }
}
