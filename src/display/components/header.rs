/*
 *  display/components/header.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Header (title, clock, rule) and footer (updated stamp, pollen)
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

use chrono::NaiveDateTime;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::constants::{MARGIN, TEXT_INSET, TIMESTAMP_FORMAT};
use crate::display::layout::{FontSet, FontSize, LayoutGeometry};
use crate::draw::{draw_hline, draw_text, Anchor};
use crate::translate::Locale;
use crate::weather::PollenReading;

/// Title left, date and time right, full width rule underneath
pub struct HeaderBar<'a> {
    geometry: &'a LayoutGeometry,
    fonts: &'a FontSet,
    locale: Locale,
}

impl<'a> HeaderBar<'a> {
    pub fn new(geometry: &'a LayoutGeometry, fonts: &'a FontSet, locale: Locale) -> Self {
        Self { geometry, fonts, locale }
    }

    /// Shared baseline for the title and the clock
    fn baseline(&self) -> i32 {
        let band = &self.geometry.header;
        band.top_left.y + band.size.height as i32 / 2 + self.fonts.line_height(FontSize::Large) as i32 / 3
    }

    pub fn render<D>(&self, target: &mut D, now: NaiveDateTime) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let y = self.baseline();
        draw_text(
            target,
            self.locale.text("weather_forecast"),
            Point::new(TEXT_INSET, y),
            Anchor::LeftBaseline,
            self.fonts.font(FontSize::Large),
        )?;
        draw_text(
            target,
            &now.format(TIMESTAMP_FORMAT).to_string(),
            Point::new(self.geometry.width as i32 - TEXT_INSET, y),
            Anchor::RightBaseline,
            self.fonts.font(FontSize::Medium),
        )?;
        draw_hline(target, self.geometry.header_rule_y(), 0, self.geometry.width as i32 - 1)
    }
}

/// "updated: <stamp>" bottom left, "pollen: <category>" bottom right
pub struct FooterBar<'a> {
    geometry: &'a LayoutGeometry,
    fonts: &'a FontSet,
    locale: Locale,
}

impl<'a> FooterBar<'a> {
    pub fn new(geometry: &'a LayoutGeometry, fonts: &'a FontSet, locale: Locale) -> Self {
        Self { geometry, fonts, locale }
    }

    fn baseline(&self) -> i32 {
        // descender room below the baseline, the border sits under that
        self.geometry.height as i32 - MARGIN as i32 - 2
    }

    pub fn updated_label(&self, stamp: NaiveDateTime) -> String {
        format!("{}: {}", self.locale.text("updated"), stamp.format(TIMESTAMP_FORMAT))
    }

    pub fn pollen_label(&self, reading: &PollenReading) -> String {
        format!("{}: {}", self.locale.text("pollen"), self.locale.text(reading.category.key()))
    }

    pub fn render<D>(&self, target: &mut D, stamp: NaiveDateTime, pollen: Option<&PollenReading>) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let y = self.baseline();
        let font = self.fonts.font(FontSize::Small);
        draw_text(target, &self.updated_label(stamp), Point::new(TEXT_INSET, y), Anchor::LeftBaseline, font)?;
        if let Some(reading) = pollen {
            draw_text(
                target,
                &self.pollen_label(reading),
                Point::new(self.geometry.width as i32 - TEXT_INSET, y),
                Anchor::RightBaseline,
                font,
            )?;
        }
        Ok(())
    }
}
