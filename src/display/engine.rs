/*
 *  display/engine.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layout engine: weather data in, finalized canvas out
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
use log::debug;

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_FORECAST_HORIZON};
use crate::display::components::forecast::select_days;
use crate::display::components::{CurrentConditions, FooterBar, ForecastStrip, HeaderBar};
use crate::display::error::LayoutError;
use crate::display::framebuffer::Canvas;
use crate::display::layout::{FontSet, LayoutGeometry};
use crate::display::traits::FrameRenderer;
use crate::draw::draw_border;
use crate::translate::Locale;
use crate::weather::{ConditionSnapshot, DailyForecastEntry, PollenReading, WeatherFrame};
use crate::weather_glyph::IconResolver;

/// Maps weather data onto the fixed canvas.
///
/// Rendering is a pure function of its arguments: identical inputs give
/// identical canvases. The icon cache only ever holds what the store
/// returns, so it does not change the output.
pub struct LayoutEngine {
    geometry: LayoutGeometry,
    fonts: FontSet,
    icons: IconResolver,
    locale: Locale,
    horizon: usize,
}

impl LayoutEngine {
    pub fn new(icons: IconResolver, locale: Locale) -> Self {
        let fonts = FontSet;
        Self {
            geometry: LayoutGeometry::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, &fonts),
            fonts,
            icons,
            locale,
            horizon: DEFAULT_FORECAST_HORIZON as usize,
        }
    }

    /// Forecast columns to show at most, further capped by the display
    pub fn with_horizon(mut self, horizon: u8) -> Self {
        self.horizon = horizon as usize;
        self
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    /// Render one frame.
    ///
    /// Border, header and footer are always drawn; the current band and the
    /// forecast strip only when their data is present. Fails only when
    /// both current conditions and the forecast are missing.
    pub fn render(
        &self,
        now: NaiveDateTime,
        locale: Locale,
        current: Option<&ConditionSnapshot>,
        forecast: Option<&[DailyForecastEntry]>,
        pollen: Option<&PollenReading>,
    ) -> Result<Canvas, LayoutError> {
        // a forecast with no day left to show counts as absent
        let today = now.date();
        let forecast = forecast.filter(|f| !select_days(today, f, self.horizon).is_empty());
        if current.is_none() && forecast.is_none() {
            return Err(LayoutError::NothingToDisplay);
        }

        let g = &self.geometry;
        let mut canvas = Canvas::new(g.width, g.height);
        let target = &mut canvas;

        // Canvas drawing cannot fail, the error type is Infallible
        let Ok(()) = draw_border(target);
        let Ok(()) = HeaderBar::new(g, &self.fonts, locale).render(target, now);

        if let Some(current) = current {
            let Ok(()) = CurrentConditions::new(g, &self.fonts, &self.icons, locale).render(target, current);
        }
        if let Some(entries) = forecast {
            let strip = ForecastStrip::new(g, &self.fonts, &self.icons, locale, self.horizon);
            let Ok(()) = strip.render(target, today, entries);
        }

        let Ok(()) = FooterBar::new(g, &self.fonts, locale).render(target, now, pollen);

        debug!(
            "rendered frame: current={} forecast={} pollen={} ink={}",
            current.is_some(),
            forecast.map_or(0, |f| f.len()),
            pollen.is_some(),
            canvas.ink_count()
        );
        Ok(canvas)
    }
}

impl FrameRenderer for LayoutEngine {
    fn render_frame(&self, now: NaiveDateTime, frame: &WeatherFrame) -> Result<Canvas, LayoutError> {
        self.render(
            now,
            self.locale,
            frame.current.as_ref(),
            frame.forecast.as_deref(),
            frame.pollen.as_ref(),
        )
    }
}
