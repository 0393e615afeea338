/*
 *  tests/layout_integration.rs
 *
 *  Integration tests for the layout engine
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 */

use chrono::{Duration, NaiveDate, NaiveDateTime};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use epaper_weather::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, ICON_SIZE};
use epaper_weather::display::components::ForecastStrip;
use epaper_weather::display::{FontSet, LayoutEngine, LayoutError};
use epaper_weather::glyphs::LabelIconStore;
use epaper_weather::translate::Locale;
use epaper_weather::weather::{
    ConditionSnapshot, DailyForecastEntry, PollenCategory, PollenReading, Temperature,
    TemperatureUnit,
};
use epaper_weather::weather_glyph::{self, IconId, IconResolver};

fn engine(locale: Locale) -> LayoutEngine {
    let icons = IconResolver::new(Box::new(LabelIconStore::new(ICON_SIZE)), ICON_SIZE);
    LayoutEngine::new(icons, locale)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn now() -> NaiveDateTime {
    today().and_hms_opt(14, 30, 0).unwrap()
}

fn celsius(v: f64) -> Temperature {
    Temperature::new(v, TemperatureUnit::Celsius)
}

fn snapshot() -> ConditionSnapshot {
    ConditionSnapshot {
        observed_at: now(),
        temperature: celsius(20.5),
        feels_like: celsius(-0.5),
        humidity: 64,
        precipitation_probability: Some(30),
        condition_code: 3,
    }
}

fn days(from: NaiveDate, count: i64) -> Vec<DailyForecastEntry> {
    (0..count)
        .map(|i| DailyForecastEntry {
            date: from + Duration::days(i),
            min: Some(celsius(2.0 + i as f64)),
            max: Some(celsius(10.0 + i as f64)),
            condition_code: 12,
            precipitation_probability: Some(50),
        })
        .collect()
}

fn row_has_ink(canvas: &epaper_weather::display::Canvas, y: u32, xs: std::ops::Range<u32>) -> bool {
    xs.into_iter().any(|x| canvas.is_ink(x, y))
}

#[test]
fn test_render_is_deterministic() {
    let engine = engine(Locale::Pl);
    let current = snapshot();
    let forecast = days(today(), 5);
    let pollen = PollenReading { category: PollenCategory::High };

    let a = engine
        .render(now(), Locale::Pl, Some(&current), Some(&forecast), Some(&pollen))
        .unwrap();
    let b = engine
        .render(now(), Locale::Pl, Some(&current), Some(&forecast), Some(&pollen))
        .unwrap();

    assert_eq!(a.to_packed_bytes(), b.to_packed_bytes());
    assert_eq!(a.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
}

#[test]
fn test_nothing_to_display_without_current_or_forecast() {
    let engine = engine(Locale::En);
    let pollen = PollenReading { category: PollenCategory::Low };

    assert_eq!(
        engine.render(now(), Locale::En, None, None, None),
        Err(LayoutError::NothingToDisplay)
    );
    assert_eq!(
        engine.render(now(), Locale::En, None, Some(&[]), Some(&pollen)),
        Err(LayoutError::NothingToDisplay)
    );
}

#[test]
fn test_stale_forecast_without_current_is_nothing_to_display() {
    let engine = engine(Locale::En);
    let stale = days(today() - Duration::days(3), 3);

    assert_eq!(
        engine.render(now(), Locale::En, None, Some(&stale), None),
        Err(LayoutError::NothingToDisplay)
    );
    let current = snapshot();
    assert!(engine.render(now(), Locale::En, Some(&current), Some(&stale), None).is_ok());
}

#[test]
fn test_current_only_leaves_forecast_strip_blank() {
    let engine = engine(Locale::En);
    let current = snapshot();
    let canvas = engine.render(now(), Locale::En, Some(&current), None, None).unwrap();
    let g = engine.geometry();

    // separator row stays empty between the border columns
    let rule = g.forecast_rule_y() as u32;
    assert!(!row_has_ink(&canvas, rule, 1..CANVAS_WIDTH - 1));

    let inner = |band: &Rectangle| {
        Rectangle::new(
            band.top_left + Point::new(1, 1),
            Size::new(band.size.width - 2, band.size.height.saturating_sub(2)),
        )
    };
    assert!(canvas.ink_in(&inner(&g.header)) > 0);
    assert!(canvas.ink_in(&inner(&g.current)) > 0);
    assert!(canvas.ink_in(&inner(&g.footer)) > 0);
    assert_eq!(canvas.ink_in(&inner(&g.forecast)), 0);
}

#[test]
fn test_forecast_only_renders() {
    let engine = engine(Locale::En);
    let forecast = days(today(), 3);
    let canvas = engine.render(now(), Locale::En, None, Some(&forecast), None).unwrap();

    let rule = engine.geometry().forecast_rule_y() as u32;
    assert!(row_has_ink(&canvas, rule, 1..CANVAS_WIDTH - 1));
}

#[test]
fn test_seven_day_forecast_is_capped_at_five_columns() {
    let engine = engine(Locale::En);
    let fonts = FontSet::default();
    let icons = IconResolver::new(Box::new(LabelIconStore::new(ICON_SIZE)), ICON_SIZE);

    // yesterday first, unsorted, 8 entries in total
    let mut forecast = days(today() - Duration::days(1), 8);
    forecast.reverse();

    let strip = ForecastStrip::new(engine.geometry(), &fonts, &icons, Locale::En, 7);
    let columns = strip.columns(today(), &forecast);

    assert_eq!(columns.len(), 5);
    assert_eq!(columns[0].entry.date, today());
    assert_eq!(columns[0].label, "Today");
    assert!(columns.windows(2).all(|w| w[0].entry.date < w[1].entry.date));
    assert!(columns.windows(2).all(|w| w[0].area.top_left.x < w[1].area.top_left.x));

    assert!(engine.render(now(), Locale::En, None, Some(&forecast), None).is_ok());
}

#[test]
fn test_temperatures_round_half_away_from_zero() {
    assert_eq!(celsius(20.5).with_unit(), "21°C");
    assert_eq!(celsius(-0.5).with_degree(), "-1°");
    assert_eq!(celsius(-0.4).with_degree(), "0°");
    assert_eq!(celsius(19.49).rounded(), 19);
}

#[test]
fn test_unknown_condition_codes_resolve_to_unknown() {
    for code in [0, -1, -40, 9, 10, 27, 28, 45, 99, i32::MAX, i32::MIN] {
        assert_eq!(weather_glyph::resolve(code), IconId::Unknown, "code {}", code);
    }
    assert_eq!(weather_glyph::resolve(1), IconId::Sunny);
    assert_eq!(weather_glyph::resolve(18), IconId::Rain);
}
