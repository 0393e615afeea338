/*
 *  translate.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Localized labels for the weather layout
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

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported label languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Pl,
    #[default]
    En,
}

impl Locale {
    /// Fallback when a key is missing from the selected locale
    pub const DEFAULT: Locale = Locale::En;

    /// Parse an ISO 639-1 code, region suffixes are ignored ("pl_PL", "en-GB")
    pub fn from_code(code: &str) -> Option<Self> {
        let lang = code
            .split(['_', '-'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "pl" => Some(Locale::Pl),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Pl => "pl",
            Locale::En => "en",
        }
    }

    /// Look up `key`, falling back to the default locale and then the key itself
    pub fn text<'a>(&self, key: &'a str) -> &'a str {
        lookup(table(*self), key)
            .or_else(|| lookup(table(Locale::DEFAULT), key))
            .unwrap_or(key)
    }

    /// Abbreviated weekday used for forecast column labels
    pub fn weekday(&self, day: Weekday) -> &'static str {
        let key = match day {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        };
        self.text(key)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn lookup(entries: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn table(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::Pl => PL,
        Locale::En => EN,
    }
}

const PL: &[(&str, &str)] = &[
    ("weather_forecast", "Prognoza pogody"),
    ("today", "Dziś"),
    ("tomorrow", "Jutro"),
    ("updated", "Zaktualizowano"),
    ("min", "min"),
    ("max", "max"),
    ("feels_like", "Odczuwalna"),
    ("humidity", "Wilgotność"),
    ("precipitation", "Opady"),
    ("pollen", "Pyłki"),
    ("low", "Niskie"),
    ("moderate", "Średnie"),
    ("high", "Wysokie"),
    ("very_high", "Bardzo wysokie"),
    ("mon", "Pon"),
    ("tue", "Wt"),
    ("wed", "Śr"),
    ("thu", "Czw"),
    ("fri", "Pt"),
    ("sat", "Sob"),
    ("sun", "Ndz"),
];

const EN: &[(&str, &str)] = &[
    ("weather_forecast", "Weather Forecast"),
    ("today", "Today"),
    ("tomorrow", "Tomorrow"),
    ("updated", "Updated"),
    ("min", "min"),
    ("max", "max"),
    ("feels_like", "Feels like"),
    ("humidity", "Humidity"),
    ("precipitation", "Precipitation"),
    ("pollen", "Pollen"),
    ("low", "Low"),
    ("moderate", "Moderate"),
    ("high", "High"),
    ("very_high", "Very high"),
    ("mon", "Mon"),
    ("tue", "Tue"),
    ("wed", "Wed"),
    ("thu", "Thu"),
    ("fri", "Fri"),
    ("sat", "Sat"),
    ("sun", "Sun"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_labels() {
        assert_eq!(Locale::Pl.text("humidity"), "Wilgotność");
        assert_eq!(Locale::Pl.weekday(Weekday::Wed), "Śr");
    }

    #[test]
    fn test_missing_key_returns_key() {
        assert_eq!(Locale::Pl.text("no_such_label"), "no_such_label");
        assert_eq!(Locale::En.text("no_such_label"), "no_such_label");
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("pl"), Some(Locale::Pl));
        assert_eq!(Locale::from_code("en_GB"), Some(Locale::En));
        assert_eq!(Locale::from_code("PL-pl"), Some(Locale::Pl));
        assert_eq!(Locale::from_code("de"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_tables_cover_same_keys() {
        for (key, _) in EN {
            assert!(lookup(PL, key).is_some(), "pl is missing {}", key);
        }
    }
}
