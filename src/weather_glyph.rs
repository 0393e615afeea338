/*
 *  weather_glyph.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Condition code to icon mapping and the cached icon resolver
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

use log::{debug, warn};
use mini_moka::sync::Cache;
use std::fmt;
use std::sync::Arc;

use crate::constants::ICON_CACHE_CAPACITY;
use crate::glyphs::Bitmap;

/// Closed set of icons the layout knows how to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Sunny,
    PartlySunny,
    PartlyCloudy,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Windy,
    Ice,
    Sleet,
    Hot,
    Cold,
    Clear,
    PartlyClear,
    Unknown,
}

impl IconId {
    pub const ALL: [IconId; 16] = [
        IconId::Sunny,
        IconId::PartlySunny,
        IconId::PartlyCloudy,
        IconId::Cloudy,
        IconId::Rain,
        IconId::Thunderstorm,
        IconId::Snow,
        IconId::Fog,
        IconId::Windy,
        IconId::Ice,
        IconId::Sleet,
        IconId::Hot,
        IconId::Cold,
        IconId::Clear,
        IconId::PartlyClear,
        IconId::Unknown,
    ];

    /// Asset file stem
    pub fn name(&self) -> &'static str {
        match self {
            IconId::Sunny => "sunny",
            IconId::PartlySunny => "partly_sunny",
            IconId::PartlyCloudy => "partly_cloudy",
            IconId::Cloudy => "cloudy",
            IconId::Rain => "rain",
            IconId::Thunderstorm => "thunderstorm",
            IconId::Snow => "snow",
            IconId::Fog => "fog",
            IconId::Windy => "windy",
            IconId::Ice => "ice",
            IconId::Sleet => "sleet",
            IconId::Hot => "hot",
            IconId::Cold => "cold",
            IconId::Clear => "clear",
            IconId::PartlyClear => "partly_clear",
            IconId::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a provider (AccuWeather) icon number to an icon, never fails
pub fn resolve(condition_code: i32) -> IconId {
    match condition_code {
        1 => IconId::Sunny,
        2 => IconId::PartlySunny,
        3..=5 | 35..=37 => IconId::PartlyCloudy,
        6..=8 | 38 => IconId::Cloudy,
        11 => IconId::Fog,
        12..=14 | 18 | 26 | 39 | 40 => IconId::Rain,
        15..=17 | 41 | 42 => IconId::Thunderstorm,
        19..=23 | 43 | 44 => IconId::Snow,
        24 => IconId::Ice,
        25 | 29 => IconId::Sleet,
        30 => IconId::Hot,
        31 => IconId::Cold,
        32 => IconId::Windy,
        33 => IconId::Clear,
        34 => IconId::PartlyClear,
        _ => IconId::Unknown,
    }
}

#[derive(Debug)]
pub enum IconError {
    NotFound(String),
    Io(std::io::Error),
    Decode(String),
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconError::NotFound(what) => write!(f, "icon asset not found: {}", what),
            IconError::Io(e) => write!(f, "I/O error: {}", e),
            IconError::Decode(msg) => write!(f, "icon decode error: {}", msg),
        }
    }
}

impl std::error::Error for IconError {}

impl From<std::io::Error> for IconError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => IconError::NotFound(err.to_string()),
            _ => IconError::Io(err),
        }
    }
}

/// Backing storage for icon bitmaps
pub trait IconStore: Send + Sync {
    fn get(&self, id: IconId) -> Result<Bitmap, IconError>;
}

/// Resolves condition codes to bitmaps, caching decoded assets.
///
/// A failed load yields a blank bitmap of the nominal size so rendering
/// carries on; placeholders are not cached.
pub struct IconResolver {
    store: Box<dyn IconStore>,
    size: u32,
    cache: Cache<IconId, Arc<Bitmap>>,
}

impl IconResolver {
    pub fn new(store: Box<dyn IconStore>, size: u32) -> Self {
        Self {
            store,
            size,
            cache: Cache::new(ICON_CACHE_CAPACITY),
        }
    }

    pub fn resolve(&self, condition_code: i32) -> IconId {
        resolve(condition_code)
    }

    pub fn load(&self, id: IconId) -> Arc<Bitmap> {
        if let Some(bmp) = self.cache.get(&id) {
            return bmp;
        }
        match self.store.get(id) {
            Ok(bmp) => {
                let bmp = if bmp.width() != self.size || bmp.height() != self.size {
                    debug!("icon {} is {}x{}, scaling to {}", id, bmp.width(), bmp.height(), self.size);
                    bmp.scaled(self.size, self.size)
                } else {
                    bmp
                };
                let bmp = Arc::new(bmp);
                self.cache.insert(id, Arc::clone(&bmp));
                bmp
            }
            Err(e) => {
                warn!("icon {} unavailable, using placeholder: {}", id, e);
                Arc::new(Bitmap::blank(self.size, self.size))
            }
        }
    }

    /// resolve + load
    pub fn icon_for(&self, condition_code: i32) -> Arc<Bitmap> {
        self.load(resolve(condition_code))
    }
}
