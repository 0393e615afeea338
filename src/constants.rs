//! This module contains global constants used across the layout engine and the refresh loop.

/// The total width of the e-paper canvas in pixels.
pub const CANVAS_WIDTH: u32 = 400;
/// The total height of the e-paper canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 300;

/// Inner margin applied inside the border.
pub const MARGIN: u32 = 4;
/// Horizontal inset for text anchored to the left or right edge.
pub const TEXT_INSET: i32 = 8;

/// Header band, fraction of the canvas height.
pub const HEADER_FRACTION: f32 = 0.16;
/// Body split between the current band and the forecast strip (current:forecast).
pub const CURRENT_SHARE: u32 = 55;
pub const FORECAST_SHARE: u32 = 35;

/// Large icon, fraction of the current band height.
pub const LARGE_ICON_FRACTION: f32 = 0.70;
/// Small icon, fraction of the forecast strip height.
pub const SMALL_ICON_FRACTION: f32 = 0.30;

/// Nominal icon asset size, icons are square.
pub const ICON_SIZE: u32 = 64;
/// Bounded cache for decoded icon bitmaps, one entry per icon id is plenty.
pub const ICON_CACHE_CAPACITY: u64 = 32;

/// Hard cap on forecast columns regardless of the configured horizon.
pub const FORECAST_DISPLAY_CAP: usize = 5;

/// Defaults for the refresh loop.
pub const DEFAULT_REFRESH_SECS: u64 = 3600;
pub const DEFAULT_BACKOFF_SECS: u64 = 60;
pub const DEFAULT_FORECAST_HORIZON: u8 = 5;

/// Locale independent timestamp, used in the header and the footer.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";
