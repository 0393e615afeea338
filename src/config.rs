use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::accuweather::{AccuWeatherConfig, DEFAULT_BASE_URL};
use crate::constants::{DEFAULT_BACKOFF_SECS, DEFAULT_FORECAST_HORIZON, DEFAULT_REFRESH_SECS};
use crate::translate::Locale;
use crate::weather::TemperatureUnit;

const DEFAULT_LOCATION_KEY: &str = "275110";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_ROTATE_DEG: u16 = 90;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Station configuration as read from YAML. Every field is optional so
/// files and CLI flags layer over the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,          // "info" | "debug" ...
    pub refresh_interval_secs: Option<u64>,
    pub error_backoff_secs: Option<u64>,
    pub locale: Option<String>,             // "pl" | "en"
    pub temp_unit: Option<TemperatureUnit>, // "C" | "F"
    pub forecast_horizon: Option<u8>,       // 1..=5
    pub icon_dir: Option<PathBuf>,
    pub weather: Option<WeatherConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub location_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub output_path: Option<PathBuf>,
    pub rotate_deg: Option<u16>,
    pub invert: Option<bool>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "weather-station", about = "E-paper weather station", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[arg(long)]
    pub refresh_interval_secs: Option<u64>,
    #[arg(long)]
    pub error_backoff_secs: Option<u64>,
    #[arg(long)]
    pub locale: Option<String>,
    #[arg(long, value_parser = parse_temp_unit)]
    pub temp_unit: Option<TemperatureUnit>,
    #[arg(long)]
    pub forecast_horizon: Option<u8>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub icon_dir: Option<PathBuf>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub location_key: Option<String>,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output_path: Option<PathBuf>,
    #[arg(long)]
    pub rotate_deg: Option<u16>,
    #[arg(long, action = ArgAction::Set)]
    pub invert: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

fn parse_temp_unit(s: &str) -> Result<TemperatureUnit, String> {
    match s.to_ascii_lowercase().as_str() {
        "c" | "celsius" | "metric" => Ok(TemperatureUnit::Celsius),
        "f" | "fahrenheit" | "imperial" => Ok(TemperatureUnit::Fahrenheit),
        other => Err(format!("unknown temperature unit '{}', expected C or F", other)),
    }
}

/// Resolved, immutable settings handed to the component constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSettings {
    pub refresh_interval: Duration,
    pub error_backoff: Duration,
    pub locale: Locale,
    pub temp_unit: TemperatureUnit,
    pub forecast_horizon: u8,
    pub icon_dir: Option<PathBuf>,
    pub weather: WeatherSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSettings {
    pub api_key: String,
    pub location_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub output_path: PathBuf,
    pub rotate_deg: u16,
    pub invert: bool,
}

impl StationSettings {
    pub fn accuweather(&self) -> AccuWeatherConfig {
        AccuWeatherConfig {
            api_key: self.weather.api_key.clone(),
            location_key: self.weather.location_key.clone(),
            base_url: self.weather.base_url.clone(),
            locale: self.locale,
            unit: self.temp_unit,
            timeout_secs: self.weather.timeout_secs,
        }
    }
}

impl Config {
    /// Fill the gaps with defaults. Run `validate` first.
    pub fn resolve(self) -> StationSettings {
        let weather = self.weather.unwrap_or_default();
        let display = self.display.unwrap_or_default();
        StationSettings {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs.unwrap_or(DEFAULT_REFRESH_SECS)),
            error_backoff: Duration::from_secs(self.error_backoff_secs.unwrap_or(DEFAULT_BACKOFF_SECS)),
            locale: resolve_locale(self.locale.as_deref()),
            temp_unit: self.temp_unit.unwrap_or_default(),
            forecast_horizon: self.forecast_horizon.unwrap_or(DEFAULT_FORECAST_HORIZON),
            icon_dir: self.icon_dir,
            weather: WeatherSettings {
                api_key: weather.api_key.unwrap_or_default(),
                location_key: weather.location_key.unwrap_or_else(|| DEFAULT_LOCATION_KEY.to_string()),
                base_url: weather.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_secs: weather.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            display: DisplaySettings {
                output_path: display.output_path.unwrap_or_else(default_output_path),
                rotate_deg: display.rotate_deg.unwrap_or(DEFAULT_ROTATE_DEG),
                invert: display.invert.unwrap_or(false),
            },
        }
    }
}

fn default_output_path() -> PathBuf {
    std::env::temp_dir().join("epaper-weather").join("frame.pbm")
}

/// Unsupported locales fall back to the default with a warning.
fn resolve_locale(code: Option<&str>) -> Locale {
    match code {
        None => Locale::DEFAULT,
        Some(c) => Locale::from_code(c).unwrap_or_else(|| {
            warn!("Unsupported locale '{}', using '{}'", c, Locale::DEFAULT);
            Locale::DEFAULT
        }),
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = build(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and CLI, then validate.
pub fn build(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/epaper-weather/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/epaper-weather/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/epaper-weather.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["epaper-weather.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()             { dst.log_level = src.log_level; }
    if src.refresh_interval_secs.is_some() { dst.refresh_interval_secs = src.refresh_interval_secs; }
    if src.error_backoff_secs.is_some()    { dst.error_backoff_secs = src.error_backoff_secs; }
    if src.locale.is_some()                { dst.locale = src.locale; }
    if src.temp_unit.is_some()             { dst.temp_unit = src.temp_unit; }
    if src.forecast_horizon.is_some()      { dst.forecast_horizon = src.forecast_horizon; }
    if src.icon_dir.is_some()              { dst.icon_dir = src.icon_dir; }
    // weather
    match (&mut dst.weather, src.weather) {
        (None, Some(w)) => dst.weather = Some(w),
        (Some(d), Some(s)) => merge_weather(d, s),
        _ => {}
    }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_weather(dst: &mut WeatherConfig, src: WeatherConfig) {
    if src.api_key.is_some()      { dst.api_key = src.api_key; }
    if src.location_key.is_some() { dst.location_key = src.location_key; }
    if src.base_url.is_some()     { dst.base_url = src.base_url; }
    if src.timeout_secs.is_some() { dst.timeout_secs = src.timeout_secs; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.output_path.is_some() { dst.output_path = src.output_path; }
    if src.rotate_deg.is_some()  { dst.rotate_deg = src.rotate_deg; }
    if src.invert.is_some()      { dst.invert = src.invert; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(v) = &cli.log_level { cfg.log_level = Some(v.clone()); }
    if cli.verbose { cfg.log_level = Some("debug".to_string()); }
    if let Some(v) = cli.refresh_interval_secs { cfg.refresh_interval_secs = Some(v); }
    if let Some(v) = cli.error_backoff_secs { cfg.error_backoff_secs = Some(v); }
    if let Some(v) = &cli.locale { cfg.locale = Some(v.clone()); }
    if let Some(v) = cli.temp_unit { cfg.temp_unit = Some(v); }
    if let Some(v) = cli.forecast_horizon { cfg.forecast_horizon = Some(v); }
    if let Some(v) = &cli.icon_dir { cfg.icon_dir = Some(v.clone()); }

    if cli.api_key.is_some() || cli.location_key.is_some() || cli.base_url.is_some() {
        let w = cfg.weather.get_or_insert_with(WeatherConfig::default);
        if let Some(v) = &cli.api_key { w.api_key = Some(v.clone()); }
        if let Some(v) = &cli.location_key { w.location_key = Some(v.clone()); }
        if let Some(v) = &cli.base_url { w.base_url = Some(v.clone()); }
    }

    if cli.output_path.is_some() || cli.rotate_deg.is_some() || cli.invert.is_some() {
        let d = cfg.display.get_or_insert_with(DisplayConfig::default);
        if let Some(v) = &cli.output_path { d.output_path = Some(v.clone()); }
        if let Some(v) = cli.rotate_deg { d.rotate_deg = Some(v); }
        if let Some(v) = cli.invert { d.invert = Some(v); }
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.refresh_interval_secs == Some(0) {
        return Err(ConfigError::Validation("refresh_interval_secs must be > 0".into()));
    }
    if cfg.error_backoff_secs == Some(0) {
        return Err(ConfigError::Validation("error_backoff_secs must be > 0".into()));
    }
    if let Some(h) = cfg.forecast_horizon {
        if !(1..=5).contains(&h) {
            return Err(ConfigError::Validation(format!("forecast_horizon must be 1..=5, got {}", h)));
        }
    }

    let weather = cfg.weather.clone().unwrap_or_default();
    if weather.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation("weather.api_key is required".into()));
    }
    if weather.location_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation("weather.location_key must not be empty".into()));
    }
    if weather.timeout_secs == Some(0) {
        return Err(ConfigError::Validation("weather.timeout_secs must be > 0".into()));
    }

    if let Some(d) = &cfg.display {
        if let Some(r) = d.rotate_deg {
            if !matches!(r, 0 | 90 | 180 | 270) {
                return Err(ConfigError::Validation(format!(
                    "display.rotate_deg must be 0, 90, 180 or 270, got {}",
                    r
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn keyed() -> Config {
        Config {
            weather: Some(WeatherConfig {
                api_key: Some("secret".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_resolve() {
        let s = keyed().resolve();
        assert_eq!(s.refresh_interval, Duration::from_secs(3600));
        assert_eq!(s.error_backoff, Duration::from_secs(60));
        assert_eq!(s.locale, Locale::En);
        assert_eq!(s.temp_unit, TemperatureUnit::Celsius);
        assert_eq!(s.forecast_horizon, 5);
        assert_eq!(s.weather.location_key, DEFAULT_LOCATION_KEY);
        assert_eq!(s.weather.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.display.rotate_deg, 90);
        assert!(!s.display.invert);
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let mut cfg = keyed();
        cfg.locale = Some("de_DE".into());
        assert_eq!(cfg.resolve().locale, Locale::En);

        let mut cfg = keyed();
        cfg.locale = Some("pl_PL".into());
        assert_eq!(cfg.resolve().locale, Locale::Pl);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut dst = keyed();
        dst.refresh_interval_secs = Some(1800);
        let src = Config {
            locale: Some("pl".into()),
            weather: Some(WeatherConfig {
                location_key: Some("12345".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        merge(&mut dst, src);

        assert_eq!(dst.refresh_interval_secs, Some(1800));
        assert_eq!(dst.locale.as_deref(), Some("pl"));
        let w = dst.weather.unwrap();
        assert_eq!(w.api_key.as_deref(), Some("secret"));
        assert_eq!(w.location_key.as_deref(), Some("12345"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(validate(&keyed()).is_ok());
        assert!(matches!(validate(&Config::default()), Err(ConfigError::Validation(_))));

        let mut cfg = keyed();
        cfg.refresh_interval_secs = Some(0);
        assert!(validate(&cfg).is_err());

        let mut cfg = keyed();
        cfg.forecast_horizon = Some(6);
        assert!(validate(&cfg).is_err());

        let mut cfg = keyed();
        cfg.display = Some(DisplayConfig { rotate_deg: Some(45), ..Default::default() });
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_yaml_then_cli_layering() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "locale: pl\ntemp_unit: F\nforecast_horizon: 3\nweather:\n  api_key: from-yaml\ndisplay:\n  rotate_deg: 0"
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "weather-station",
            "--config",
            file.path().to_str().unwrap(),
            "--forecast-horizon",
            "2",
            "-v",
        ])
        .unwrap();
        let cfg = build(&cli).unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        let s = cfg.resolve();

        assert_eq!(s.locale, Locale::Pl);
        assert_eq!(s.temp_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(s.forecast_horizon, 2);
        assert_eq!(s.weather.api_key, "from-yaml");
        assert_eq!(s.display.rotate_deg, 0);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/epaper-weather.yaml")),
            ..Default::default()
        };
        assert!(matches!(build(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_temp_unit_flag() {
        assert_eq!(parse_temp_unit("f"), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!(parse_temp_unit("Celsius"), Ok(TemperatureUnit::Celsius));
        assert!(parse_temp_unit("kelvin").is_err());
    }
}
