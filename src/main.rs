/*
 *  main.rs
 *
 *  LyMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::Context;
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;

use epaper_weather::accuweather::AccuWeatherClient;
use epaper_weather::config::{self, StationSettings};
use epaper_weather::constants::ICON_SIZE;
use epaper_weather::display::{LayoutEngine, PbmSink};
use epaper_weather::drawsvg::SvgIconStore;
use epaper_weather::glyphs::LabelIconStore;
use epaper_weather::scheduler::{RefreshScheduler, SchedulerSettings};
use epaper_weather::weather_glyph::{IconResolver, IconStore};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
/// Once a signal is caught, it logs the event and returns, allowing for
/// graceful shutdown.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

async fn run(settings: StationSettings) -> anyhow::Result<()> {
    let store: Box<dyn IconStore> = match &settings.icon_dir {
        Some(dir) => {
            info!("Icons from {}", dir.display());
            Box::new(SvgIconStore::new(dir.clone(), ICON_SIZE))
        }
        None => {
            info!("No icon directory configured, using generated icons");
            Box::new(LabelIconStore::new(ICON_SIZE))
        }
    };
    let engine = LayoutEngine::new(IconResolver::new(store, ICON_SIZE), settings.locale)
        .with_horizon(settings.forecast_horizon);

    let sink = PbmSink::new(
        settings.display.output_path.clone(),
        settings.display.rotate_deg,
        settings.display.invert,
    );
    let source = AccuWeatherClient::new(settings.accuweather())
        .context("creating weather client")?;

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal_handler().await {
            Ok(()) => {
                let _ = stop_tx.send(true);
            }
            Err(e) => error!("Signal handler setup failed: {}", e),
        }
    });

    info!(
        "Refresh every {}s, backoff {}s, {} day forecast, locale {}",
        settings.refresh_interval.as_secs(),
        settings.error_backoff.as_secs(),
        settings.forecast_horizon,
        settings.locale
    );

    let scheduler = RefreshScheduler::new(
        Arc::new(source),
        Box::new(sink),
        Box::new(engine),
        SchedulerSettings::from(&settings),
        stop_rx,
    );
    let state = scheduler.run().await?;
    info!("Weather station {}", state);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("info")))
        .format_timestamp_secs()
        .init();

    info!("This {} worth the Squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    if let Err(e) = run(cfg.resolve()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
