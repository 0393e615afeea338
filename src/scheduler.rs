/*
 *  scheduler.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Refresh loop: fetch, render, display, wait - with error backoff
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

use chrono::{Local, NaiveDateTime};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::StationSettings;
use crate::constants::{DEFAULT_BACKOFF_SECS, DEFAULT_FORECAST_HORIZON, DEFAULT_REFRESH_SECS};
use crate::display::{DisplayError, DisplaySink, FrameRenderer, LayoutError};
use crate::weather::{WeatherFrame, WeatherSource};

/// Where the refresh loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Fetching,
    Rendering,
    Displaying,
    Waiting,
    ErrorBackoff,
    Stopped,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulerState::Idle => "IDLE",
            SchedulerState::Fetching => "FETCHING",
            SchedulerState::Rendering => "RENDERING",
            SchedulerState::Displaying => "DISPLAYING",
            SchedulerState::Waiting => "WAITING",
            SchedulerState::ErrorBackoff => "ERROR-BACKOFF",
            SchedulerState::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}

/// Wall clock used to stamp rendered frames
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSettings {
    pub refresh_interval: Duration,
    pub error_backoff: Duration,
    pub forecast_horizon: u8,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            error_backoff: Duration::from_secs(DEFAULT_BACKOFF_SECS),
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
        }
    }
}

impl From<&StationSettings> for SchedulerSettings {
    fn from(s: &StationSettings) -> Self {
        Self {
            refresh_interval: s.refresh_interval,
            error_backoff: s.error_backoff,
            forecast_horizon: s.forecast_horizon,
        }
    }
}

/// Errors that end the loop
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("display initialization failed: {0}")]
    SinkInit(#[source] DisplayError),
}

/// Why a cycle went to backoff
#[derive(Debug, Error)]
enum CycleError {
    #[error("render stage: {0}")]
    Render(#[from] LayoutError),
    #[error("display stage: {0}")]
    Display(#[from] DisplayError),
}

enum Cycle {
    Completed,
    Failed(CycleError),
    Interrupted,
}

/// Resolves once `true` is published on the stop channel. A dropped sender
/// without a stop never resolves.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    let closed = stop.wait_for(|&stopped| stopped).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

pub struct RefreshScheduler {
    source: Arc<dyn WeatherSource>,
    sink: Box<dyn DisplaySink>,
    renderer: Box<dyn FrameRenderer>,
    clock: Box<dyn Clock>,
    settings: SchedulerSettings,
    stop: watch::Receiver<bool>,
    state_tx: watch::Sender<SchedulerState>,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        sink: Box<dyn DisplaySink>,
        renderer: Box<dyn FrameRenderer>,
        settings: SchedulerSettings,
        stop: watch::Receiver<bool>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SchedulerState::Idle);
        Self {
            source,
            sink,
            renderer,
            clock: Box::new(LocalClock),
            settings,
            stop,
            state_tx,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Follow state transitions
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state_tx.borrow()
    }

    fn set_state(&self, next: SchedulerState) {
        let prev = self.state_tx.send_replace(next);
        debug!("scheduler {} -> {}", prev, next);
    }

    /// Drive the loop until the stop channel says otherwise.
    ///
    /// Only a failing `init()` is returned as an error; every cycle failure
    /// is logged and retried after the backoff interval.
    pub async fn run(mut self) -> Result<SchedulerState, SchedulerError> {
        self.set_state(SchedulerState::Idle);
        if let Err(e) = self.sink.init().await {
            error!("Display initialization failed: {}", e);
            return Err(SchedulerError::SinkInit(e));
        }

        let mut stop = self.stop.clone();
        loop {
            if *stop.borrow() {
                break;
            }

            let (next, wait) = match self.cycle(&mut stop).await {
                Cycle::Interrupted => break,
                Cycle::Completed => {
                    info!("Display refreshed, next update in {}s", self.settings.refresh_interval.as_secs());
                    (SchedulerState::Waiting, self.settings.refresh_interval)
                }
                Cycle::Failed(e) => {
                    error!("Refresh failed in {}, retry in {}s", e, self.settings.error_backoff.as_secs());
                    (SchedulerState::ErrorBackoff, self.settings.error_backoff)
                }
            };

            self.set_state(next);
            tokio::select! {
                biased;
                _ = stop_requested(&mut stop) => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        info!("Stop received, putting display to sleep");
        if let Err(e) = self.sink.sleep().await {
            warn!("Display sleep failed: {}", e);
        }
        self.set_state(SchedulerState::Stopped);
        Ok(SchedulerState::Stopped)
    }

    async fn cycle(&mut self, stop: &mut watch::Receiver<bool>) -> Cycle {
        self.set_state(SchedulerState::Fetching);
        let frame = tokio::select! {
            biased;
            _ = stop_requested(stop) => return Cycle::Interrupted,
            frame = fetch(self.source.as_ref(), self.settings.forecast_horizon) => frame,
        };

        self.set_state(SchedulerState::Rendering);
        let canvas = match self.renderer.render_frame(self.clock.now(), &frame) {
            Ok(canvas) => canvas,
            Err(e) => return Cycle::Failed(e.into()),
        };

        self.set_state(SchedulerState::Displaying);
        let written = tokio::select! {
            biased;
            _ = stop_requested(stop) => return Cycle::Interrupted,
            r = self.sink.write(canvas) => r,
        };
        match written {
            Ok(()) => Cycle::Completed,
            Err(e) => Cycle::Failed(e.into()),
        }
    }
}

/// All three queries in flight at once; a failed one is simply absent
async fn fetch(source: &dyn WeatherSource, horizon: u8) -> WeatherFrame {
    let (current, forecast, pollen) = tokio::join!(
        source.current(),
        source.forecast(horizon),
        source.pollen(),
    );

    WeatherFrame {
        current: current
            .inspect_err(|e| warn!("Current conditions unavailable: {}", e))
            .ok(),
        forecast: forecast
            .inspect_err(|e| warn!("Forecast unavailable: {}", e))
            .ok(),
        pollen: pollen
            .inspect_err(|e| warn!("Pollen index unavailable: {}", e))
            .ok(),
    }
}
