/*
 *  display/traits.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Seams between the refresh loop, the renderer and the panel
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

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::display::error::{DisplayError, LayoutError};
use crate::display::framebuffer::Canvas;
use crate::weather::WeatherFrame;

/// Output side of the refresh loop - all panels must implement this trait
///
/// Each call may block for the duration of a full e-paper refresh, so the
/// methods are async and the loop can abandon them on shutdown.
#[async_trait]
pub trait DisplaySink: Send {
    /// Bring the panel up; failure here is fatal for the process
    async fn init(&mut self) -> Result<(), DisplayError>;

    /// Show a finalized canvas. Ownership moves to the sink, rotation is
    /// the sink's business.
    async fn write(&mut self, canvas: Canvas) -> Result<(), DisplayError>;

    /// Put the panel into its low power state before exit
    async fn sleep(&mut self) -> Result<(), DisplayError>;
}

/// Turns one poll's worth of data into a canvas
pub trait FrameRenderer: Send + Sync {
    fn render_frame(&self, now: NaiveDateTime, frame: &WeatherFrame) -> Result<Canvas, LayoutError>;
}
