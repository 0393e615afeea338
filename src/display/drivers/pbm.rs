/*
 *  display/drivers/pbm.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  File sink writing each frame as a portable bitmap
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
use embedded_graphics::pixelcolor::BinaryColor;
use log::{debug, info};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::display::error::DisplayError;
use crate::display::framebuffer::Canvas;
use crate::display::traits::DisplaySink;

/// Plain PBM caps lines at 70 characters
const PBM_LINE: usize = 70;

/// Encode as plain PBM (P1), 1 = black
pub fn encode_pbm(canvas: &Canvas) -> String {
    let (w, h) = canvas.dimensions();
    let mut out = String::with_capacity((w as usize + 2) * h as usize + 16);
    let _ = writeln!(out, "P1");
    let _ = writeln!(out, "{} {}", w, h);
    for row in canvas.as_slice().chunks(w.max(1) as usize) {
        for line in row.chunks(PBM_LINE) {
            line.iter()
                .for_each(|&p| out.push(if p == BinaryColor::On { '1' } else { '0' }));
            out.push('\n');
        }
    }
    out
}

/// Stand-in panel for desktops and for driving an external e-paper tool:
/// every frame replaces the file at `path`.
#[derive(Debug)]
pub struct PbmSink {
    path: PathBuf,
    rotate_deg: u16,
    invert: bool,
    ready: bool,
    frames: u64,
}

impl PbmSink {
    pub fn new(path: impl Into<PathBuf>, rotate_deg: u16, invert: bool) -> Self {
        Self {
            path: path.into(),
            rotate_deg,
            invert,
            ready: false,
            frames: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

#[async_trait]
impl DisplaySink for PbmSink {
    async fn init(&mut self) -> Result<(), DisplayError> {
        if !matches!(self.rotate_deg, 0 | 90 | 180 | 270) {
            return Err(DisplayError::InvalidRotation(self.rotate_deg));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                DisplayError::InitializationFailed(format!("{}: {}", parent.display(), e))
            })?;
        }
        self.ready = true;
        info!("PBM sink ready at {} (rotation {}°)", self.path.display(), self.rotate_deg);
        Ok(())
    }

    async fn write(&mut self, canvas: Canvas) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotReady);
        }
        let mut frame = canvas.rotated(self.rotate_deg)?;
        if self.invert {
            frame = frame.inverted();
        }

        // write then rename, readers never see a half written frame
        let tmp = self.path.with_extension("pbm.tmp");
        fs::write(&tmp, encode_pbm(&frame)).await?;
        fs::rename(&tmp, &self.path).await?;

        self.frames += 1;
        debug!("frame {} written to {}", self.frames, self.path.display());
        Ok(())
    }

    async fn sleep(&mut self) -> Result<(), DisplayError> {
        self.ready = false;
        info!("PBM sink asleep after {} frames", self.frames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_encode_small_canvas() {
        let mut canvas = Canvas::new(3, 2);
        Pixel(Point::new(2, 0), BinaryColor::On).draw(&mut canvas).unwrap();
        assert_eq!(encode_pbm(&canvas), "P1\n3 2\n001\n000\n");
    }

    #[test]
    fn test_long_rows_wrap() {
        let canvas = Canvas::new(100, 1);
        let text = encode_pbm(&canvas);
        assert!(text.lines().all(|l| l.len() <= PBM_LINE));
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_write_rotates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/frame.pbm");
        let mut sink = PbmSink::new(&path, 90, false);
        sink.init().await.unwrap();

        sink.write(Canvas::new(4, 2)).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("P1\n2 4\n"));
        assert_eq!(sink.frames_written(), 1);
    }

    #[tokio::test]
    async fn test_write_before_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PbmSink::new(dir.path().join("frame.pbm"), 0, false);
        assert!(matches!(sink.write(Canvas::new(4, 4)).await, Err(DisplayError::NotReady)));
    }

    #[tokio::test]
    async fn test_bad_rotation_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PbmSink::new(dir.path().join("frame.pbm"), 45, false);
        assert!(matches!(sink.init().await, Err(DisplayError::InvalidRotation(45))));
    }

    #[tokio::test]
    async fn test_unwritable_parent_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let mut sink = PbmSink::new(blocker.join("frame.pbm"), 0, false);
        assert!(matches!(sink.init().await, Err(DisplayError::InitializationFailed(_))));
    }
}
