/*
 *  display/drivers/mock.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display sink for testing without hardware
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
use std::sync::{Arc, Mutex};

use crate::display::error::DisplayError;
use crate::display::framebuffer::Canvas;
use crate::display::traits::DisplaySink;

/// Mock sink for testing
///
/// Records every call and keeps the last canvas written. The state is
/// shared, so a test keeps a handle after the sink moves into the loop.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    state: Arc<Mutex<MockSinkState>>,
}

/// Internal state for the mock sink (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockSinkState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of successful write() calls
    pub write_count: usize,

    /// Number of write() calls, failed ones included
    pub write_attempts: usize,

    /// Number of times sleep() was called
    pub sleep_count: usize,

    /// Last canvas written
    pub last_canvas: Option<Canvas>,

    /// Simulate failures (for error testing)
    pub simulate_init_failure: bool,
    pub simulate_write_failure: bool,

    /// Park write() forever, for shutdown-while-writing tests
    pub hang_on_write: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockSinkState>> {
        Arc::clone(&self.state)
    }
}

#[async_trait]
impl DisplaySink for MockSink {
    async fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();
        state.init_count += 1;
        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }
        Ok(())
    }

    async fn write(&mut self, canvas: Canvas) -> Result<(), DisplayError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            state.write_attempts += 1;
            if state.simulate_write_failure {
                return Err(DisplayError::Other("Simulated write failure".to_string()));
            }
            state.hang_on_write
        }; // Release lock before parking

        if hang {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.lock().unwrap();
        state.write_count += 1;
        state.last_canvas = Some(canvas);
        Ok(())
    }

    async fn sleep(&mut self) -> Result<(), DisplayError> {
        self.state.lock().unwrap().sleep_count += 1;
        Ok(())
    }
}
