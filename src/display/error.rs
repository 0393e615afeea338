/*
 *  display/error.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the display sink and the layout engine
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

use std::fmt;
use std::error::Error;
use thiserror::Error as ThisError;

/// Error type for all display sink operations
#[derive(Debug)]
pub enum DisplayError {
    /// Panel or output initialization failed
    InitializationFailed(String),

    /// Underlying I/O failure
    Io(std::io::Error),

    /// Invalid rotation angle
    InvalidRotation(u16),

    /// Write attempted before init() or after sleep()
    NotReady,

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::Io(err) =>
                write!(f, "Display I/O error: {}", err),
            DisplayError::InvalidRotation(degrees) =>
                write!(f, "Invalid rotation angle: {} (must be 0, 90, 180, or 270)", degrees),
            DisplayError::NotReady =>
                write!(f, "Display is not initialized or asleep"),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}

/// Render failures the refresh loop routes to backoff
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum LayoutError {
    #[error("nothing to display: no current conditions and no forecast")]
    NothingToDisplay,
}
