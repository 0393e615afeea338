/*
 *  display/mod.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - canvas, layout engine and output sinks
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;

// Band geometry and fonts
pub mod layout;

// UI components
pub mod components;

// Layout engine
pub mod engine;

// Output sinks
pub mod drivers;

// Re-exports for convenience
pub use traits::{DisplaySink, FrameRenderer};
pub use error::{DisplayError, LayoutError};
pub use framebuffer::Canvas;
pub use layout::{FontSet, FontSize, LayoutGeometry};
pub use engine::LayoutEngine;
pub use drivers::PbmSink;
