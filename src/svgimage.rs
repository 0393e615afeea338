//! Module for rendering SVG icons to a monochrome pixel buffer.
//!
//! This module uses `usvg` for SVG parsing and `resvg` for rendering.
//! The output is a 1-bit per pixel bitmap, row-major, MSB first, suitable for
//! `embedded-graphics::image::ImageRaw` and the e-paper canvas.

use resvg::{
    render,
    usvg::{
        Tree as ResvgTree,
        Options as ResvgUsvgOptions,
        Transform,
    }
}; // Use resvg's re-exports for usvg types

use tiny_skia::Pixmap;
use log::{debug, error};
use std::error::Error;
use std::fmt;

/// Custom error type for SVG rendering operations.
#[derive(Debug)]
pub enum SvgImageError {
    /// Error parsing the SVG data.
    SvgParseError(String),
    /// Error creating a pixmap for rendering.
    PixmapCreationError(String),
    /// The provided buffer is too small for the target image size.
    BufferTooSmall,
}

impl fmt::Display for SvgImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgImageError::SvgParseError(msg) => write!(f, "SVG parse error: {}", msg),
            SvgImageError::PixmapCreationError(msg) => write!(f, "Pixmap creation error: {}", msg),
            SvgImageError::BufferTooSmall => write!(f, "Provided buffer is too small for SVG rendering."),
        }
    }
}

impl Error for SvgImageError {}

/// Renders SVG data to a monochrome pixel buffer.
#[derive(Debug)]
pub struct SvgImageRenderer {
    tree: ResvgTree,
    target_width: u32,
    target_height: u32,
    threshold: u8,
}

impl SvgImageRenderer {
    /// Creates a new `SvgImageRenderer` from SVG string data and target dimensions.
    ///
    /// The SVG will be scaled to fit `target_width` and `target_height`.
    pub fn new(svg_data: &str, target_width: u32, target_height: u32) -> Result<Self, SvgImageError> {
        let usvg_options = ResvgUsvgOptions::default();
        let tree = ResvgTree::from_str(svg_data, &usvg_options)
            .map_err(|e| SvgImageError::SvgParseError(format!("Failed to parse SVG: {:?}", e)))?;
        Ok(SvgImageRenderer {
            tree,
            target_width,
            target_height,
            threshold: 128,
        })
    }

    /// Bytes needed by `render_to_buffer`
    pub fn buffer_len(&self) -> usize {
        self.target_height as usize * ((self.target_width + 7) / 8) as usize
    }

    /// Renders the SVG into `buffer` as 1-bit ink.
    ///
    /// A pixel is inked when it is opaque and darker than the threshold, the
    /// usual black-on-transparent icon artwork lands as black on the panel.
    pub fn render_to_buffer(&self, buffer: &mut [u8]) -> Result<(), SvgImageError> {
        let padded_width = (self.target_width + 7) / 8;
        let buffer_len_needed = self.buffer_len();
        if buffer.len() < buffer_len_needed {
            error!(
                "Buffer too small. Needed: {} bytes, Got: {} bytes",
                buffer_len_needed,
                buffer.len()
            );
            return Err(SvgImageError::BufferTooSmall);
        }

        buffer.fill(0);

        let mut pixmap = Pixmap::new(self.target_width, self.target_height)
            .ok_or_else(|| SvgImageError::PixmapCreationError("Failed to create pixmap".to_string()))?;

        let svg_size = self.tree.size();
        let scale_x = self.target_width as f32 / svg_size.width();
        let scale_y = self.target_height as f32 / svg_size.height();
        let transform = Transform::from_scale(scale_x, scale_y);

        render(&self.tree, transform, &mut pixmap.as_mut());

        let threshold = self.threshold;
        pixmap
            .pixels()
            .chunks(self.target_width as usize)
            .take(self.target_height as usize)
            .enumerate()
            .for_each(|(y, row)| {
                row.iter().enumerate().for_each(|(x, p)| {
                    // premultiplied, so only trust colour on opaque pixels
                    let luminance = 0.299 * p.red() as f32 + 0.587 * p.green() as f32 + 0.114 * p.blue() as f32;
                    if p.alpha() > threshold && luminance < threshold as f32 {
                        let byte_idx = y * padded_width as usize + (x / 8);
                        buffer[byte_idx] |= 1 << (7 - (x % 8));
                    }
                });
            });

        debug!("SVG rendered to {}x{} buffer", self.target_width, self.target_height);
        Ok(())
    }
}
