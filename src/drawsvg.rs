/*
 *  drawsvg.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Icon store backed by a directory of SVG artwork
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
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use crate::glyphs::Bitmap;
use crate::svgimage::SvgImageRenderer;
use crate::weather_glyph::{IconError, IconId, IconStore};

/// Rasterize one SVG file to a packed bitmap of the given size.
pub fn get_svg(path: &Path, width: u32, height: u32) -> Result<Bitmap, IconError> {
    if fs::metadata(path).is_err() {
        warn!("{} doesn't exist!", path.display());
        return Err(IconError::NotFound(path.display().to_string()));
    }

    let data = fs::read_to_string(path)?;
    let svg_renderer = SvgImageRenderer::new(&data, width, height)
        .map_err(|e| IconError::Decode(e.to_string()))?;
    let mut buffer = vec![0u8; svg_renderer.buffer_len()];
    svg_renderer
        .render_to_buffer(&mut buffer)
        .map_err(|e| IconError::Decode(e.to_string()))?;

    Bitmap::from_packed(width, height, buffer)
        .ok_or_else(|| IconError::Decode(format!("{}: unexpected buffer size", path.display())))
}

/// Loads `<dir>/<icon name>.svg` at the nominal icon size
#[derive(Debug, Clone)]
pub struct SvgIconStore {
    dir: PathBuf,
    size: u32,
}

impl SvgIconStore {
    pub fn new(dir: impl Into<PathBuf>, size: u32) -> Self {
        Self { dir: dir.into(), size }
    }

    pub fn path_for(&self, id: IconId) -> PathBuf {
        self.dir.join(format!("{}.svg", id.name()))
    }
}

impl IconStore for SvgIconStore {
    fn get(&self, id: IconId) -> Result<Bitmap, IconError> {
        get_svg(&self.path_for(id), self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SvgIconStore::new(dir.path(), 64);
        assert!(matches!(store.get(IconId::Snow), Err(IconError::NotFound(_))));
    }

    #[test]
    fn test_loads_named_icon() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("rain.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"><circle cx="8" cy="8" r="6" fill="#000"/></svg>"##,
        ).unwrap();

        let store = SvgIconStore::new(dir.path(), 32);
        let bmp = store.get(IconId::Rain).unwrap();
        assert_eq!((bmp.width(), bmp.height()), (32, 32));
        assert!(bmp.ink_count() > 0);
        assert!(bmp.get(16, 16));
        assert!(!bmp.get(0, 0));
    }

    #[test]
    fn test_broken_svg_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fog.svg"), "<svg").unwrap();
        let store = SvgIconStore::new(dir.path(), 32);
        assert!(matches!(store.get(IconId::Fog), Err(IconError::Decode(_))));
    }
}
