// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header probing for uploaded images.

use std::io::Cursor;

use image::ImageReader;
use tracing::debug;

/// Read pixel dimensions from an encoded image's header without decoding it.
///
/// Returns `None` for formats the `image` crate does not know (HEIC, for
/// instance) or for truncated data; callers treat dimensions as informational.
pub fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format().ok()?;
    match reader.into_dimensions() {
        Ok(dims) => Some(dims),
        Err(err) => {
            debug!(error = %err, "could not probe image dimensions");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterSurface, RgbaFrame};

    #[test]
    fn probes_png_header() {
        let png = RasterSurface::new()
            .rasterize(&RgbaFrame::solid(12, 7, [1, 2, 3, 255]).unwrap())
            .unwrap();
        assert_eq!(probe_dimensions(&png), Some((12, 7)));
    }

    #[test]
    fn garbage_has_no_dimensions() {
        assert_eq!(probe_dimensions(b"definitely not an image"), None);
    }
}
