// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Offscreen raster surface. A camera frame is drawn into the surface at the
// frame's native size and then encoded as a self-contained PNG.

use image::{ImageFormat, RgbaImage};
use mediscan_core::error::{MediscanError, Result};
use tracing::{debug, instrument};

/// One uncompressed video frame, 8-bit RGBA, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Bytes needed for a `width` x `height` RGBA frame, or `ImageEncoding` if
/// that does not fit in memory addresses.
pub fn rgba_len(width: u32, height: u32) -> Result<usize> {
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| MediscanError::ImageEncoding(format!("frame {width}x{height} is too large")))
}

impl RgbaFrame {
    /// Wrap raw pixels. The buffer must hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = rgba_len(width, height)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(MediscanError::ImageEncoding(format!(
                "frame {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// A frame filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = rgba_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Reusable drawing target. Starts empty and is resized to whatever frame is
/// drawn into it.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas: RgbaImage,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Resize to the frame's native dimensions and copy its pixels in.
    pub fn draw(&mut self, frame: &RgbaFrame) {
        if self.canvas.dimensions() != (frame.width, frame.height) {
            debug!(width = frame.width, height = frame.height, "resizing raster surface");
            self.canvas = RgbaImage::new(frame.width, frame.height);
        }
        self.canvas.copy_from_slice(&frame.pixels);
    }

    /// Encode the surface contents as PNG bytes.
    #[instrument(skip(self), fields(width = self.canvas.width(), height = self.canvas.height()))]
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        if self.canvas.width() == 0 || self.canvas.height() == 0 {
            return Err(MediscanError::ImageEncoding("nothing has been drawn".into()));
        }
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.canvas
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| MediscanError::ImageEncoding(format!("PNG encoding failed: {err}")))?;
        debug!(bytes = buffer.len(), "frame encoded");
        Ok(buffer)
    }

    /// Draw then encode in one step.
    pub fn rasterize(&mut self, frame: &RgbaFrame) -> Result<Vec<u8>> {
        self.draw(frame);
        self.encode_png()
    }
}
