// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mediscan-imaging: pixel-level work for MediScan.
//
// Provides the offscreen raster surface that camera frames are drawn into and
// PNG-encoded from, plus header probing for uploaded images.

pub mod probe;
pub mod raster;

pub use probe::probe_dimensions;
pub use raster::{RasterSurface, RgbaFrame, rgba_len};
