// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! MediScan: platform bridge abstractions.
//!
//! Defines the camera and file-picker traits the controller drives, the
//! scoped resources it owns (camera sessions, preview handles, image
//! artifacts), and the desktop implementation.

pub mod artifact;
pub mod capture;
pub mod desktop;
pub mod file_input;
pub mod preview;
pub mod synthetic;
pub mod traits;

use std::sync::Arc;

use mediscan_core::config::CaptureConfig;

pub use artifact::ImageArtifact;
pub use capture::{CaptureSession, capture_frame, release};
pub use file_input::{PickedFile, select_file};
pub use preview::{PreviewHandle, PreviewRegistry, release_preview};
pub use synthetic::{CameraFailure, SyntheticCamera};
pub use traits::{CameraConstraints, FacingMode, MediaStream, NativeCamera, NativeFilePicker, PlatformBridge};

/// Build the bridge for the platform this binary runs on.
///
/// Desktop builds have no native camera API; the synthetic test-pattern
/// camera stands in when the configuration asks for it.
pub fn platform_bridge(config: &CaptureConfig) -> Arc<dyn PlatformBridge> {
    let camera = config.synthetic_camera.then(SyntheticCamera::new);
    Arc::new(desktop::DesktopBridge::new(camera))
}
