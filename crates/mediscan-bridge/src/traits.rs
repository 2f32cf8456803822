// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use async_trait::async_trait;
use mediscan_core::config::CaptureConfig;
use mediscan_core::error::Result;
use mediscan_imaging::RgbaFrame;

use crate::file_input::PickedFile;

/// Unified bridge grouping the native capabilities MediScan needs.
pub trait PlatformBridge: NativeCamera + NativeFilePicker {
    /// Human-readable platform name (e.g. "Desktop").
    fn platform_name(&self) -> &str;
}

/// Which way the camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera, pointed at the label ("environment").
    Environment,
    /// Front camera.
    User,
    /// Whatever the platform offers first.
    Any,
}

/// Hints passed to [`NativeCamera::acquire`]. Video only; audio is never requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    pub width: u32,
    pub height: u32,
    pub facing: FacingMode,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            facing: FacingMode::Environment,
        }
    }
}

impl From<&CaptureConfig> for CameraConstraints {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            facing: if config.prefer_rear_camera {
                FacingMode::Environment
            } else {
                FacingMode::Any
            },
        }
    }
}

/// A live camera stream made of one or more tracks.
///
/// Tracks keep the camera hardware busy until stopped; dropping the stream
/// object alone does not stop them.
pub trait MediaStream: Send {
    /// Opaque identifier, for logging.
    fn id(&self) -> &str;

    /// Number of tracks that have not been stopped.
    fn live_track_count(&self) -> usize;

    /// Stop every track. Calling this on an already-stopped stream does nothing.
    fn stop_all_tracks(&mut self);

    /// The most recent frame, or `None` before the first frame arrives.
    fn current_frame(&self) -> Option<RgbaFrame>;
}

/// Camera capability.
#[async_trait]
pub trait NativeCamera: Send + Sync {
    /// Request a video stream matching `constraints`.
    ///
    /// Fails with `PermissionDenied`, `NoDeviceFound` or
    /// `UnsupportedEnvironment`.
    async fn acquire(&self, constraints: &CameraConstraints) -> Result<Box<dyn MediaStream>>;
}

/// File picker capability.
pub trait NativeFilePicker: Send + Sync {
    /// Let the user choose a file. Returns `None` if the picker was cancelled.
    fn pick_image(&self) -> Result<Option<PickedFile>>;
}
