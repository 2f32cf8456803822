// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera session ownership and frame capture.
//
// A `CaptureSession` exclusively owns one stream and stops all of its tracks
// when released or dropped, whichever comes first.

use chrono::{DateTime, Utc};
use mediscan_core::error::{MediscanError, Result};
use mediscan_imaging::RasterSurface;
use tracing::{debug, info};

use crate::traits::MediaStream;

/// Stop every track of `stream`. Safe on `None` and on streams that were
/// already stopped.
pub fn release(stream: Option<&mut dyn MediaStream>) {
    let Some(stream) = stream else {
        return;
    };
    let live = stream.live_track_count();
    if live > 0 {
        stream.stop_all_tracks();
        info!(stream = stream.id(), tracks = live, "camera stream released");
    } else {
        debug!(stream = stream.id(), "camera stream already released");
    }
}

/// Draw the stream's current frame into `surface` (resized to the frame's
/// native dimensions) and encode it as PNG.
///
/// Fails with `NotReady` if the stream is stopped or has not produced a
/// frame yet.
pub fn capture_frame(stream: &dyn MediaStream, surface: &mut RasterSurface) -> Result<Vec<u8>> {
    if stream.live_track_count() == 0 {
        return Err(MediscanError::NotReady);
    }
    let frame = stream.current_frame().ok_or(MediscanError::NotReady)?;
    let png = surface.rasterize(&frame)?;
    info!(
        stream = stream.id(),
        width = frame.width(),
        height = frame.height(),
        bytes = png.len(),
        "frame captured"
    );
    Ok(png)
}

/// One camera interaction: the stream plus when it started.
pub struct CaptureSession {
    stream: Option<Box<dyn MediaStream>>,
    started_at: DateTime<Utc>,
}

impl CaptureSession {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            stream: Some(stream),
            started_at: Utc::now(),
        }
    }

    /// The stream, while it has not been released.
    pub fn stream(&self) -> Option<&dyn MediaStream> {
        self.stream.as_deref()
    }

    /// Whether the session still holds a stream with running tracks.
    pub fn is_live(&self) -> bool {
        self.stream
            .as_deref()
            .is_some_and(|stream| stream.live_track_count() > 0)
    }

    /// Capture the current frame; see [`capture_frame`].
    pub fn capture(&self, surface: &mut RasterSurface) -> Result<Vec<u8>> {
        let stream = self.stream.as_deref().ok_or(MediscanError::NotReady)?;
        capture_frame(stream, surface)
    }

    /// Stop all tracks and give up the stream. Idempotent.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            release(Some(&mut *stream));
            let open_ms = (Utc::now() - self.started_at).num_milliseconds();
            debug!(stream = stream.id(), open_ms, "capture session closed");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("stream", &self.stream.as_deref().map(|s| s.id()))
            .field("started_at", &self.started_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticCamera;
    use crate::traits::{CameraConstraints, NativeCamera};

    #[tokio::test]
    async fn release_is_idempotent() {
        let camera = SyntheticCamera::new();
        let mut stream = camera.acquire(&CameraConstraints::default()).await.unwrap();
        assert_eq!(camera.live_tracks(), 1);

        release(Some(&mut *stream));
        release(Some(&mut *stream));
        release(None);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn dropping_session_stops_tracks() {
        let camera = SyntheticCamera::new();
        let stream = camera.acquire(&CameraConstraints::default()).await.unwrap();
        let session = CaptureSession::new(stream);
        assert!(session.is_live());

        drop(session);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn capture_uses_native_frame_size() {
        let camera = SyntheticCamera::new();
        let constraints = CameraConstraints {
            width: 64,
            height: 48,
            ..Default::default()
        };
        let session = CaptureSession::new(camera.acquire(&constraints).await.unwrap());

        let mut surface = RasterSurface::new();
        let png = session.capture(&mut surface).unwrap();
        assert_eq!(surface.dimensions(), (64, 48));
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[tokio::test]
    async fn capture_before_first_frame_is_not_ready() {
        let camera = SyntheticCamera::new().without_frames();
        let session = CaptureSession::new(camera.acquire(&CameraConstraints::default()).await.unwrap());

        let err = session.capture(&mut RasterSurface::new()).unwrap_err();
        assert!(matches!(err, MediscanError::NotReady));
    }

    #[tokio::test]
    async fn capture_after_release_is_not_ready() {
        let camera = SyntheticCamera::new();
        let mut session = CaptureSession::new(camera.acquire(&CameraConstraints::default()).await.unwrap());
        session.release();
        session.release();

        assert!(!session.is_live());
        assert!(matches!(
            session.capture(&mut RasterSurface::new()),
            Err(MediscanError::NotReady)
        ));
    }
}
