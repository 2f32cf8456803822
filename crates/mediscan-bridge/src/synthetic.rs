// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic camera: a colour-bar test pattern behind the `NativeCamera`
// trait. Used on desktop builds without a camera API and to drive the
// controller in tests. It counts live tracks across every stream it hands
// out, so leaked streams are observable.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;
use mediscan_core::config::MAX_CAPTURE_DIMENSION;
use mediscan_core::error::{MediscanError, Result};
use mediscan_imaging::{RgbaFrame, rgba_len};
use tracing::{info, warn};
use uuid::Uuid;

use crate::traits::{CameraConstraints, MediaStream, NativeCamera};

const BARS: [[u8; 4]; 7] = [
    [192, 192, 192, 255],
    [192, 192, 0, 255],
    [0, 192, 192, 255],
    [0, 192, 0, 255],
    [192, 0, 192, 255],
    [192, 0, 0, 255],
    [0, 0, 192, 255],
];

/// How an acquire attempt should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFailure {
    PermissionDenied,
    NoDevice,
    Unsupported,
}

impl CameraFailure {
    fn to_error(self) -> MediscanError {
        match self {
            Self::PermissionDenied => MediscanError::PermissionDenied("NotAllowedError".into()),
            Self::NoDevice => MediscanError::NoDeviceFound("NotFoundError".into()),
            Self::Unsupported => MediscanError::UnsupportedEnvironment,
        }
    }
}

/// Test-pattern camera. Clones share their counters.
#[derive(Debug, Clone, Default)]
pub struct SyntheticCamera {
    failure: Option<CameraFailure>,
    withhold_frames: bool,
    live_tracks: Arc<AtomicUsize>,
    acquisitions: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every acquire fails with `failure`.
    pub fn failing_with(mut self, failure: CameraFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Streams never produce a frame.
    pub fn without_frames(mut self) -> Self {
        self.withhold_frames = true;
        self
    }

    /// Tracks not yet stopped, across all streams from this camera.
    pub fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }

    /// Successful acquires so far.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NativeCamera for SyntheticCamera {
    async fn acquire(&self, constraints: &CameraConstraints) -> Result<Box<dyn MediaStream>> {
        if let Some(failure) = self.failure {
            warn!(?failure, "synthetic camera refusing acquire");
            return Err(failure.to_error());
        }
        let out_of_range = |d: u32| d == 0 || d > MAX_CAPTURE_DIMENSION;
        if out_of_range(constraints.width) || out_of_range(constraints.height) {
            return Err(MediscanError::NoDeviceFound(format!(
                "no mode matches {}x{}",
                constraints.width, constraints.height
            )));
        }

        self.live_tracks.fetch_add(1, Ordering::SeqCst);
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        let stream = SyntheticStream {
            id: Uuid::new_v4().to_string(),
            width: constraints.width,
            height: constraints.height,
            live: true,
            produce_frames: !self.withhold_frames,
            tick: AtomicU32::new(0),
            live_tracks: Arc::clone(&self.live_tracks),
        };
        info!(
            stream = %stream.id,
            width = stream.width,
            height = stream.height,
            facing = ?constraints.facing,
            "synthetic camera stream started"
        );
        Ok(Box::new(stream))
    }
}

/// Single-track stream producing scrolling colour bars.
struct SyntheticStream {
    id: String,
    width: u32,
    height: u32,
    live: bool,
    produce_frames: bool,
    tick: AtomicU32,
    live_tracks: Arc<AtomicUsize>,
}

impl MediaStream for SyntheticStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn live_track_count(&self) -> usize {
        usize::from(self.live)
    }

    fn stop_all_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.live_tracks.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn current_frame(&self) -> Option<RgbaFrame> {
        if !self.live || !self.produce_frames {
            return None;
        }
        let shift = self.tick.fetch_add(1, Ordering::Relaxed);
        let bar_width = (self.width / BARS.len() as u32).max(1);
        let mut pixels = Vec::with_capacity(rgba_len(self.width, self.height).ok()?);
        for _y in 0..self.height {
            for x in 0..self.width {
                let bar = ((x.wrapping_add(shift)) / bar_width) as usize % BARS.len();
                pixels.extend_from_slice(&BARS[bar]);
            }
        }
        RgbaFrame::new(self.width, self.height, pixels).ok()
    }
}
