// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tickets for the two asynchronous operations the controller starts but
// does not await: camera acquisition and analysis. The caller runs the
// ticket and feeds the outcome back; the controller uses the id to drop
// outcomes that arrive after the user has moved on.

use std::fmt;

use mediscan_analysis::Analyzer;
use mediscan_bridge::{CameraConstraints, MediaStream, NativeCamera};
use mediscan_core::error::Result;
use mediscan_core::types::{AnalysisResult, UploadImage};
use tracing::debug;

/// Identifies one analysis request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub(crate) u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Permission to acquire a camera stream for the current capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTicket {
    pub(crate) seq: u64,
    constraints: CameraConstraints,
}

impl AcquireTicket {
    pub(crate) fn new(seq: u64, constraints: CameraConstraints) -> Self {
        Self { seq, constraints }
    }

    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }

    /// Wrap an acquisition result obtained some other way.
    pub fn outcome(&self, stream: Result<Box<dyn MediaStream>>) -> AcquireOutcome {
        AcquireOutcome { seq: self.seq, stream }
    }

    /// Ask `camera` for a stream.
    pub async fn run<C: NativeCamera + ?Sized>(self, camera: &C) -> AcquireOutcome {
        let stream = camera.acquire(&self.constraints).await;
        self.outcome(stream)
    }
}

/// Result of running an [`AcquireTicket`].
pub struct AcquireOutcome {
    pub(crate) seq: u64,
    pub(crate) stream: Result<Box<dyn MediaStream>>,
}

impl AcquireOutcome {
    /// Drop the outcome, stopping the stream if one was acquired.
    pub fn discard(self) {
        match self.stream {
            Ok(mut stream) => {
                debug!(ticket = self.seq, stream = stream.id(), "discarding camera stream");
                mediscan_bridge::release(Some(&mut *stream));
            }
            Err(e) => debug!(ticket = self.seq, error = %e, "discarding camera failure"),
        }
    }
}

/// One submission of the current image.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    id: RequestId,
    image: UploadImage,
}

impl AnalysisRequest {
    pub(crate) fn new(id: RequestId, image: UploadImage) -> Self {
        Self { id, image }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn image(&self) -> &UploadImage {
        &self.image
    }

    /// Wrap a result obtained some other way.
    pub fn outcome(&self, result: Result<AnalysisResult>) -> AnalysisOutcome {
        AnalysisOutcome { id: self.id, result }
    }

    /// Submit the image to `analyzer`.
    pub async fn run<A: Analyzer + ?Sized>(self, analyzer: &A) -> AnalysisOutcome {
        let Self { id, image } = self;
        let result = analyzer.analyze(image).await;
        AnalysisOutcome { id, result }
    }
}

/// Result of running an [`AnalysisRequest`].
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub id: RequestId,
    pub result: Result<AnalysisResult>,
}
