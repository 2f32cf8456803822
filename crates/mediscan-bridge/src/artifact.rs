// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The single image under review.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mediscan_core::types::{SourceKind, UploadImage};
use mediscan_imaging::probe_dimensions;

use crate::preview::{PreviewHandle, PreviewRegistry};

/// Filename sent with camera captures.
pub const CAPTURE_FILENAME: &str = "capture.png";

/// An encoded image plus the preview resource that displays it.
///
/// Dropping the artifact releases its preview.
#[derive(Debug)]
pub struct ImageArtifact {
    source: SourceKind,
    filename: String,
    media_type: String,
    bytes: Arc<[u8]>,
    preview: PreviewHandle,
    captured_at: DateTime<Utc>,
    dimensions: Option<(u32, u32)>,
}

impl ImageArtifact {
    /// Register `bytes` with the preview registry and wrap them.
    pub fn new(
        source: SourceKind,
        filename: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
        previews: &PreviewRegistry,
    ) -> Self {
        let media_type = media_type.into();
        let dimensions = probe_dimensions(&bytes);
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let preview = previews.create(&media_type, Arc::clone(&bytes));
        Self {
            source,
            filename: filename.into(),
            media_type,
            bytes,
            preview,
            captured_at: Utc::now(),
            dimensions,
        }
    }

    /// A PNG captured from the camera.
    pub fn from_capture(png: Vec<u8>, previews: &PreviewRegistry) -> Self {
        Self::new(SourceKind::Camera, CAPTURE_FILENAME, "image/png", png, previews)
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// URL of the preview; valid while the artifact is alive.
    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Pixel size, when the header could be read.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Copy of the data for the analysis request.
    pub fn upload_payload(&self) -> UploadImage {
        UploadImage {
            bytes: self.bytes.to_vec(),
            filename: self.filename.clone(),
            media_type: self.media_type.clone(),
        }
    }

    /// Release the preview and discard the artifact.
    pub fn release(self) {
        self.preview.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediscan_imaging::{RasterSurface, RgbaFrame};

    #[test]
    fn capture_artifact_is_png_with_dimensions() {
        let registry = PreviewRegistry::new();
        let before = Utc::now();
        let png = RasterSurface::new()
            .rasterize(&RgbaFrame::solid(32, 24, [0, 0, 0, 255]).unwrap())
            .unwrap();
        let artifact = ImageArtifact::from_capture(png, &registry);

        assert_eq!(artifact.source(), SourceKind::Camera);
        assert_eq!(artifact.filename(), CAPTURE_FILENAME);
        assert_eq!(artifact.dimensions(), Some((32, 24)));
        assert!(artifact.captured_at() >= before);
        assert!(registry.is_live(artifact.preview_url()));

        let payload = artifact.upload_payload();
        assert_eq!(payload.media_type, "image/png");
        assert_eq!(payload.bytes, artifact.bytes());
    }

    #[test]
    fn release_frees_preview() {
        let registry = PreviewRegistry::new();
        let artifact = ImageArtifact::new(SourceKind::Upload, "a.jpg", "image/jpeg", vec![1, 2, 3], &registry);
        assert_eq!(artifact.dimensions(), None);
        assert_eq!(registry.live_count(), 1);

        artifact.release();
        assert_eq!(registry.live_count(), 0);
    }
}
