// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File input adapter: validates a picked file and turns it into a
// previewable image artifact.

use std::path::Path;

use mediscan_core::error::{MediscanError, Result};
use mediscan_core::types::{ImageType, OCTET_STREAM, SourceKind, is_image_media_type};
use tracing::{info, warn};

use crate::artifact::ImageArtifact;
use crate::preview::PreviewRegistry;

/// A file chosen by the user, with its declared media type.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Read a file from disk, declaring its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageType::from_extension)
            .map_or(OCTET_STREAM, |t| t.mime_type())
            .to_string();
        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }
}

/// Accept `file` if its declared media type is `image/*`.
///
/// On success the bytes are registered for preview and returned as an
/// upload artifact; otherwise fails with `InvalidFileType`.
pub fn select_file(file: PickedFile, previews: &PreviewRegistry) -> Result<ImageArtifact> {
    if !is_image_media_type(&file.media_type) {
        warn!(name = %file.name, media_type = %file.media_type, "rejected non-image file");
        return Err(MediscanError::InvalidFileType(file.media_type));
    }
    info!(name = %file.name, media_type = %file.media_type, bytes = file.bytes.len(), "image selected");
    Ok(ImageArtifact::new(
        SourceKind::Upload,
        file.name,
        file.media_type,
        file.bytes,
        previews,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_infers_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("photo.PNG");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&png, b"\x89PNG").unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        let picked = PickedFile::from_path(&png).unwrap();
        assert_eq!(picked.name, "photo.PNG");
        assert_eq!(picked.media_type, "image/png");

        assert_eq!(PickedFile::from_path(&txt).unwrap().media_type, OCTET_STREAM);
    }

    #[test]
    fn select_rejects_non_images_without_registering() {
        let registry = PreviewRegistry::new();
        let file = PickedFile {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
            bytes: b"hello".to_vec(),
        };
        let err = select_file(file, &registry).unwrap_err();
        assert!(matches!(err, MediscanError::InvalidFileType(ref t) if t == "text/plain"));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn select_accepts_images() {
        let registry = PreviewRegistry::new();
        let file = PickedFile {
            name: "photo.png".into(),
            media_type: "image/png".into(),
            bytes: vec![0; 4],
        };
        let artifact = select_file(file, &registry).unwrap();
        assert_eq!(artifact.source(), SourceKind::Upload);
        assert_eq!(artifact.filename(), "photo.png");
        assert_eq!(registry.live_count(), 1);
    }
}
