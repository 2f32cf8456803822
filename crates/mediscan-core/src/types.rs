// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for MediScan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where the image under review came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Rasterized from a live camera frame.
    Camera,
    /// Picked from local storage.
    Upload,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Camera => f.write_str("camera"),
            Self::Upload => f.write_str("upload"),
        }
    }
}

/// Which capture sources the controller offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSources {
    Camera,
    Upload,
    Both,
}

impl CaptureSources {
    pub fn allows(&self, source: SourceKind) -> bool {
        matches!(
            (self, source),
            (Self::Both, _) | (Self::Camera, SourceKind::Camera) | (Self::Upload, SourceKind::Upload)
        )
    }
}

/// Image formats the file picker recognises by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    Tiff,
    Heic,
}

impl ImageType {
    /// MIME type sent as the part's Content-Type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Tiff => "image/tiff",
            Self::Heic => "image/heic",
        }
    }

    /// Infer image type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::Webp),
            "tif" | "tiff" => Some(Self::Tiff),
            "heic" | "heif" => Some(Self::Heic),
            _ => None,
        }
    }
}

/// Fallback declared type for files whose extension we do not recognise.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// True if a declared media type names an image (`image/*`).
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Payload handed to the analysis service.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub media_type: String,
}

/// Known result keys with their display labels, in display order.
const FIELD_LABELS: &[(&str, &str)] = &[
    ("medication_name", "Medication Name"),
    ("dosage_strength", "Dosage / Strength"),
    ("directions", "Directions for Use"),
    ("frequency", "Frequency"),
];

/// Display label for a result key, falling back to the key itself.
pub fn field_label(key: &str) -> &str {
    FIELD_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// One row of the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Fields extracted by the analysis service.
///
/// Keys are not fixed; whatever the service returns is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    fields: BTreeMap<String, String>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rows for the result panel: known keys first in their canonical
    /// order, then everything else in key order.
    pub fn display_fields(&self) -> Vec<ResultField> {
        let known = FIELD_LABELS
            .iter()
            .filter_map(|(key, _)| self.fields.get_key_value(*key));
        let unknown = self
            .fields
            .iter()
            .filter(|(key, _)| !FIELD_LABELS.iter().any(|(k, _)| k == key));

        known
            .chain(unknown)
            .map(|(key, value)| ResultField {
                key: key.clone(),
                label: field_label(key).to_string(),
                value: value.clone(),
            })
            .collect()
    }
}
