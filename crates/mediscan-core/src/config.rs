// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MediscanError, Result};
use crate::types::CaptureSources;

/// Path of the analysis route, appended to [`AnalysisConfig::base_url`].
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Largest accepted capture width or height, in pixels.
pub const MAX_CAPTURE_DIMENSION: u32 = 4096;

/// Application settings. Every section falls back to its defaults when
/// absent from the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub capture: CaptureConfig,
}

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Scheme, host and port of the service (e.g. `http://127.0.0.1:5000`).
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout_secs: 30,
        }
    }
}

impl AnalysisConfig {
    /// Full URL of the analyze endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ANALYZE_PATH)
    }
}

/// Camera and upload settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Which input sources the splash screen offers.
    pub sources: CaptureSources,
    /// Requested frame width in pixels.
    pub width: u32,
    /// Requested frame height in pixels.
    pub height: u32,
    /// Ask for the rear ("environment") camera when there is a choice.
    pub prefer_rear_camera: bool,
    /// Use the built-in test-pattern camera where no platform camera exists.
    pub synthetic_camera: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sources: CaptureSources::Both,
            width: 320,
            height: 240,
            prefer_rear_camera: true,
            synthetic_camera: false,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the rest of the app cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.analysis.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MediscanError::Config(format!(
                "analysis.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.analysis.timeout_secs == 0 {
            return Err(MediscanError::Config("analysis.timeout_secs must be > 0".into()));
        }
        let (width, height) = (self.capture.width, self.capture.height);
        if width == 0 || height == 0 {
            return Err(MediscanError::Config(format!(
                "capture resolution {width}x{height} is empty"
            )));
        }
        if width > MAX_CAPTURE_DIMENSION || height > MAX_CAPTURE_DIMENSION {
            return Err(MediscanError::Config(format!(
                "capture resolution {width}x{height} exceeds {MAX_CAPTURE_DIMENSION}x{MAX_CAPTURE_DIMENSION}"
            )));
        }
        Ok(())
    }
}
