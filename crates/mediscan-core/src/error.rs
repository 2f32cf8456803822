// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for MediScan.

use thiserror::Error;

use crate::types::SourceKind;

/// Top-level error type for all MediScan operations.
///
/// Every variant is recoverable: the controller turns it into a status
/// message and stays responsive.
#[derive(Debug, Error)]
pub enum MediscanError {
    // -- Camera --
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("no camera found: {0}")]
    NoDeviceFound(String),

    #[error("camera capture is not supported in this environment")]
    UnsupportedEnvironment,

    #[error("camera has not produced a frame yet")]
    NotReady,

    // -- File input --
    #[error("not an image file (declared type: {0})")]
    InvalidFileType(String),

    // -- Analysis endpoint --
    #[error("could not reach analysis service: {0}")]
    ConnectionFailed(String),

    #[error("analysis service rejected the request (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error("malformed analysis response: {0}")]
    MalformedResponse(String),

    // -- Controller --
    #[error("cannot {action} while {state}")]
    InvalidTransition { state: &'static str, action: &'static str },

    #[error("no image to analyze")]
    NoImage,

    #[error("{0} input is disabled in this configuration")]
    SourceDisabled(SourceKind),

    // -- Imaging --
    #[error("image encoding failed: {0}")]
    ImageEncoding(String),

    // -- Configuration / IO --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MediscanError>;
