// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The controller shows `message` as its status line. The shell puts the
// suggestion underneath, coloured by severity, and offers a retry only for
// retriable errors.

use crate::error::MediscanError;

/// Shown instead of raw network errors.
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the analysis service. Check your connection and try again.";

/// Shown when the service answers with something that is not a flat JSON object.
pub const MALFORMED_MESSAGE: &str = "The analysis service returned an unreadable response.";

/// Shown when a picked file is not an image.
pub const INVALID_FILE_MESSAGE: &str = "Please select a valid image file.";

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip, timeout: trying again may work.
    Transient,
    /// User must do something (grant permission, pick another file).
    ActionRequired,
    /// Retrying will not help on this device.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as the status line).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether re-triggering the same action may succeed.
    pub retriable: bool,
    /// Severity level (drives colour in the UI).
    pub severity: Severity,
}

/// Convert a `MediscanError` into a `HumanError`.
pub fn humanize_error(err: &MediscanError) -> HumanError {
    match err {
        // -- Camera --
        MediscanError::PermissionDenied(reason) | MediscanError::NoDeviceFound(reason) => {
            HumanError {
                message: format!(
                    "Could not access camera. Please check permissions. ({reason}). Returning to home."
                ),
                suggestion: if matches!(err, MediscanError::PermissionDenied(_)) {
                    "Allow camera access for MediScan in your device settings, then tap Take Photo again.".into()
                } else {
                    "Connect a camera, or upload a photo of the label instead.".into()
                },
                retriable: true,
                severity: Severity::ActionRequired,
            }
        }

        MediscanError::UnsupportedEnvironment => HumanError {
            message: "Camera access is not supported on this device.".into(),
            suggestion: "Upload a photo of the label from your gallery instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        MediscanError::NotReady => HumanError {
            message: "Camera not running or not ready yet.".into(),
            suggestion: "Wait a moment for the preview to appear, then take the photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- File input --
        MediscanError::InvalidFileType(_) => HumanError {
            message: INVALID_FILE_MESSAGE.into(),
            suggestion: "Choose a photo such as a PNG or JPEG file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Analysis --
        MediscanError::ConnectionFailed(_) => HumanError {
            message: CONNECTIVITY_MESSAGE.into(),
            suggestion: "Make sure the analysis service is running, then tap Scan & Analyze again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MediscanError::ServerRejected { message, .. } => HumanError {
            message: message.clone(),
            suggestion: "Try again with a clearer photo of the label.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MediscanError::MalformedResponse(_) => HumanError {
            message: MALFORMED_MESSAGE.into(),
            suggestion: "Try again. If this keeps happening, the service may need updating.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Controller --
        MediscanError::InvalidTransition { .. } => HumanError {
            message: "That action isn't available right now.".into(),
            suggestion: "Go back to the home screen and start again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        MediscanError::NoImage => HumanError {
            message: "There is no photo to analyze yet.".into(),
            suggestion: "Take a photo or upload one first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        MediscanError::SourceDisabled(source) => HumanError {
            message: format!("The {source} option is turned off."),
            suggestion: "Use one of the other options on the home screen.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Imaging / storage --
        MediscanError::ImageEncoding(_) => HumanError {
            message: "The photo could not be processed.".into(),
            suggestion: "Take the photo again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MediscanError::Config(detail) => HumanError {
            message: "The app settings are invalid.".into(),
            suggestion: format!("Fix or remove the config file. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        MediscanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Error reading file.".into(),
                    suggestion: "Try choosing the file again.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        MediscanError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
