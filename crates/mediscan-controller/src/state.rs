// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// View states and the actions each one permits.

use mediscan_core::types::AnalysisResult;

use crate::ticket::RequestId;

/// The screen the user is on. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Home screen with "Take Photo" and "Upload" options.
    Splash,
    /// Camera requested or live.
    Capturing,
    /// A captured photo is shown, waiting for "Scan & Analyze".
    Reviewing,
    /// Request `request` is in flight.
    AnalysisPending { request: RequestId },
    /// The last request failed; the image is kept for a retry.
    AnalysisError { message: String },
    /// Fields came back.
    AnalysisComplete { result: AnalysisResult },
    /// User acknowledged the result.
    Confirmed,
}

/// User-triggered operations on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartCamera,
    Shutter,
    Back,
    SelectFile,
    Analyze,
    Confirm,
}

impl Action {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::StartCamera => "start the camera",
            Self::Shutter => "take a photo",
            Self::Back => "go back",
            Self::SelectFile => "select a file",
            Self::Analyze => "analyze",
            Self::Confirm => "confirm",
        }
    }
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Splash => "Splash",
            Self::Capturing => "Capturing",
            Self::Reviewing => "Reviewing",
            Self::AnalysisPending { .. } => "AnalysisPending",
            Self::AnalysisError { .. } => "AnalysisError",
            Self::AnalysisComplete { .. } => "AnalysisComplete",
            Self::Confirmed => "Confirmed",
        }
    }

    /// Whether `action` may be taken from this state.
    pub fn permits(&self, action: Action) -> bool {
        use Action::*;
        match self {
            Self::Splash => matches!(action, StartCamera | SelectFile | Analyze),
            Self::Capturing => matches!(action, StartCamera | Shutter | Back | SelectFile),
            Self::Reviewing => matches!(action, StartCamera | Back | SelectFile | Analyze),
            Self::AnalysisPending { .. } => matches!(action, SelectFile),
            Self::AnalysisError { .. } => matches!(action, StartCamera | SelectFile | Analyze),
            Self::AnalysisComplete { .. } => matches!(action, SelectFile | Confirm),
            // Only `reset` leaves.
            Self::Confirmed => false,
        }
    }
}
