// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MediScan Controller: owns the view state and every resource attached to
// it (camera session, image artifact, in-flight request ids), and performs
// the transitions between the splash, camera, review, analysis and confirm
// screens.

pub mod controller;
pub mod state;
pub mod ticket;

pub use controller::ViewController;
pub use state::{Action, ViewState};
pub use ticket::{AcquireOutcome, AcquireTicket, AnalysisOutcome, AnalysisRequest, RequestId};
