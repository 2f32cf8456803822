// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MediScan Analysis: the client side of the label analysis service: one
// multipart upload per image, returning the extracted fields.

pub mod client;
pub mod response;

pub use client::{AnalysisClient, Analyzer, IMAGE_FIELD};
