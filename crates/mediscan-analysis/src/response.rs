// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsing of analysis service response bodies.

use serde::Deserialize;
use serde_json::Value;

use mediscan_core::error::{MediscanError, Result};
use mediscan_core::types::AnalysisResult;

/// Shape of an error body: `{ "error": "<message>" }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Parse a success body as a flat object of fields.
///
/// Strings are kept as-is, numbers and booleans keep their JSON text, and
/// `null` fields are dropped. Anything else is malformed.
pub fn parse_result(body: &[u8]) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| MediscanError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(MediscanError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            )));
        }
    };

    let mut result = AnalysisResult::new();
    for (key, value) in map {
        match value {
            Value::String(s) => result.insert(key, s),
            Value::Number(n) => result.insert(key, n.to_string()),
            Value::Bool(b) => result.insert(key, b.to_string()),
            Value::Null => {}
            other => {
                return Err(MediscanError::MalformedResponse(format!(
                    "field '{key}' is {}, expected a string",
                    kind_of(&other)
                )));
            }
        }
    }
    Ok(result)
}

/// Message for a non-success status: the body's `error` field when it has
/// one, otherwise `HTTP <status>`.
pub fn rejection_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
