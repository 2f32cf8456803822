// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async client for the label analysis service.
//
// One operation: POST `<base_url>/api/analyze` with a multipart body holding
// a single `image` part. A 2xx response carries a flat JSON object of
// extracted fields; anything else is an error, optionally described by an
// `{"error": "..."}` body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, instrument, warn};

use mediscan_core::config::AnalysisConfig;
use mediscan_core::error::{MediscanError, Result};
use mediscan_core::types::{AnalysisResult, UploadImage};

use crate::response::{parse_result, rejection_message};

/// Multipart field name the service reads the image from.
pub const IMAGE_FIELD: &str = "image";

/// Anything that can turn an image into extracted fields.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, image: UploadImage) -> Result<AnalysisResult>;
}

/// HTTP implementation of [`Analyzer`].
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl AnalysisClient {
    /// Build a client for the configured service.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let raw = config.endpoint();
        let endpoint = Url::parse(&raw)
            .map_err(|e| MediscanError::Config(format!("invalid analysis URL '{raw}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MediscanError::Config(format!("could not build HTTP client: {e}")))?;
        Ok(Self { http, endpoint })
    }

    /// The analyze URL this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload one image and return the fields the service extracted.
    ///
    /// Errors:
    /// * `ConnectionFailed`: unreachable host, DNS failure, timeout, or the
    ///   body could not be read.
    /// * `ServerRejected`: non-2xx status.
    /// * `MalformedResponse`: 2xx whose body is not a flat JSON object.
    #[instrument(
        skip(self, image),
        fields(endpoint = %self.endpoint, filename = %image.filename, bytes = image.bytes.len())
    )]
    pub async fn analyze(&self, image: UploadImage) -> Result<AnalysisResult> {
        let part = Part::bytes(image.bytes)
            .file_name(image.filename)
            .mime_str(&image.media_type)
            .map_err(|_| MediscanError::InvalidFileType(image.media_type.clone()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        debug!("sending analysis request");
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), connect = e.is_connect(), "analysis request failed");
                MediscanError::ConnectionFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| MediscanError::ConnectionFailed(format!("reading response body: {e}")))?;

        if !status.is_success() {
            let message = rejection_message(status.as_u16(), &body);
            error!(status = status.as_u16(), %message, "analysis rejected");
            return Err(MediscanError::ServerRejected {
                status: status.as_u16(),
                message,
            });
        }

        let result = parse_result(&body)?;
        info!(fields = result.len(), "analysis complete");
        Ok(result)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, image: UploadImage) -> Result<AnalysisResult> {
        AnalysisClient::analyze(self, image).await
    }
}
