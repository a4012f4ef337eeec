//! Emotion detection client
//!
//! Sends the canonical image as a multipart upload (`file` field) to
//! `POST /detect-emotion` and validates the answer.

use super::{describe_transport_error, endpoint, http_client};
use crate::error::CaptureError;
use crate::models::CapturedImage;
use async_trait::async_trait;
use emotune_common::api::{paths, DetectEmotionResponse, ErrorBody};
use emotune_common::{Emotion, EmotionResult};
use reqwest::multipart;
use std::time::Duration;

/// Anything that can turn an image into an emotion
#[async_trait]
pub trait EmotionAnalyzer: Send + Sync {
    /// `Ok(None)` means the service answered but classified nothing
    async fn analyze(&self, image: &CapturedImage) -> Result<Option<EmotionResult>, CaptureError>;
}

/// HTTP client for the detection endpoint
pub struct AnalysisClient {
    http_client: reqwest::Client,
    url: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CaptureError> {
        let http_client =
            http_client(timeout).map_err(|e| CaptureError::NetworkError(e.to_string()))?;
        Ok(Self {
            http_client,
            url: endpoint(base_url, paths::DETECT_EMOTION),
        })
    }

    /// Upload one image and return the validated result
    pub async fn submit(&self, image: &CapturedImage) -> Result<Option<EmotionResult>, CaptureError> {
        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.filename().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| CaptureError::UnsupportedType(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(
            url = %self.url,
            filename = image.filename(),
            bytes = image.len(),
            "Submitting image for emotion detection"
        );

        let response = self
            .http_client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CaptureError::NetworkError(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = ErrorBody::parse(&body)
                .message()
                .unwrap_or_else(|| body.trim().to_string());
            return Err(CaptureError::NetworkError(format!(
                "detect-emotion returned {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let body: DetectEmotionResponse = response
            .json()
            .await
            .map_err(|e| CaptureError::InvalidResponse(e.to_string()))?;

        Self::interpret(body)
    }

    /// Validate a detection response
    ///
    /// Null or blank label → `Ok(None)`. Unknown label, or a missing or
    /// out-of-range confidence → `InvalidResponse`.
    pub fn interpret(body: DetectEmotionResponse) -> Result<Option<EmotionResult>, CaptureError> {
        let label = match body.emotion.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(label) => label,
        };
        let emotion: Emotion = label
            .parse()
            .map_err(|e: emotune_common::Error| CaptureError::InvalidResponse(e.to_string()))?;
        let confidence = body.confidence.ok_or_else(|| {
            CaptureError::InvalidResponse(format!("no confidence for label {:?}", label))
        })?;
        EmotionResult::new(emotion, confidence)
            .map(Some)
            .map_err(|e| CaptureError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl EmotionAnalyzer for AnalysisClient {
    async fn analyze(&self, image: &CapturedImage) -> Result<Option<EmotionResult>, CaptureError> {
        self.submit(image).await
    }
}
