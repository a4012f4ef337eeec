//! Recommendation client
//!
//! `GET /recommendations?emotion=<label>&language=<name>` returns a ranked
//! song list; the order is kept exactly as received.

use super::{describe_transport_error, endpoint, http_client};
use crate::error::CaptureError;
use crate::models::{normalize_recommendations, Recommendation};
use async_trait::async_trait;
use emotune_common::api::{paths, ErrorBody, RecommendationItem};
use emotune_common::{Emotion, Language};
use std::time::Duration;

/// Anything that can rank songs for an emotion
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch(
        &self,
        emotion: Emotion,
        language: Language,
    ) -> Result<Vec<Recommendation>, CaptureError>;
}

/// HTTP client for the recommendation endpoint
pub struct RecommendationClient {
    http_client: reqwest::Client,
    url: String,
}

impl RecommendationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CaptureError> {
        let http_client =
            http_client(timeout).map_err(|e| CaptureError::NetworkError(e.to_string()))?;
        Ok(Self {
            http_client,
            url: endpoint(base_url, paths::RECOMMENDATIONS),
        })
    }
}

#[async_trait]
impl RecommendationSource for RecommendationClient {
    async fn fetch(
        &self,
        emotion: Emotion,
        language: Language,
    ) -> Result<Vec<Recommendation>, CaptureError> {
        let params = [("emotion", emotion.as_str()), ("language", language.as_str())];

        tracing::debug!(
            emotion = %emotion,
            language = %language,
            "Fetching recommendations"
        );

        let response = self
            .http_client
            .get(&self.url)
            .query(&params)
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
                "recommendations returned {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let items: Vec<RecommendationItem> = response
            .json()
            .await
            .map_err(|e| CaptureError::InvalidResponse(e.to_string()))?;

        let songs = normalize_recommendations(items);
        tracing::info!(
            emotion = %emotion,
            language = %language,
            count = songs.len(),
            "Recommendations received"
        );
        Ok(songs)
    }
}
