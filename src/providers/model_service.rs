//! HTTP client for the sentiment model service.
//!
//! Endpoints used:
//! - `POST {base}/analyze` with `{"review": ...}` → `{"sentiment": bool, "confidence"?: number}`
//! - `GET {base}/version` → `{"model_version": ..., "service_version"?: ...}`
//! - `POST {base}/feedback` with `{"review_id": ..., "correct_sentiment": bool}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use super::traits::ModelService;
use crate::types::{ModelServiceVersion, Prediction};
use crate::variant::MODEL_VARIANT_HEADER;
use crate::{HuginnError, Result, Variant};

/// Default base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default timeout for `/analyze`.
pub const DEFAULT_ANALYZE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for `/version` and `/feedback`.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the model service.
///
/// Every request carries its own timeout; a request that times out is
/// dropped and reported as `ServiceUnavailable`.
#[derive(Clone)]
pub struct ModelServiceClient {
    http: Client,
    base_url: String,
    analyze_timeout: Duration,
    lookup_timeout: Duration,
}

impl ModelServiceClient {
    /// Create a client for the given base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Create a client that shares an existing HTTP connection pool.
    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            analyze_timeout: DEFAULT_ANALYZE_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Set the timeout for analyze calls.
    pub fn analyze_timeout(mut self, timeout: Duration) -> Self {
        self.analyze_timeout = timeout;
        self
    }

    /// Set the timeout for version and feedback calls.
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Map a non-success status to `Upstream`.
    fn check_status(response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(HuginnError::Upstream {
            status: status.as_u16(),
            message: format!("model service returned {status}"),
        })
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    review: &'a str,
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    review_id: &'a str,
    correct_sentiment: bool,
}

#[async_trait]
impl ModelService for ModelServiceClient {
    fn name(&self) -> &str {
        "model-service"
    }

    #[instrument(name = "model_service.analyze", skip(self, review), fields(%variant))]
    async fn analyze(&self, review: &str, variant: Variant) -> Result<Prediction> {
        let response = self
            .http
            .post(self.url("analyze"))
            .header(MODEL_VARIANT_HEADER, variant.as_str())
            .timeout(self.analyze_timeout)
            .json(&AnalyzeRequest { review })
            .send()
            .await?;

        Self::check_status(&response)?;

        let prediction: Prediction = response.json().await?;
        debug!(sentiment = prediction.sentiment, confidence = ?prediction.confidence, "model prediction");
        Ok(prediction)
    }

    #[instrument(name = "model_service.version", skip(self))]
    async fn version(&self) -> Result<ModelServiceVersion> {
        let response = self
            .http
            .get(self.url("version"))
            .timeout(self.lookup_timeout)
            .send()
            .await?;

        Self::check_status(&response)?;
        Ok(response.json().await?)
    }

    #[instrument(name = "model_service.feedback", skip(self))]
    async fn submit_feedback(&self, review_id: &str, correct: bool) -> Result<()> {
        let response = self
            .http
            .post(self.url("feedback"))
            .timeout(self.lookup_timeout)
            .json(&FeedbackRequest {
                review_id,
                correct_sentiment: correct,
            })
            .send()
            .await?;

        Self::check_status(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ModelServiceClient::new("http://model:5000/");
        assert_eq!(client.base_url(), "http://model:5000");
        assert_eq!(client.url("analyze"), "http://model:5000/analyze");
    }
}
