//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::{FeedbackRecorder, SentimentGateway};
use crate::metrics::MetricRegistry;
use crate::providers::{
    DEFAULT_ANALYZE_TIMEOUT, DEFAULT_BASE_URL, DEFAULT_LOOKUP_TIMEOUT, ModelService,
    ModelServiceClient,
};
use crate::store::FeedbackStore;
use crate::types::AppVersion;
use crate::{HuginnError, Result, telemetry, version};

/// Main entry point for creating gateway instances.
pub struct Huginn;

impl Huginn {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> HuginnBuilder {
        HuginnBuilder::new()
    }
}

/// Builder for configuring gateway instances.
pub struct HuginnBuilder {
    model_service_url: Option<String>,
    analyze_timeout: Duration,
    lookup_timeout: Duration,
    model_service: Option<Arc<dyn ModelService>>,
    app_version: Option<String>,
}

impl HuginnBuilder {
    pub fn new() -> Self {
        Self {
            model_service_url: None,
            analyze_timeout: DEFAULT_ANALYZE_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            model_service: None,
            app_version: None,
        }
    }

    /// Base URL of the model service (default: `http://localhost:5000`).
    pub fn model_service_url(mut self, url: impl Into<String>) -> Self {
        self.model_service_url = Some(url.into());
        self
    }

    /// Timeout for analyze calls (default: 10s).
    pub fn analyze_timeout(mut self, timeout: Duration) -> Self {
        self.analyze_timeout = timeout;
        self
    }

    /// Timeout for version and feedback calls (default: 5s).
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Use a custom model service instead of the HTTP client.
    ///
    /// Overrides `model_service_url` and the timeouts.
    pub fn model_service(mut self, service: Arc<dyn ModelService>) -> Self {
        self.model_service = Some(service);
        self
    }

    /// Version reported by `/api/version` and `app_info`
    /// (default: the crate version).
    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = Some(version.into());
        self
    }

    /// Build the gateway.
    ///
    /// Fails when the model service URL is not an `http(s)://` URL or a
    /// timeout is zero.
    pub fn build(self) -> Result<HuginnGateway> {
        if self.analyze_timeout.is_zero() || self.lookup_timeout.is_zero() {
            return Err(HuginnError::Configuration(
                "model service timeouts must be non-zero".to_string(),
            ));
        }

        let model: Arc<dyn ModelService> = match self.model_service {
            Some(service) => service,
            None => {
                let url = self
                    .model_service_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(HuginnError::Configuration(format!(
                        "model service URL must start with http:// or https://, got {url:?}"
                    )));
                }
                Arc::new(
                    ModelServiceClient::new(url)
                        .analyze_timeout(self.analyze_timeout)
                        .lookup_timeout(self.lookup_timeout),
                )
            }
        };

        let app_version = AppVersion {
            app_version: self
                .app_version
                .unwrap_or_else(|| version::PKG_VERSION.to_string()),
            build: version::build_id(),
        };

        let metrics = Arc::new(telemetry::standard_registry(&app_version.app_version));
        let store = Arc::new(FeedbackStore::new());

        Ok(HuginnGateway {
            analyze: SentimentGateway::new(
                model.clone(),
                metrics.clone(),
                store.clone(),
                app_version,
            ),
            feedback: FeedbackRecorder::new(model, metrics.clone(), store),
            metrics,
        })
    }
}

impl Default for HuginnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully wired gateway: analysis, feedback and the metric registry they
/// share.
pub struct HuginnGateway {
    analyze: SentimentGateway,
    feedback: FeedbackRecorder,
    metrics: Arc<MetricRegistry>,
}

impl HuginnGateway {
    pub fn sentiment(&self) -> &SentimentGateway {
        &self.analyze
    }

    pub fn feedback(&self) -> &FeedbackRecorder {
        &self.feedback
    }

    pub fn metrics(&self) -> &Arc<MetricRegistry> {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_succeeds() {
        let gateway = Huginn::builder().build().unwrap();
        assert!(gateway.metrics().is_registered(telemetry::SENTIMENT_RATIO));
    }

    #[test]
    fn rejects_non_http_url() {
        let result = Huginn::builder().model_service_url("model:5000").build();
        assert!(matches!(result, Err(HuginnError::Configuration(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let result = Huginn::builder().analyze_timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(HuginnError::Configuration(_))));
    }

    #[test]
    fn fresh_gateway_publishes_zero_gauges() {
        let gateway = Huginn::builder().build().unwrap();
        let metrics = gateway.metrics();
        for variant in crate::Variant::ALL {
            assert_eq!(
                metrics.gauge_value(telemetry::SENTIMENT_RATIO, &[("variant", variant.as_str())]),
                Some(0.0)
            );
        }
        assert_eq!(
            metrics.gauge_value(telemetry::USER_SATISFACTION_SCORE, &[]),
            Some(0.0)
        );
    }

    #[test]
    fn app_version_feeds_app_info() {
        let gateway = Huginn::builder().app_version("9.9.9").build().unwrap();
        assert_eq!(
            gateway
                .metrics()
                .gauge_value(telemetry::APP_INFO, &[("version", "9.9.9")]),
            Some(1.0)
        );
    }
}
