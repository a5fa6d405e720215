//! SentimentGateway - one analyze request, end to end.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::metrics::MetricRegistry;
use crate::providers::ModelService;
use crate::store::FeedbackStore;
use crate::telemetry;
use crate::types::{
    AnalysisResult, AppVersion, FeedbackRecord, ModelServiceVersion, Sentiment, VersionInfo, ratio,
};
use crate::{HuginnError, Result, Variant};

/// Positive and total predictions for one variant.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    positive: u64,
    total: u64,
}

/// Forwards reviews to the model service and accounts for every outcome.
pub struct SentimentGateway {
    model: Arc<dyn ModelService>,
    metrics: Arc<MetricRegistry>,
    store: Arc<FeedbackStore>,
    app_version: AppVersion,
    /// Guards the numerator/denominator pair behind `sentiment_ratio`.
    tallies: Mutex<BTreeMap<Variant, Tally>>,
}

impl SentimentGateway {
    pub(crate) fn new(
        model: Arc<dyn ModelService>,
        metrics: Arc<MetricRegistry>,
        store: Arc<FeedbackStore>,
        app_version: AppVersion,
    ) -> Self {
        Self {
            model,
            metrics,
            store,
            app_version,
            tallies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Analyze one review.
    ///
    /// A missing or blank review is rejected before the model service is
    /// called and before any metric is touched. Every call that reaches the
    /// model service records one response-time observation, whether it
    /// succeeds or not.
    #[instrument(skip(self, review, selector), fields(variant = tracing::field::Empty))]
    pub async fn analyze(
        &self,
        review: Option<&str>,
        selector: Option<&str>,
    ) -> Result<AnalysisResult> {
        let review = match review {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(HuginnError::Validation("Missing review text".to_string())),
        };

        let variant = Variant::resolve(selector);
        tracing::Span::current().record("variant", variant.as_str());

        let start = Instant::now();
        let outcome = self.model.analyze(review, variant).await;
        let elapsed = start.elapsed().as_secs_f64();
        self.record_response_time(variant, outcome.is_ok(), elapsed);

        let prediction = outcome.inspect_err(|e| {
            warn!(provider = self.model.name(), error = %e, elapsed, "model service call failed");
        })?;

        let sentiment = Sentiment::from_positive(prediction.sentiment);
        self.metrics.increment_counter(
            telemetry::SENTIMENT_PREDICTIONS_TOTAL,
            &[("variant", variant.as_str()), ("sentiment", sentiment.as_str())],
        );
        self.publish_ratio(variant, sentiment);

        let review_id = Uuid::new_v4().to_string();
        self.store.insert(
            review_id.clone(),
            FeedbackRecord {
                review: review.to_string(),
                predicted_sentiment: prediction.sentiment,
                confidence: prediction.confidence,
                variant,
                analyzed_at: Utc::now(),
                feedback: None,
            },
        );

        info!(
            %review_id,
            sentiment = sentiment.as_str(),
            confidence = ?prediction.confidence,
            elapsed,
            "review analyzed"
        );

        Ok(AnalysisResult::decorate(
            review_id,
            review.to_string(),
            &prediction,
            variant,
            elapsed,
        ))
    }

    /// Version of this gateway and of the model service.
    ///
    /// Never fails: when the model service cannot be asked its fields read
    /// `"unavailable"`.
    #[instrument(skip(self))]
    pub async fn version(&self) -> VersionInfo {
        let model_service = match self.model.version().await {
            Ok(version) => version,
            Err(e) => {
                warn!(provider = self.model.name(), error = %e, "model version lookup failed");
                ModelServiceVersion::unavailable()
            }
        };
        VersionInfo {
            app: self.app_version.clone(),
            model_service,
        }
    }

    fn record_response_time(&self, variant: Variant, ok: bool, elapsed: f64) {
        let status = if ok { "ok" } else { "error" };
        self.metrics.observe_histogram(
            telemetry::MODEL_RESPONSE_TIME_SECONDS,
            &[("variant", variant.as_str()), ("status", status)],
            elapsed,
        );
    }

    /// Update the variant's tally and publish its positive ratio.
    ///
    /// The gauge is written while the tally lock is held, so it always
    /// matches the latest tally.
    fn publish_ratio(&self, variant: Variant, sentiment: Sentiment) {
        let mut tallies = self.tallies.lock().unwrap_or_else(PoisonError::into_inner);
        let tally = tallies.entry(variant).or_default();
        tally.total += 1;
        if sentiment == Sentiment::Positive {
            tally.positive += 1;
        }
        self.metrics.set_gauge(
            telemetry::SENTIMENT_RATIO,
            &[("variant", variant.as_str())],
            ratio(tally.positive, tally.total),
        );
    }
}
