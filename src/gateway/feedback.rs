//! FeedbackRecorder - user verdicts on earlier analyses.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::metrics::MetricRegistry;
use crate::providers::ModelService;
use crate::store::FeedbackStore;
use crate::telemetry;
use crate::types::{FeedbackAck, FeedbackStats};
use crate::{HuginnError, Result, Variant};

const THANK_YOU: &str = "Thank you for your feedback! This helps us improve our model.";

/// Records feedback against analyses held in the [`FeedbackStore`].
///
/// Review ids are checked: feedback for an id the gateway never issued is
/// rejected with `NotFound`, and each analysis accepts one verdict.
pub struct FeedbackRecorder {
    model: Arc<dyn ModelService>,
    metrics: Arc<MetricRegistry>,
    store: Arc<FeedbackStore>,
}

impl FeedbackRecorder {
    pub(crate) fn new(
        model: Arc<dyn ModelService>,
        metrics: Arc<MetricRegistry>,
        store: Arc<FeedbackStore>,
    ) -> Self {
        Self {
            model,
            metrics,
            store,
        }
    }

    /// Record whether the prediction for `review_id` was correct.
    ///
    /// On success the per-variant feedback counter and the global
    /// satisfaction gauge are updated, then the verdict is forwarded to the
    /// model service on a best-effort basis.
    #[instrument(skip(self, selector), fields(variant = tracing::field::Empty))]
    pub async fn record_feedback(
        &self,
        review_id: Option<&str>,
        correct: Option<bool>,
        selector: Option<&str>,
    ) -> Result<FeedbackAck> {
        let (review_id, correct) = match (review_id, correct) {
            (Some(id), Some(correct)) if !id.trim().is_empty() => (id, correct),
            _ => {
                return Err(HuginnError::Validation(
                    "Missing review_id or correct_sentiment".to_string(),
                ));
            }
        };

        let variant = Variant::resolve(selector);
        tracing::Span::current().record("variant", variant.as_str());
        let correctness = if correct { "correct" } else { "incorrect" };

        let stats = self.store.record_feedback(review_id, correct, |record, stats| {
            if record.variant != variant {
                debug!(analyzed_as = %record.variant, "feedback variant differs from analysis");
            }
            self.metrics.increment_counter(
                telemetry::FEEDBACK_SUBMISSIONS_TOTAL,
                &[("variant", variant.as_str()), ("correctness", correctness)],
            );
            self.metrics
                .set_gauge(telemetry::USER_SATISFACTION_SCORE, &[], stats.accuracy);
        })?;

        let model_feedback_sent = match self.model.submit_feedback(review_id, correct).await {
            Ok(()) => true,
            Err(e) => {
                warn!(provider = self.model.name(), error = %e, "forwarding feedback failed");
                false
            }
        };

        info!(
            correctness,
            satisfaction = stats.accuracy,
            model_feedback_sent,
            "feedback recorded"
        );

        Ok(FeedbackAck {
            status: "success".to_string(),
            message: THANK_YOU.to_string(),
            feedback_id: review_id.to_string(),
            model_feedback_sent,
            satisfaction_score: Some(stats.accuracy),
        })
    }

    /// Aggregate statistics over every analysis and verdict so far.
    pub fn stats(&self) -> FeedbackStats {
        self.store.stats()
    }
}
