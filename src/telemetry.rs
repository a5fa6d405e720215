//! Telemetry metric name constants and the standard registry.
//!
//! Centralised metric names for huginn operations. [`standard_registry`]
//! registers every family below; handlers and the gateway only ever refer
//! to these constants.
//!
//! # Metric naming conventions
//!
//! Counters end in `_total`, histograms use meaningful units (`_seconds`).
//!
//! # Common labels
//!
//! - `variant`: experiment variant ("v1" | "v2")
//! - `sentiment`: predicted sentiment ("positive" | "negative")
//! - `status`: model service outcome ("ok" | "error")
//! - `correctness`: user verdict ("correct" | "incorrect")
//! - `endpoint`: API endpoint ("version", "analyze", "feedback", "feedback_stats")

use crate::Variant;
use crate::metrics::MetricRegistry;

/// Build information, always 1.
///
/// Labels: `version`.
pub const APP_INFO: &str = "app_info";

/// Calls per API endpoint.
///
/// Labels: `endpoint`.
pub const API_CALLS_TOTAL: &str = "api_calls_total";

/// Sentiment predictions returned by the model service.
///
/// Labels: `variant`, `sentiment`.
pub const SENTIMENT_PREDICTIONS_TOTAL: &str = "sentiment_predictions_total";

/// Positive predictions over all predictions.
///
/// Labels: `variant`.
pub const SENTIMENT_RATIO: &str = "sentiment_ratio";

/// Model service round-trip time in seconds, failures included.
///
/// Labels: `variant`, `status` ("ok" | "error").
pub const MODEL_RESPONSE_TIME_SECONDS: &str = "model_response_time_seconds";

/// Bucket bounds for [`MODEL_RESPONSE_TIME_SECONDS`].
pub const MODEL_RESPONSE_TIME_BUCKETS: [f64; 6] = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Feedback submissions.
///
/// Labels: `variant`, `correctness` ("correct" | "incorrect").
pub const FEEDBACK_SUBMISSIONS_TOTAL: &str = "feedback_submissions_total";

/// Correct feedback over all feedback received, across variants.
///
/// No labels.
pub const USER_SATISFACTION_SCORE: &str = "user_satisfaction_score";

/// Create a registry with every huginn family registered.
///
/// `app_info` is published immediately with the given version. The ratio
/// and satisfaction gauges start at 0 so they are scraped before the first
/// prediction or verdict.
pub fn standard_registry(app_version: &str) -> MetricRegistry {
    let mut registry = MetricRegistry::new();
    registry.register_gauge(APP_INFO, "Application info", &["version"]);
    registry.register_counter(API_CALLS_TOTAL, "Number of calls per API endpoint", &["endpoint"]);
    registry.register_counter(
        SENTIMENT_PREDICTIONS_TOTAL,
        "Number of sentiment predictions",
        &["variant", "sentiment"],
    );
    registry.register_gauge(
        SENTIMENT_RATIO,
        "Ratio of positive to total reviews",
        &["variant"],
    );
    registry.register_histogram(
        MODEL_RESPONSE_TIME_SECONDS,
        "Model service response time in seconds",
        &["variant", "status"],
        &MODEL_RESPONSE_TIME_BUCKETS,
    );
    registry.register_counter(
        FEEDBACK_SUBMISSIONS_TOTAL,
        "Number of feedback submissions",
        &["variant", "correctness"],
    );
    registry.register_gauge(
        USER_SATISFACTION_SCORE,
        "Share of predictions users confirmed as correct",
        &[],
    );

    registry.set_gauge(APP_INFO, &[("version", app_version)], 1.0);
    for variant in Variant::ALL {
        registry.set_gauge(SENTIMENT_RATIO, &[("variant", variant.as_str())], 0.0);
    }
    registry.set_gauge(USER_SATISFACTION_SCORE, &[], 0.0);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_registers_all_families() {
        let registry = standard_registry("1.2.3");
        for name in [
            APP_INFO,
            API_CALLS_TOTAL,
            SENTIMENT_PREDICTIONS_TOTAL,
            SENTIMENT_RATIO,
            MODEL_RESPONSE_TIME_SECONDS,
            FEEDBACK_SUBMISSIONS_TOTAL,
            USER_SATISFACTION_SCORE,
        ] {
            assert!(registry.is_registered(name), "{name} missing");
        }
    }

    #[test]
    fn app_info_published() {
        let registry = standard_registry("1.2.3");
        assert_eq!(registry.gauge_value(APP_INFO, &[("version", "1.2.3")]), Some(1.0));
        assert!(
            registry
                .render()
                .unwrap()
                .contains("app_info{version=\"1.2.3\"} 1\n")
        );
    }

    #[test]
    fn ratio_and_satisfaction_start_at_zero() {
        let registry = standard_registry("1.2.3");
        for variant in ["v1", "v2"] {
            assert_eq!(
                registry.gauge_value(SENTIMENT_RATIO, &[("variant", variant)]),
                Some(0.0)
            );
        }
        assert_eq!(registry.gauge_value(USER_SATISFACTION_SCORE, &[]), Some(0.0));

        let text = registry.render().unwrap();
        assert!(text.contains("sentiment_ratio{variant=\"v2\"} 0\n"));
        assert!(text.contains("user_satisfaction_score 0\n"));
    }
}
