//! Tests for FeedbackRecorder: correlation, satisfaction score, forwarding.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use huginn::telemetry;
use huginn::types::ModelServiceVersion;
use huginn::{Huginn, HuginnError, HuginnGateway, ModelService, Prediction, Result, Variant};

// ============================================================================
// Mock model service
// ============================================================================

struct MockModel {
    sentiment: bool,
    accept_feedback: bool,
    feedback_calls: AtomicUsize,
}

impl MockModel {
    fn new(accept_feedback: bool) -> Arc<Self> {
        Arc::new(Self {
            sentiment: true,
            accept_feedback,
            feedback_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ModelService for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, _review: &str, _variant: Variant) -> Result<Prediction> {
        Ok(Prediction {
            sentiment: self.sentiment,
            confidence: Some(0.92),
        })
    }

    async fn version(&self) -> Result<ModelServiceVersion> {
        Ok(ModelServiceVersion {
            model_version: "mock".into(),
            service_version: "mock".into(),
        })
    }

    async fn submit_feedback(&self, _review_id: &str, _correct: bool) -> Result<()> {
        self.feedback_calls.fetch_add(1, Ordering::SeqCst);
        if self.accept_feedback {
            Ok(())
        } else {
            Err(HuginnError::ServiceUnavailable("feedback endpoint down".into()))
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn gateway(model: Arc<MockModel>) -> HuginnGateway {
    Huginn::builder().model_service(model).build().unwrap()
}

async fn analyzed_id(gateway: &HuginnGateway, selector: Option<&str>) -> String {
    gateway
        .sentiment()
        .analyze(Some("great food"), selector)
        .await
        .unwrap()
        .review_id
}

fn satisfaction(gateway: &HuginnGateway) -> Option<f64> {
    gateway
        .metrics()
        .gauge_value(telemetry::USER_SATISFACTION_SCORE, &[])
}

fn submissions(gateway: &HuginnGateway, variant: &str, correctness: &str) -> Option<u64> {
    gateway.metrics().counter_value(
        telemetry::FEEDBACK_SUBMISSIONS_TOTAL,
        &[("variant", variant), ("correctness", correctness)],
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn feedback_updates_counter_and_satisfaction() {
    let model = MockModel::new(true);
    let gateway = gateway(model.clone());

    let first = analyzed_id(&gateway, None).await;
    let second = analyzed_id(&gateway, None).await;

    let ack = gateway
        .feedback()
        .record_feedback(Some(first.as_str()), Some(true), None)
        .await
        .unwrap();
    assert_eq!(ack.status, "success");
    assert_eq!(ack.feedback_id, first);
    assert!(ack.model_feedback_sent);
    assert_eq!(ack.satisfaction_score, Some(1.0));
    assert_eq!(satisfaction(&gateway), Some(1.0));

    let ack = gateway
        .feedback()
        .record_feedback(Some(second.as_str()), Some(false), None)
        .await
        .unwrap();
    assert_eq!(ack.satisfaction_score, Some(0.5));
    assert_eq!(satisfaction(&gateway), Some(0.5));

    assert_eq!(submissions(&gateway, "v1", "correct"), Some(1));
    assert_eq!(submissions(&gateway, "v1", "incorrect"), Some(1));
    assert_eq!(model.feedback_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn feedback_is_attributed_to_request_variant() {
    let gateway = gateway(MockModel::new(true));
    let id = analyzed_id(&gateway, Some("B")).await;

    gateway
        .feedback()
        .record_feedback(Some(id.as_str()), Some(false), Some("B"))
        .await
        .unwrap();

    assert_eq!(submissions(&gateway, "v2", "incorrect"), Some(1));
    assert_eq!(submissions(&gateway, "v1", "incorrect"), None);
    assert_eq!(satisfaction(&gateway), Some(0.0));
}

#[tokio::test]
async fn unknown_review_id_is_not_found() {
    let model = MockModel::new(true);
    let gateway = gateway(model.clone());

    let err = gateway
        .feedback()
        .record_feedback(Some("no-such-review"), Some(true), None)
        .await
        .unwrap_err();

    assert!(matches!(err, HuginnError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
    assert_eq!(submissions(&gateway, "v1", "correct"), None);
    assert_eq!(satisfaction(&gateway), Some(0.0));
    assert_eq!(model.feedback_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn second_verdict_is_rejected() {
    let gateway = gateway(MockModel::new(true));
    let id = analyzed_id(&gateway, None).await;

    gateway
        .feedback()
        .record_feedback(Some(id.as_str()), Some(true), None)
        .await
        .unwrap();
    let err = gateway
        .feedback()
        .record_feedback(Some(id.as_str()), Some(false), None)
        .await
        .unwrap_err();

    assert!(matches!(err, HuginnError::AlreadyRecorded(_)));
    assert_eq!(err.status_code(), 409);
    assert_eq!(submissions(&gateway, "v1", "incorrect"), None);
    assert_eq!(satisfaction(&gateway), Some(1.0));
}

#[tokio::test]
async fn missing_fields_are_validation_errors() {
    let gateway = gateway(MockModel::new(true));
    let id = analyzed_id(&gateway, None).await;

    let cases: [(Option<&str>, Option<bool>); 3] =
        [(None, Some(true)), (Some(id.as_str()), None), (Some("  "), Some(false))];
    for (review_id, correct) in cases {
        let err = gateway
            .feedback()
            .record_feedback(review_id, correct, None)
            .await
            .unwrap_err();
        assert!(matches!(err, HuginnError::Validation(_)));
    }
    assert_eq!(gateway.feedback().stats().feedback_received, 0);
}

#[tokio::test]
async fn forwarding_failure_does_not_fail_feedback() {
    let gateway = gateway(MockModel::new(false));
    let id = analyzed_id(&gateway, None).await;

    let ack = gateway
        .feedback()
        .record_feedback(Some(id.as_str()), Some(true), None)
        .await
        .unwrap();

    assert!(!ack.model_feedback_sent);
    assert_eq!(submissions(&gateway, "v1", "correct"), Some(1));
}

#[tokio::test]
async fn stats_reflect_reviews_and_feedback() {
    let gateway = gateway(MockModel::new(true));
    assert_eq!(gateway.feedback().stats().total_reviews, 0);

    let ids = [
        analyzed_id(&gateway, None).await,
        analyzed_id(&gateway, None).await,
        analyzed_id(&gateway, None).await,
        analyzed_id(&gateway, None).await,
    ];
    gateway
        .feedback()
        .record_feedback(Some(ids[0].as_str()), Some(true), None)
        .await
        .unwrap();
    gateway
        .feedback()
        .record_feedback(Some(ids[1].as_str()), Some(false), None)
        .await
        .unwrap();

    let stats = gateway.feedback().stats();
    assert_eq!(stats.total_reviews, 4);
    assert_eq!(stats.feedback_received, 2);
    assert_eq!(stats.correct_predictions, 1);
    assert_eq!(stats.accuracy, 0.5);
    assert_eq!(stats.feedback_rate, 0.5);
}
