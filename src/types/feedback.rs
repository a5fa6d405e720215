//! Feedback correlation and statistics types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Variant;

/// What the gateway remembers about one analysis, for later feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub review: String,
    pub predicted_sentiment: bool,
    pub confidence: Option<f64>,
    /// Variant that served the analysis.
    pub variant: Variant,
    pub analyzed_at: DateTime<Utc>,
    /// Set once, when the user submits feedback.
    pub feedback: Option<FeedbackEntry>,
}

impl FeedbackRecord {
    pub fn feedback_received(&self) -> bool {
        self.feedback.is_some()
    }
}

/// A user's verdict on a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedbackEntry {
    /// Whether the user confirmed the predicted sentiment.
    pub correct: bool,
    pub received_at: DateTime<Utc>,
}

/// Acknowledgement for an accepted feedback submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub status: String,
    pub message: String,
    pub feedback_id: String,
    /// Whether forwarding the verdict to the model service succeeded.
    pub model_feedback_sent: bool,
    /// `correct / received` across all feedback so far.
    pub satisfaction_score: Option<f64>,
}

/// Aggregate feedback statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    /// Analyses the gateway has served.
    pub total_reviews: u64,
    pub feedback_received: u64,
    pub correct_predictions: u64,
    /// `correct_predictions / feedback_received`, 0 without feedback.
    pub accuracy: f64,
    /// `feedback_received / total_reviews`, 0 without reviews.
    pub feedback_rate: f64,
}

impl FeedbackStats {
    pub fn from_counts(total_reviews: u64, feedback_received: u64, correct_predictions: u64) -> Self {
        Self {
            total_reviews,
            feedback_received,
            correct_predictions,
            accuracy: ratio(correct_predictions, feedback_received),
            feedback_rate: ratio(feedback_received, total_reviews),
        }
    }
}

/// `part / whole`, or 0 when `whole` is 0.
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
