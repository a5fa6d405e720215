//! Sentiment prediction and analysis result types.

use serde::{Deserialize, Serialize};

use crate::Variant;

/// Prediction as returned by the model service.
///
/// `confidence` is optional: older model builds only report the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// `true` for positive.
    pub sentiment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Predicted sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn from_positive(positive: bool) -> Self {
        if positive {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    /// Label value used in metric families.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Negative => "😔",
        }
    }

    /// Sentence shown to the user next to the emoji.
    pub fn message(&self) -> &'static str {
        match self {
            Sentiment::Positive => "This review appears to be positive!",
            Sentiment::Negative => "This review appears to be negative.",
        }
    }
}

/// Human-readable confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
    #[serde(rename = "Not Available")]
    NotAvailable,
}

impl ConfidenceLevel {
    /// Tier for a model confidence. Thresholds are exclusive lower bounds:
    /// `> 0.8` Very High, `> 0.6` High, `> 0.4` Medium, else Low.
    pub fn from_confidence(confidence: Option<f64>) -> Self {
        match confidence {
            None => ConfidenceLevel::NotAvailable,
            Some(c) if c > 0.8 => ConfidenceLevel::VeryHigh,
            Some(c) if c > 0.6 => ConfidenceLevel::High,
            Some(c) if c > 0.4 => ConfidenceLevel::Medium,
            Some(_) => ConfidenceLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh => "Very High",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::NotAvailable => "Not Available",
        }
    }
}

/// Decorated analysis returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Opaque id to correlate later feedback with this analysis.
    pub review_id: String,
    pub review: String,
    pub sentiment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub confidence_level: ConfidenceLevel,
    pub emoji: String,
    pub message: String,
    pub feedback_prompt: String,
    pub variant: Variant,
    /// Model service round trip in seconds.
    pub response_time_seconds: f64,
}

impl AnalysisResult {
    /// Decorate a model prediction for display.
    pub fn decorate(
        review_id: String,
        review: String,
        prediction: &Prediction,
        variant: Variant,
        response_time_seconds: f64,
    ) -> Self {
        let sentiment = Sentiment::from_positive(prediction.sentiment);
        let feedback_prompt = format!(
            "Was this prediction correct? Click here to provide feedback (ID: {review_id})"
        );
        Self {
            review_id,
            review,
            sentiment: prediction.sentiment,
            confidence: prediction.confidence,
            confidence_level: ConfidenceLevel::from_confidence(prediction.confidence),
            emoji: sentiment.emoji().to_string(),
            message: sentiment.message().to_string(),
            feedback_prompt,
            variant,
            response_time_seconds,
        }
    }
}
