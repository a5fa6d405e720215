//! In-memory feedback correlation store.
//!
//! Holds one [`FeedbackRecord`] per analysis for the lifetime of the
//! process. Records are never evicted: a review id handed out by the gateway
//! stays valid until shutdown.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use crate::types::{FeedbackEntry, FeedbackRecord, FeedbackStats};
use crate::{HuginnError, Result};

#[derive(Default)]
struct Inner {
    records: HashMap<String, FeedbackRecord>,
    feedback_received: u64,
    correct: u64,
}

impl Inner {
    fn stats(&self) -> FeedbackStats {
        FeedbackStats::from_counts(self.records.len() as u64, self.feedback_received, self.correct)
    }
}

/// Thread-safe store of analyses awaiting (or having received) feedback.
#[derive(Default)]
pub struct FeedbackStore {
    inner: RwLock<Inner>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an analysis under its review id.
    pub fn insert(&self, review_id: impl Into<String>, record: FeedbackRecord) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .insert(review_id.into(), record);
    }

    pub fn get(&self, review_id: &str) -> Option<FeedbackRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .get(review_id)
            .cloned()
    }

    /// Attach a verdict to a stored analysis.
    ///
    /// `publish` runs while the store is still locked, with the updated
    /// statistics, so whatever it derives from them (gauges) is published in
    /// the same order the verdicts were applied.
    ///
    /// Fails with `NotFound` for an unknown id and `AlreadyRecorded` when the
    /// analysis already carries a verdict; neither case changes anything.
    pub fn record_feedback(
        &self,
        review_id: &str,
        correct: bool,
        publish: impl FnOnce(&FeedbackRecord, &FeedbackStats),
    ) -> Result<FeedbackStats> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let record = inner
            .records
            .get_mut(review_id)
            .ok_or_else(|| HuginnError::NotFound("Review ID not found".to_string()))?;
        if record.feedback.is_some() {
            return Err(HuginnError::AlreadyRecorded(review_id.to_string()));
        }
        record.feedback = Some(FeedbackEntry {
            correct,
            received_at: Utc::now(),
        });
        let record = record.clone();

        inner.feedback_received += 1;
        if correct {
            inner.correct += 1;
        }

        let stats = inner.stats();
        publish(&record, &stats);
        Ok(stats)
    }

    pub fn stats(&self) -> FeedbackStats {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;

    fn record() -> FeedbackRecord {
        FeedbackRecord {
            review: "great food".into(),
            predicted_sentiment: true,
            confidence: Some(0.9),
            variant: Variant::V1,
            analyzed_at: Utc::now(),
            feedback: None,
        }
    }

    #[test]
    fn unknown_review_is_not_found() {
        let store = FeedbackStore::new();
        let err = store.record_feedback("nope", true, |_, _| {}).unwrap_err();
        assert!(matches!(err, HuginnError::NotFound(_)));
    }

    #[test]
    fn feedback_is_recorded_once() {
        let store = FeedbackStore::new();
        store.insert("r1", record());

        let stats = store.record_feedback("r1", false, |_, _| {}).unwrap();
        assert_eq!(stats.feedback_received, 1);
        assert_eq!(stats.correct_predictions, 0);

        let err = store.record_feedback("r1", true, |_, _| {}).unwrap_err();
        assert!(matches!(err, HuginnError::AlreadyRecorded(_)));
        assert_eq!(store.stats().feedback_received, 1);

        let stored = store.get("r1").unwrap();
        assert!(stored.feedback_received());
        assert_eq!(stored.feedback.map(|f| f.correct), Some(false));
    }

    #[test]
    fn publish_sees_updated_stats() {
        let store = FeedbackStore::new();
        store.insert("r1", record());
        store.insert("r2", record());

        store.record_feedback("r1", true, |_, _| {}).unwrap();
        let mut seen = None;
        store
            .record_feedback("r2", false, |rec, stats| seen = Some((rec.variant, *stats)))
            .unwrap();

        let (variant, stats) = seen.unwrap();
        assert_eq!(variant, Variant::V1);
        assert_eq!(stats.total_reviews, 2);
        assert_eq!(stats.feedback_received, 2);
        assert_eq!(stats.accuracy, 0.5);
        assert_eq!(stats.feedback_rate, 1.0);
    }
}
