//! Public types for the Huginn API.

mod feedback;
mod sentiment;
mod version;

pub use feedback::{FeedbackAck, FeedbackEntry, FeedbackRecord, FeedbackStats, ratio};
pub use sentiment::{AnalysisResult, ConfidenceLevel, Prediction, Sentiment};
pub use version::{AppVersion, ModelServiceVersion, UNAVAILABLE, VersionInfo};
