//! Huginn - sentiment analysis gateway with A/B variant metrics
//!
//! Huginn sits in front of a sentiment model service. It forwards review
//! text to the model, decorates the prediction for display, correlates user
//! feedback with earlier predictions, and keeps per-variant metrics in a
//! [`MetricRegistry`](metrics::MetricRegistry) that renders to the
//! Prometheus text format.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::Huginn;
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let gateway = Huginn::builder()
//!         .model_service_url("http://localhost:5000")
//!         .build()?;
//!
//!     // Requests in experiment group "B" are attributed to variant v2.
//!     let result = gateway
//!         .sentiment()
//!         .analyze(Some("The pasta was wonderful"), Some("B"))
//!         .await?;
//!     println!("{} {} ({})", result.emoji, result.message, result.confidence_level.as_str());
//!
//!     gateway
//!         .feedback()
//!         .record_feedback(Some(result.review_id.as_str()), Some(true), Some("B"))
//!         .await?;
//!
//!     print!("{}", gateway.metrics().render()?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod metrics;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod variant;
pub mod version;

// Re-export main types at crate root
pub use error::{HuginnError, Result};
pub use gateway::{FeedbackRecorder, Huginn, HuginnBuilder, HuginnGateway, SentimentGateway};
pub use providers::{ModelService, ModelServiceClient};
pub use variant::Variant;
pub use version::{PKG_VERSION, version_string};

// Re-export all types
pub use types::{
    AnalysisResult, ConfidenceLevel, FeedbackAck, FeedbackRecord, FeedbackStats, Prediction,
    Sentiment, VersionInfo,
};
