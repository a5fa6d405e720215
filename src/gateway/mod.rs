//! Gateway implementations

mod analyze;
mod builder;
mod feedback;

pub use analyze::SentimentGateway;
pub use builder::{Huginn, HuginnBuilder, HuginnGateway};
pub use feedback::FeedbackRecorder;
