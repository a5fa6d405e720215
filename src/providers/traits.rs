//! Model service trait.
//!
//! The gateway only talks to the model service through [`ModelService`], so
//! tests and alternative transports can stand in for the HTTP client.
//!
//! # Error contract
//!
//! Implementations report transport failures (connect, timeout) as
//! `ServiceUnavailable`, non-success answers as `Upstream` and undecodable
//! bodies as `InvalidResponse`. The gateway relies on this split to pick the
//! status code it returns.

use async_trait::async_trait;

use crate::Result;
use crate::Variant;
use crate::types::{ModelServiceVersion, Prediction};

/// The sentiment model behind the gateway.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Name for logging/debugging.
    fn name(&self) -> &str;

    /// Classify one review on behalf of the given variant.
    async fn analyze(&self, review: &str, variant: Variant) -> Result<Prediction>;

    /// Version reported by the model service.
    async fn version(&self) -> Result<ModelServiceVersion>;

    /// Pass a user's verdict on to the model service.
    async fn submit_feedback(&self, review_id: &str, correct: bool) -> Result<()>;
}
