//! Model service providers.
//!
//! [`ModelService`] is the seam between the gateway and the sentiment model;
//! [`ModelServiceClient`] is the HTTP implementation used in production.

pub mod model_service;
pub mod traits;

pub use model_service::{
    DEFAULT_ANALYZE_TIMEOUT, DEFAULT_BASE_URL, DEFAULT_LOOKUP_TIMEOUT, ModelServiceClient,
};
pub use traits::ModelService;
