//! HTTP server.
//!
//! This module provides:
//! - The axum router and shared handler state (`router`, [`AppState`])
//! - Request handlers (`handlers`)
//! - Configuration types (`config`)
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/version` | Gateway and model service versions |
//! | POST | `/api/analyze` | Analyze a review |
//! | POST | `/api/feedback` | Submit feedback for an analysis |
//! | GET | `/api/feedback/stats` | Feedback statistics |
//! | GET | `/metrics` | Prometheus exposition |
//! | GET | `/health` | Liveness |
//!
//! Requests choose their experiment group with the `X-Experiment-Group`
//! header (`A` or `B`).

pub mod config;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::gateway::HuginnGateway;

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<HuginnGateway>,
}

/// Build the complete router (API + metrics + health).
pub fn router(gateway: Arc<HuginnGateway>) -> Router {
    let api_routes = Router::new()
        .route("/version", get(handlers::version))
        .route("/analyze", post(handlers::analyze))
        .route("/feedback", post(handlers::feedback))
        .route("/feedback/stats", get(handlers::feedback_stats));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(AppState { gateway })
}
