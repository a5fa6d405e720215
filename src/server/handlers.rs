//! HTTP handlers.
//!
//! Each `/api/*` handler counts the call in `api_calls_total`, delegates to
//! the gateway and returns JSON. Errors become `{"error": "..."}` with the
//! status from [`HuginnError::status_code`].

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::metrics::CONTENT_TYPE;
use crate::telemetry;
use crate::types::{AnalysisResult, FeedbackAck, FeedbackStats, VersionInfo};
use crate::variant::EXPERIMENT_HEADER;
use crate::{HuginnError, Result};

use super::AppState;

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HuginnError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub review: Option<String>,
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub correct_sentiment: Option<bool>,
}

fn experiment_selector(headers: &HeaderMap) -> Option<&str> {
    headers.get(EXPERIMENT_HEADER).and_then(|v| v.to_str().ok())
}

/// Unreadable or malformed JSON is the caller's fault.
fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(inner)| inner)
        .map_err(|rejection| HuginnError::Validation(rejection.body_text()))
}

fn count_call(state: &AppState, endpoint: &'static str) {
    state
        .gateway
        .metrics()
        .increment_counter(telemetry::API_CALLS_TOTAL, &[("endpoint", endpoint)]);
}

// ── API ────────────────────────────────────────────────────────

/// GET /api/version
pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    count_call(&state, "version");
    Json(state.gateway.sentiment().version().await)
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>> {
    count_call(&state, "analyze");
    let request = json_body(body)?;
    let result = state
        .gateway
        .sentiment()
        .analyze(request.review.as_deref(), experiment_selector(&headers))
        .await?;
    Ok(Json(result))
}

/// POST /api/feedback
pub async fn feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackAck>> {
    count_call(&state, "feedback");
    let request = json_body(body)?;
    let ack = state
        .gateway
        .feedback()
        .record_feedback(
            request.review_id.as_deref(),
            request.correct_sentiment,
            experiment_selector(&headers),
        )
        .await?;
    Ok(Json(ack))
}

/// GET /api/feedback/stats
pub async fn feedback_stats(State(state): State<AppState>) -> Json<FeedbackStats> {
    count_call(&state, "feedback_stats");
    Json(state.gateway.feedback().stats())
}

// ── Operational ────────────────────────────────────────────────

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.gateway.metrics().render()?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
