//! Axum server and routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use sim_jobs::{StatusResolver, SubmissionService};
use sim_types::SimulationParams;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub submission: SubmissionService,
    pub resolver: StatusResolver,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/simulate", post(handle_simulate))
        .route("/jobs/:job_id", get(handle_job_meta))
        .route("/results/:job_id", get(handle_result))
        .route("/results", get(handle_recent))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_simulate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulationParams>, JsonRejection>,
) -> Response {
    let Json(params) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid JSON: {rejection}") })),
            )
                .into_response();
        }
    };
    match state.submission.submit(params).await {
        Ok(receipt) => (StatusCode::ACCEPTED, Json(receipt)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn handle_job_meta(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Response {
    match state.resolver.meta(&job_id).await {
        Ok(Some(meta)) => (StatusCode::OK, Json(meta)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "job not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("store error: {e}") })),
        )
            .into_response(),
    }
}

async fn handle_result(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Response {
    match state.resolver.result(&job_id).await {
        Ok(Some(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no result or job not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("store error: {e}") })),
        )
            .into_response(),
    }
}

async fn handle_recent(State(state): State<Arc<AppState>>) -> Response {
    match state.resolver.recent().await {
        Ok(ids) => (StatusCode::OK, Json(json!({ "recent_job_ids": ids }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("store error: {e}") })),
        )
            .into_response(),
    }
}
