//! HTTP routes.
//!
//! Handlers only extract the timeout and raw body; decoding, dispatch and
//! the deadline race happen in [`RequestCoordinator`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::coordinator::RequestCoordinator;
use crate::domain::config::LimitsConfig;
use crate::domain::error::ApiResult;
use crate::domain::types::TimeoutParams;
use crate::middleware::RequestSpanLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RequestCoordinator>,
}

/// Build the gateway router
pub fn build_router(coordinator: Arc<RequestCoordinator>, limits: &LimitsConfig) -> Router {
    let state = AppState { coordinator };

    Router::new()
        .route("/publish", post(publish))
        .route("/bloom-request", post(bloom_request))
        .route("/notify", post(notify))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/server-filter", get(server_filter))
        .layer(RequestSpanLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .with_state(state)
}

/// Raw query pairs; a query string that fails to parse counts as empty
type QueryPairs = Option<Query<Vec<(String, String)>>>;

fn timeout_param(query: QueryPairs) -> TimeoutParams {
    query
        .map(|Query(pairs)| TimeoutParams::from_pairs(pairs))
        .unwrap_or_default()
}

async fn publish(
    State(state): State<AppState>,
    query: QueryPairs,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let deadline = state.coordinator.deadline(timeout_param(query).timeout.as_deref());
    state.coordinator.publish(deadline, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bloom_request(
    State(state): State<AppState>,
    query: QueryPairs,
    body: Bytes,
) -> ApiResult<Response> {
    let deadline = state.coordinator.deadline(timeout_param(query).timeout.as_deref());
    let json = state.coordinator.bloom_request(deadline, &body).await?;
    Ok(json_response(json))
}

async fn notify(
    State(state): State<AppState>,
    query: QueryPairs,
    body: Bytes,
) -> ApiResult<Response> {
    let deadline = state.coordinator.deadline(timeout_param(query).timeout.as_deref());
    let json = state.coordinator.notify(deadline, &body).await?;
    Ok(json_response(json))
}

async fn health(State(state): State<AppState>, query: QueryPairs) -> ApiResult<Response> {
    let deadline = state.coordinator.deadline(timeout_param(query).timeout.as_deref());
    let json = state.coordinator.health(deadline).await?;
    Ok(json_response(json))
}

async fn metrics(State(state): State<AppState>, query: QueryPairs) -> ApiResult<Response> {
    let deadline = state.coordinator.deadline(timeout_param(query).timeout.as_deref());
    let json = state.coordinator.metrics_report(deadline).await?;
    Ok(json_response(json))
}

async fn server_filter(State(state): State<AppState>, query: QueryPairs) -> ApiResult<Response> {
    let deadline = state.coordinator.deadline(timeout_param(query).timeout.as_deref());
    let json = state.coordinator.server_filter(deadline).await?;
    Ok(json_response(json))
}

fn json_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
