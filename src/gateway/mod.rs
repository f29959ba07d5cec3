//! HTTP gateway (Axum) exposing the similarity service.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::analyze_handler;
pub use state::HandlerState;

use crate::constants::{
    COMPONENT_READY, MATCHRATE_STATUS_HEADER, MATCHRATE_STATUS_OK, MODEL_STATE_LAZY,
    MODEL_STATE_LOADED,
};
use crate::embedding::EncoderLoader;

pub fn create_router_with_state<L: EncoderLoader>(state: HandlerState<L>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<L>))
        .route("/analyze", post(analyze_handler::<L>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub model: &'static str,
}

fn ok_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        MATCHRATE_STATUS_HEADER,
        HeaderValue::from_static(MATCHRATE_STATUS_OK),
    );
    headers
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        ok_headers(),
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Reports whether the model is resident. A lazy model is still ready: the
/// first `/analyze` call loads it.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<L: EncoderLoader>(State(state): State<HandlerState<L>>) -> Response {
    let model = if state.service.is_loaded() {
        MODEL_STATE_LOADED
    } else {
        MODEL_STATE_LAZY
    };

    (
        StatusCode::OK,
        ok_headers(),
        Json(ReadyResponse {
            status: "ok",
            components: ComponentStatus {
                http: COMPONENT_READY,
                model,
            },
        }),
    )
        .into_response()
}
