use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument, warn};

use crate::constants::{MATCHRATE_STATUS_HEADER, MATCHRATE_STATUS_OK};
use crate::embedding::EncoderLoader;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::service::MatchRequest;

/// `POST /analyze`.
///
/// Schema violations are rejected here, before the model is touched.
#[instrument(skip(state, payload), fields(model_id = %state.service.model_id()))]
pub async fn analyze_handler<L: EncoderLoader>(
    State(state): State<HandlerState<L>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected analyze request");
        GatewayError::from(rejection)
    })?;

    let response = state
        .service
        .analyze(request.original, request.user)
        .await
        .map_err(|err| {
            warn!(error = %err, "Analyze request failed");
            GatewayError::from(err)
        })?;

    debug!(matching_rate = response.matching_rate, "Analyze request scored");

    let mut headers = HeaderMap::new();
    headers.insert(
        MATCHRATE_STATUS_HEADER,
        HeaderValue::from_static(MATCHRATE_STATUS_OK),
    );

    Ok((StatusCode::OK, headers, Json(response)).into_response())
}
