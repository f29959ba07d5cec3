use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{
    MATCHRATE_STATUS_ENCODING_ERROR, MATCHRATE_STATUS_HEADER, MATCHRATE_STATUS_INTERNAL_ERROR,
    MATCHRATE_STATUS_INVALID_REQUEST, MATCHRATE_STATUS_MODEL_UNAVAILABLE,
};
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Well-formed JSON that does not match the request schema.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => GatewayError::Validation(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => GatewayError::BadRequest(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => {
                GatewayError::UnsupportedMediaType(e.body_text())
            }
            other => GatewayError::BadRequest(other.body_text()),
        }
    }
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ModelUnavailable { .. } => GatewayError::ModelUnavailable(err.to_string()),
            ServiceError::EncodingFailed { .. } => GatewayError::Encoding(err.to_string()),
            ServiceError::Internal(_) => GatewayError::Internal(err.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            GatewayError::ModelUnavailable(_)
            | GatewayError::Encoding(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn status_label(&self) -> &'static str {
        match self {
            GatewayError::Validation(_)
            | GatewayError::BadRequest(_)
            | GatewayError::UnsupportedMediaType(_) => MATCHRATE_STATUS_INVALID_REQUEST,
            GatewayError::ModelUnavailable(_) => MATCHRATE_STATUS_MODEL_UNAVAILABLE,
            GatewayError::Encoding(_) => MATCHRATE_STATUS_ENCODING_ERROR,
            GatewayError::Internal(_) => MATCHRATE_STATUS_INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(
            MATCHRATE_STATUS_HEADER,
            HeaderValue::from_static(self.status_label()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
