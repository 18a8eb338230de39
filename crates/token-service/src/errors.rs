use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// The only verb accepted by the token endpoint.
pub const ALLOWED_METHOD: &str = "POST";

#[derive(Debug, Error)]
pub enum TokenServiceError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing private key configuration")]
    Configuration,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl TokenServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TokenServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TokenServiceError::Configuration | TokenServiceError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Bounded label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenServiceError::MethodNotAllowed => "method_not_allowed",
            TokenServiceError::Configuration => "configuration",
            TokenServiceError::InvalidRequest(_) => "invalid_request",
            TokenServiceError::Signing(_) => "signing",
        }
    }

    /// Message returned to the caller. Internal diagnostics stay in the logs.
    fn client_message(&self) -> String {
        match self {
            TokenServiceError::MethodNotAllowed => "Method not allowed".to_string(),
            TokenServiceError::Configuration => "Server configuration error".to_string(),
            TokenServiceError::InvalidRequest(message) => message.clone(),
            TokenServiceError::Signing(_) => "Failed to generate JWT".to_string(),
        }
    }
}

impl IntoResponse for TokenServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            message: self.client_message(),
        });

        match self {
            TokenServiceError::MethodNotAllowed => (
                status,
                [(header::ALLOW, HeaderValue::from_static(ALLOWED_METHOD))],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}
