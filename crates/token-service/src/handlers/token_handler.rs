//! Token request endpoint.
//!
//! POST /api/token
//!
//! Validation runs in a fixed order and stops at the first failure:
//! method, key secret configured, body readable and parses, required fields
//! present, lifetime valid. Only then is the issuer invoked.

use crate::config::{DEFAULT_AUDIENCE, DEFAULT_TTL_SECONDS};
use crate::errors::TokenServiceError;
use crate::models::{TokenRequestBody, TokenResponse};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{record_request_rejected, record_token_issuance};
use crate::routes::AppState;
use crate::services::token_issuer::{self, IssueRequest};
use axum::{body::Body, extract::State, http::Method, Json};
use bytes::Bytes;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Largest request body read from the wire.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Handle a token request.
///
/// Routed for every verb so that the 405 response carries the same JSON
/// envelope as every other error. The body is taken unbuffered so that the
/// method and configuration checks run before any of it is read.
#[instrument(name = "token.handle_request", skip_all, fields(method = %method, status))]
pub async fn handle_token_request(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Body,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let (key_material, request) = match validate_request(&state, &method, body).await {
        Ok(validated) => validated,
        Err(e) => {
            tracing::Span::current().record("status", "rejected");
            record_request_rejected(e.reason());
            return Err(e);
        }
    };

    let start = Instant::now();
    let result = token_issuer::issue_token(state.signer.as_ref(), key_material, &request);
    let duration = start.elapsed();

    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(status, duration);

    match result {
        Ok(token) => {
            tracing::info!(
                app_id_hash = %hash_for_correlation(&request.identity_id),
                kid = %request.key_id,
                ttl_seconds = request.ttl_seconds,
                "Issued token"
            );
            Ok(Json(TokenResponse::new(token)))
        }
        Err(e) => {
            tracing::error!(
                app_id_hash = %hash_for_correlation(&request.identity_id),
                kid = %request.key_id,
                "Token issuance failed"
            );
            Err(e)
        }
    }
}

/// Run the validation pipeline, yielding the key secret and issuance
/// parameters.
async fn validate_request<'a>(
    state: &'a AppState,
    method: &Method,
    body: Body,
) -> Result<(&'a SecretString, IssueRequest), TokenServiceError> {
    let key_material = check_preconditions(state, method)?;
    let body = read_body(body).await?;
    let request = build_issue_request(&body)?;

    Ok((key_material, request))
}

fn check_preconditions<'a>(
    state: &'a AppState,
    method: &Method,
) -> Result<&'a SecretString, TokenServiceError> {
    if *method != Method::POST {
        tracing::warn!(method = %method, "Rejected token request: method not allowed");
        return Err(TokenServiceError::MethodNotAllowed);
    }

    state.config.private_key.as_ref().ok_or_else(|| {
        tracing::error!("Rejected token request: private key secret is not configured");
        TokenServiceError::Configuration
    })
}

async fn read_body(body: Body) -> Result<Bytes, TokenServiceError> {
    axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::warn!(error = %e, "Rejected token request: body too large or unreadable");
        TokenServiceError::InvalidRequest("Request body is too large or unreadable".to_string())
    })
}

fn build_issue_request(body: &[u8]) -> Result<IssueRequest, TokenServiceError> {
    let parsed = parse_body(body)?;

    let identity_id = non_empty(parsed.coze_app_id);
    let key_id = non_empty(parsed.key_id);
    let (Some(identity_id), Some(key_id)) = (identity_id, key_id) else {
        tracing::warn!("Rejected token request: missing cozeAppId or keyId");
        return Err(TokenServiceError::InvalidRequest(
            "Missing required fields: cozeAppId and keyId".to_string(),
        ));
    };

    Ok(IssueRequest {
        identity_id,
        key_id,
        audience: parsed.audience.unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
        ttl_seconds: resolve_ttl(parsed.expires_in)?,
    })
}

fn parse_body(body: &[u8]) -> Result<TokenRequestBody, TokenServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        tracing::warn!("Rejected token request: empty body");
        return Err(TokenServiceError::InvalidRequest("Request body is required".to_string()));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected token request: invalid JSON body");
        TokenServiceError::InvalidRequest("Invalid JSON body".to_string())
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn resolve_ttl(expires_in: Option<i64>) -> Result<u32, TokenServiceError> {
    let Some(requested) = expires_in else {
        return Ok(DEFAULT_TTL_SECONDS);
    };

    match u32::try_from(requested) {
        Ok(ttl) if ttl > 0 => Ok(ttl),
        _ => {
            tracing::warn!(requested, "Rejected token request: invalid expiresIn");
            Err(TokenServiceError::InvalidRequest(
                "expiresIn must be a positive integer".to_string(),
            ))
        }
    }
}
