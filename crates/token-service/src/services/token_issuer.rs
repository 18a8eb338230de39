//! Token issuance.
//!
//! Builds the claim set and header for a token, recovers the PEM key from the
//! configured secret, and hands both to the injected [`JwtSigner`]. No I/O and
//! no shared state; every call gets a fresh `jti`.

use crate::config::{DEFAULT_AUDIENCE, DEFAULT_TTL_SECONDS};
use crate::crypto::{self, JwtSigner, SignError, TokenClaims};
use crate::errors::TokenServiceError;
use crate::observability::hash_for_correlation;
use chrono::Utc;
use secrecy::SecretString;
use std::fmt;
use tracing::instrument;

/// Parameters of a single issuance.
#[derive(Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub identity_id: String,
    pub key_id: String,
    pub audience: String,
    pub ttl_seconds: u32,
}

impl IssueRequest {
    /// Request with the default audience and lifetime.
    pub fn new(identity_id: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            identity_id: identity_id.into(),
            key_id: key_id.into(),
            audience: DEFAULT_AUDIENCE.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: u32) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}

impl fmt::Debug for IssueRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueRequest")
            .field("identity_id", &"[REDACTED]")
            .field("key_id", &self.key_id)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// Issue a token using the current wall-clock time.
pub fn issue_token(
    signer: &dyn JwtSigner,
    key_material_base64: &SecretString,
    request: &IssueRequest,
) -> Result<String, TokenServiceError> {
    issue_token_at(signer, key_material_base64, request, Utc::now().timestamp())
}

/// Issue a token as of `now` (unix seconds).
///
/// Returns either a complete compact token or an error, never partial output.
#[instrument(
    name = "token.issue",
    skip_all,
    fields(kid = %request.key_id, app_id_hash = %hash_for_correlation(&request.identity_id))
)]
pub fn issue_token_at(
    signer: &dyn JwtSigner,
    key_material_base64: &SecretString,
    request: &IssueRequest,
    now: i64,
) -> Result<String, TokenServiceError> {
    // exp must be strictly after iat
    if request.ttl_seconds == 0 {
        tracing::error!(target: "crypto", "Refusing to sign a token with a zero lifetime");
        return Err(TokenServiceError::Signing("ttl_seconds must be positive".to_string()));
    }

    let claims = TokenClaims {
        iat: now,
        exp: now + i64::from(request.ttl_seconds),
        jti: crypto::new_jwt_id(),
        aud: request.audience.clone(),
        iss: request.identity_id.clone(),
    };
    let header = crypto::rs256_header(&request.key_id);

    let result = crypto::decode_key_material(key_material_base64)
        .and_then(|pem| signer.sign(&header, &claims, &pem));

    match result {
        Ok(token) => Ok(token),
        Err(SignError::MalformedKey(detail)) => {
            tracing::error!(
                target: "crypto",
                error = %detail,
                "Private key material is malformed; expected a base64-encoded PEM RSA private key"
            );
            Err(TokenServiceError::Signing(format!(
                "malformed key material: {detail}"
            )))
        }
        Err(SignError::Failed(detail)) => {
            tracing::error!(target: "crypto", error = %detail, "JWT signing operation failed");
            Err(TokenServiceError::Signing(detail))
        }
    }
}
