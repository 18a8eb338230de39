//! Helpers for looking inside issued tokens.

use base64::engine::general_purpose;
use base64::Engine;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use token_service::crypto::TokenClaims;

use crate::crypto_fixtures::TEST_PUBLIC_KEY_PEM;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Token does not have three segments (found {0})")]
    SegmentCount(usize),

    #[error("Segment is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Segment is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token failed verification: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),
}

fn segment_json(token: &str, index: usize) -> Result<serde_json::Value, InspectError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(InspectError::SegmentCount(segments.len()));
    }
    let segment = segments
        .get(index)
        .ok_or(InspectError::SegmentCount(segments.len()))?;
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(segment)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode the header segment without verifying the signature.
pub fn decode_header_json(token: &str) -> Result<serde_json::Value, InspectError> {
    segment_json(token, 0)
}

/// Decode the payload segment without verifying the signature.
pub fn decode_payload_json(token: &str) -> Result<serde_json::Value, InspectError> {
    segment_json(token, 1)
}

/// Verify a token against the fixture public key and return its claims.
///
/// Expiry is checked; the audience must match `audience`.
pub fn verify_with_test_key(token: &str, audience: &str) -> Result<TokenClaims, InspectError> {
    let decoding_key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY_PEM.as_bytes())?;
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[audience]);

    Ok(decode::<TokenClaims>(token, &decoding_key, &validation)?.claims)
}
