//! Signing primitives for issued tokens.
//!
//! RS256 itself is delegated to `jsonwebtoken`. This module only shapes its
//! inputs: the claim set, the header, and the PEM text recovered from the
//! configured key secret.

use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Claims carried by every issued token.
///
/// `iss` is the caller's application identity. A custom Debug implementation
/// redacts it.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
    pub jti: String, // Unique token id
    pub aud: String, // Audience
    pub iss: String, // Issuer (application identity)
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("jti", &self.jti)
            .field("aud", &self.aud)
            .field("iss", &"[REDACTED]")
            .finish()
    }
}

/// Failure reported by a [`JwtSigner`].
#[derive(Debug, Error)]
pub enum SignError {
    /// The key material could not be decoded or parsed as a private key.
    #[error("malformed key material: {0}")]
    MalformedKey(String),

    /// Anything else the signing primitive rejected.
    #[error("signing failed: {0}")]
    Failed(String),
}

/// Signing capability used by the token issuer.
///
/// Takes a header, a claim set and a PEM private key, and returns a compact
/// `header.payload.signature` token.
pub trait JwtSigner: Send + Sync {
    fn sign(
        &self,
        header: &Header,
        claims: &TokenClaims,
        private_key_pem: &SecretString,
    ) -> Result<String, SignError>;
}

/// RS256 signer backed by `jsonwebtoken`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rs256Signer;

impl JwtSigner for Rs256Signer {
    fn sign(
        &self,
        header: &Header,
        claims: &TokenClaims,
        private_key_pem: &SecretString,
    ) -> Result<String, SignError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.expose_secret().as_bytes())
            .map_err(classify_jwt_error)?;

        encode(header, claims, &encoding_key).map_err(classify_jwt_error)
    }
}

fn classify_jwt_error(err: jsonwebtoken::errors::Error) -> SignError {
    match err.kind() {
        ErrorKind::InvalidKeyFormat | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey => {
            SignError::MalformedKey(err.to_string())
        }
        _ => SignError::Failed(err.to_string()),
    }
}

/// Build the RS256 header for a token signed with key `key_id`.
///
/// The key id is embedded verbatim.
pub fn rs256_header(key_id: &str) -> Header {
    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());
    header.kid = Some(key_id.to_string());
    header
}

/// Recover PEM text from the configured key secret.
///
/// The secret is base64 wrapping PEM text. Some environments flatten
/// multi-line secrets, so literal `\n` sequences are turned back into
/// line breaks.
pub fn decode_key_material(key_material_base64: &SecretString) -> Result<SecretString, SignError> {
    let decoded = general_purpose::STANDARD
        .decode(key_material_base64.expose_secret().trim())
        .map_err(|e| SignError::MalformedKey(format!("key material is not valid base64: {e}")))?;

    let pem = String::from_utf8(decoded)
        .map_err(|_| SignError::MalformedKey("key material is not valid UTF-8".to_string()))?;

    Ok(SecretString::from(pem.replace("\\n", "\n")))
}

/// Generate a fresh token id.
pub fn new_jwt_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
