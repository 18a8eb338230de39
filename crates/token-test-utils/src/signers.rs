//! Signer doubles.

use jsonwebtoken::Header;
use secrecy::SecretString;
use std::sync::atomic::{AtomicUsize, Ordering};
use token_service::crypto::{JwtSigner, Rs256Signer, SignError, TokenClaims};

/// Real RS256 signer that counts how often it is invoked.
///
/// Lets tests assert that rejected requests never reach signing.
#[derive(Debug, Default)]
pub struct CountingSigner {
    calls: AtomicUsize,
}

impl CountingSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JwtSigner for CountingSigner {
    fn sign(
        &self,
        header: &Header,
        claims: &TokenClaims,
        private_key_pem: &SecretString,
    ) -> Result<String, SignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Rs256Signer.sign(header, claims, private_key_pem)
    }
}
