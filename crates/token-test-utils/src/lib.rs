//! Test utilities for the Coze token service
//!
//! Provides:
//! - RSA key fixtures and encoded key secrets
//! - Token inspection and verification helpers
//! - A call-counting signer
//! - `TestTokenServer` for spawning the real router on an ephemeral port

pub mod crypto_fixtures;
pub mod server_harness;
pub mod signers;
pub mod token_inspect;

pub use crypto_fixtures::*;
pub use server_harness::TestTokenServer;
pub use signers::CountingSigner;
pub use token_inspect::*;
