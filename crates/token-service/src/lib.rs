//! Coze Token Service Library
//!
//! Issues short-lived RS256-signed JWTs asserting a Coze application identity.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Key decoding and the signing capability
//! - `errors` - Error types and their HTTP mapping
//! - `handlers` - HTTP request handlers
//! - `models` - Request and response bodies
//! - `observability` - Log correlation and metrics
//! - `routes` - Router and shared state
//! - `services` - Token issuance

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
