//! Liveness probe.

/// Returns "OK" while the process can serve HTTP.
///
/// Does not look at the key secret: a process without one is still alive and
/// answers token requests with a configuration error.
pub async fn health_check() -> &'static str {
    "OK"
}
