use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Environment variable holding the base64-wrapped PEM private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "COZE_PRIVATE_KEY_BASE64";

/// Environment variable holding the listen address.
pub const BIND_ADDRESS_ENV_VAR: &str = "BIND_ADDRESS";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Audience claim used when the caller does not supply one.
pub const DEFAULT_AUDIENCE: &str = "api.coze.cn";

/// Token lifetime used when the caller does not supply `expiresIn`.
pub const DEFAULT_TTL_SECONDS: u32 = 600;

/// Process-wide configuration, loaded once at startup and never mutated.
///
/// `private_key` is optional on purpose: a process without a key secret still
/// starts and answers every token request with a configuration error.
#[derive(Debug)]
pub struct Config {
    pub bind_address: String,
    pub private_key: Option<SecretString>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{address}': {reason}")]
    InvalidBindAddress { address: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let bind_address = vars
            .get(BIND_ADDRESS_ENV_VAR)
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // An empty value is as good as unset.
        let private_key = vars
            .get(PRIVATE_KEY_ENV_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(|value| SecretString::from(value.clone()));

        Config {
            bind_address,
            private_key,
        }
    }

    /// Parse the configured bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        match self.bind_address.parse::<SocketAddr>() {
            Ok(addr) => Ok(addr),
            Err(e) => Err(ConfigError::InvalidBindAddress {
                address: self.bind_address.clone(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }
}
