//! Client configuration
//!
//! This module handles configuration types, TOML loading, and environment
//! variable overrides for the POP3 client. Environment variables take
//! precedence over file values for container deployments:
//! `POP3_HOST`, `POP3_PORT`, `POP3_TIMEOUT_SECS`, `POP3_USE_TLS`,
//! `POP3_TLS_VERIFY_CERT`, `POP3_TLS_CERT_PATH`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::tls::TlsConfig;
use crate::types::{ServerTimeout, TextEncoding};

/// Default values for configuration fields
mod defaults {
    pub fn host() -> String {
        "localhost".to_string()
    }

    /// Standard POP3 port; POP3S deployments override this (usually 995)
    pub fn port() -> u16 {
        110
    }

    pub fn timeout_secs() -> u64 {
        10
    }

    pub fn tls_verify_cert() -> bool {
        true
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("host cannot be empty or whitespace")]
    EmptyHost,

    #[error("port cannot be 0")]
    InvalidPort,

    #[error("timeout must be at least 1 second")]
    InvalidTimeout,

    #[error("TLS certificate path cannot be empty")]
    EmptyCertPath,
}

/// Configuration for a POP3 server connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server hostname or address
    #[serde(default = "defaults::host")]
    pub host: String,

    /// Server port
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Timeout in seconds applied to connect, send, and receive
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,

    /// Decoding policy for received lines
    #[serde(default)]
    pub encoding: TextEncoding,

    /// Enable TLS for the connection
    #[serde(default)]
    pub use_tls: bool,

    /// Verify the server certificate (recommended: true)
    #[serde(default = "defaults::tls_verify_cert")]
    pub tls_verify_cert: bool,

    /// Path to a custom CA certificate file (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            timeout_secs: defaults::timeout_secs(),
            encoding: TextEncoding::default(),
            use_tls: false,
            tls_verify_cert: defaults::tls_verify_cert(),
            tls_cert_path: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given server with default settings
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file, apply environment overrides,
    /// and validate the result
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;

        config.apply_env_overrides();
        config.validate()?;

        debug!(
            "Loaded config from {}: {}:{} (tls: {})",
            path, config.host, config.port, config.use_tls
        );
        Ok(config)
    }

    /// Build a configuration from defaults plus environment overrides only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `POP3_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup (tests inject a map here
    /// so they never touch process-global environment state)
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("POP3_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("POP3_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(secs) = lookup("POP3_TIMEOUT_SECS").and_then(|t| t.parse::<u64>().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(use_tls) = lookup("POP3_USE_TLS").and_then(|v| parse_bool(&v)) {
            self.use_tls = use_tls;
        }
        if let Some(verify) = lookup("POP3_TLS_VERIFY_CERT").and_then(|v| parse_bool(&v)) {
            self.tls_verify_cert = verify;
        }
        if let Some(path) = lookup("POP3_TLS_CERT_PATH") {
            self.tls_cert_path = Some(path);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if let Some(path) = &self.tls_cert_path {
            if path.trim().is_empty() {
                return Err(ConfigError::EmptyCertPath);
            }
        }
        Ok(())
    }

    /// The configured timeout as a typed value
    #[must_use]
    pub fn timeout(&self) -> ServerTimeout {
        ServerTimeout::from_secs(self.timeout_secs)
    }

    /// The TLS settings as the connector layer consumes them
    #[must_use]
    pub fn tls_config(&self) -> TlsConfig {
        TlsConfig {
            use_tls: self.use_tls,
            tls_verify_cert: self.tls_verify_cert,
            tls_cert_path: self.tls_cert_path.clone(),
        }
    }
}

/// Lenient boolean parsing for environment values
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
