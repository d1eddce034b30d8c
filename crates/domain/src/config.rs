//! Connection configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_BACKOFF_INITIAL_SECS, DEFAULT_BACKOFF_MAX_SECS, DEFAULT_BACKOFF_STEP_SECS,
    DEFAULT_TIMEOUT_SECS, JSONRPC_PATH, SERVICE_COMMON, SERVICE_OBJECT,
};
use crate::errors::{Fault, Result};
use crate::types::{Endpoint, Session};

/// Everything needed to reach and authenticate against a backend
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Scheme and host, without port (e.g. `https://erp.example.com`)
    pub url: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout enforced by the transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub backoff: BackoffConfig,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ConnectionConfig {
    pub fn new(
        url: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            port,
            database: database.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            backoff: BackoffConfig::default(),
        }
    }

    /// Check the configuration before any network traffic happens
    ///
    /// # Errors
    /// Returns a `Config` fault for an unparseable or non-http(s) URL, a zero
    /// port, empty credentials, or an unusable backoff.
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| Fault::config(format!("Invalid url '{}': {}", self.url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Fault::config(format!(
                "Unsupported scheme '{}' (expected http or https)",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(Fault::config(format!("Url '{}' has no host", self.url)));
        }
        if self.port == 0 {
            return Err(Fault::config("Port must be non-zero"));
        }
        if self.database.trim().is_empty() {
            return Err(Fault::config("Database name must not be empty"));
        }
        if self.username.trim().is_empty() {
            return Err(Fault::config("Username must not be empty"));
        }
        self.backoff.validate()
    }

    /// Base address `{url}:{port}`
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }

    pub fn auth_endpoint(&self) -> Endpoint {
        Endpoint::new(format!("{}{}", self.base_url(), JSONRPC_PATH), SERVICE_COMMON)
    }

    pub fn exec_endpoint(&self) -> Endpoint {
        Endpoint::new(format!("{}{}", self.base_url(), JSONRPC_PATH), SERVICE_OBJECT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fresh, unauthenticated session for this configuration
    pub fn session(&self) -> Session {
        Session::new(
            self.database.clone(),
            self.username.clone(),
            self.password.clone(),
            self.auth_endpoint(),
            self.exec_endpoint(),
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("backoff", &self.backoff)
            .finish()
    }
}

/// Connect retry schedule: `initial`, then `+step` per failure, capped at `max`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackoffConfig {
    pub initial_secs: u64,
    pub step_secs: u64,
    pub max_secs: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_secs: DEFAULT_BACKOFF_INITIAL_SECS,
            step_secs: DEFAULT_BACKOFF_STEP_SECS,
            max_secs: DEFAULT_BACKOFF_MAX_SECS,
        }
    }
}

impl BackoffConfig {
    pub fn validate(&self) -> Result<()> {
        if self.step_secs == 0 {
            return Err(Fault::config("Backoff step must be non-zero"));
        }
        if self.initial_secs > self.max_secs {
            return Err(Fault::config(format!(
                "Backoff initial delay ({}s) exceeds maximum ({}s)",
                self.initial_secs, self.max_secs
            )));
        }
        Ok(())
    }
}
