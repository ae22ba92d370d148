//! Session configuration.

use std::env;
use std::time::Duration;

use crate::classify::NumberMode;
use crate::error::{QuantumError, Result};
use crate::retry::RetryPolicy;

pub(crate) const DEFAULT_API_URL: &str = "https://api.quantum.socialmetrix.com";
pub(crate) const DEFAULT_API_VERSION: &str = "v1";

/// How the client authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// An account id and an already issued bearer token.
    Token { account_id: String, token: String },
    /// A long-lived API secret exchanged for a token at construction.
    Secret(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token { account_id, .. } => f
                .debug_struct("Token")
                .field("account_id", account_id)
                .finish_non_exhaustive(),
            Self::Secret(_) => f.write_str("Secret(..)"),
        }
    }
}

impl Credentials {
    /// Read credentials from environment variables.
    ///
    /// Uses `QUANTUM_ACCOUNT_ID` and `QUANTUM_TOKEN` when both are set,
    /// otherwise `QUANTUM_API_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither form of credentials is available.
    pub fn from_env() -> Result<Self> {
        if let (Ok(account_id), Ok(token)) =
            (env::var("QUANTUM_ACCOUNT_ID"), env::var("QUANTUM_TOKEN"))
        {
            return Ok(Self::Token { account_id, token });
        }

        env::var("QUANTUM_API_SECRET").map(Self::Secret).map_err(|_| {
            QuantumError::ConfigMissing(
                "set QUANTUM_ACCOUNT_ID and QUANTUM_TOKEN, or QUANTUM_API_SECRET".to_string(),
            )
        })
    }
}

/// Settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API host, without the version segment.
    pub base_url: String,
    /// Version path segment (e.g. `v1`).
    pub version: String,
    /// Per-request timeout. `None` lets requests block indefinitely.
    pub timeout: Option<Duration>,
    /// Retry budget for each request.
    pub retry: RetryPolicy,
    /// How numbers in responses are decoded.
    pub number_mode: NumberMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            timeout: None,
            retry: RetryPolicy::default(),
            number_mode: NumberMode::default(),
        }
    }
}

impl ClientConfig {
    /// Read optional settings from environment variables.
    ///
    /// `QUANTUM_API_URL`, `QUANTUM_API_VERSION`, `QUANTUM_TIMEOUT_SECS` and
    /// `QUANTUM_RETRIES` override the defaults when set.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("QUANTUM_API_URL") {
            config.base_url = url;
        }
        if let Ok(version) = env::var("QUANTUM_API_VERSION") {
            config.version = version;
        }
        if let Ok(secs) = env::var("QUANTUM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                QuantumError::ConfigMissing(format!("QUANTUM_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Ok(retries) = env::var("QUANTUM_RETRIES") {
            let retries: u32 = retries.parse().map_err(|_| {
                QuantumError::ConfigMissing(format!("QUANTUM_RETRIES is not a number: {retries}"))
            })?;
            config.retry = config.retry.with_retries(retries);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retry = self.retry.with_retries(retries);
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_number_mode(mut self, number_mode: NumberMode) -> Self {
        self.number_mode = number_mode;
        self
    }

    /// The versioned API root, without a trailing slash.
    pub(crate) fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let version = self.version.trim_matches('/');
        if version.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{version}")
        }
    }
}
