//! Transport configuration.
//!
//! ```no_run
//! use roster_client::ClientConfig;
//!
//! # fn main() -> Result<(), roster_client::ConfigError> {
//! // ROSTER_API_URL (required), ROSTER_API_TIMEOUT_SECS (optional)
//! let config = ClientConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Base URL variable
pub const API_URL_VAR: &str = "ROSTER_API_URL";

/// Request timeout variable, in whole seconds
pub const API_TIMEOUT_VAR: &str = "ROSTER_API_TIMEOUT_SECS";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// A value failed validation
    #[error("Configuration validation failed: {0}")]
    Invalid(String),
}

/// Settings for [`crate::HttpRestClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:8080/rest`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/rest".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("roster-sync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Default settings against `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvVarNotSet`] if `ROSTER_API_URL` is missing,
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url =
            lookup(API_URL_VAR).ok_or_else(|| ConfigError::EnvVarNotSet(API_URL_VAR.to_string()))?;
        let mut config = Self::new(base_url);

        if let Some(raw) = lookup(API_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{API_TIMEOUT_VAR} must be a whole number, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-HTTP base URL or a zero
    /// timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ConfigError::EnvVarNotSet("ROSTER_API_URL".to_string()))
        );
    }

    #[test]
    fn test_url_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ROSTER_API_URL", "http://backend:8080/rest"),
            ("ROSTER_API_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(
            config,
            Ok(ClientConfig::new("http://backend:8080/rest").with_timeout(Duration::from_secs(5)))
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("ROSTER_API_URL", "backend:8080")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[
                ("ROSTER_API_URL", "http://backend"),
                ("ROSTER_API_TIMEOUT_SECS", "soon"),
            ])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[
                ("ROSTER_API_URL", "http://backend"),
                ("ROSTER_API_TIMEOUT_SECS", "0"),
            ])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EnvVarNotSet("ROSTER_API_URL".to_string());
        assert_eq!(err.to_string(), "Environment variable not set: ROSTER_API_URL");
    }
}
