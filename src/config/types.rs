//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/taazabites/) and project (.taazabites/) level configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ai::retry::{BackoffSchedule, RetryPolicy};
use crate::constants::{retry, upstream};
use crate::types::{Result, TaazaError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Upstream service settings
    pub gateway: GatewayConfig,

    /// Retry settings shared by every gateway call
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            gateway: GatewayConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `TaazaError::Configuration` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.gateway.temperature) {
            return Err(TaazaError::Configuration(format!(
                "Gateway temperature must be between 0.0 and 2.0, got {}",
                self.gateway.temperature
            )));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(TaazaError::Configuration(
                "Gateway timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.gateway.credential_env.trim().is_empty() {
            return Err(TaazaError::Configuration(
                "Gateway credential_env must name an environment variable".to_string(),
            ));
        }

        if let Some(api_base) = &self.gateway.api_base {
            let url = url::Url::parse(api_base).map_err(|e| {
                TaazaError::Configuration(format!("Invalid gateway api_base '{}': {}", api_base, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(TaazaError::Configuration(format!(
                    "Gateway api_base must use http or https, got: {}",
                    url.scheme()
                )));
            }
        }

        if self.retry.max_attempts == 0 {
            return Err(TaazaError::Configuration(
                "Retry max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Retry policy described by the `[retry]` section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.backoff_step_ms),
            self.retry.schedule,
        )
    }
}

// =============================================================================
// Gateway Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,

    /// Base URL override (defaults to the public Gemini endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub temperature: f32,

    /// Environment variable holding the API key, read on every call
    pub credential_env: String,

    /// Check parsed JSON against the declared schema
    pub strict_schema: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: upstream::DEFAULT_MODEL.to_string(),
            api_base: None,
            timeout_secs: upstream::DEFAULT_TIMEOUT_SECS,
            temperature: upstream::DEFAULT_TEMPERATURE,
            credential_env: upstream::DEFAULT_CREDENTIAL_ENV.to_string(),
            strict_schema: false,
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first
    pub max_attempts: u32,

    /// Backoff unit in milliseconds
    pub backoff_step_ms: u64,

    pub schedule: BackoffSchedule,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            backoff_step_ms: retry::BACKOFF_STEP_MS,
            schedule: BackoffSchedule::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.gateway.provider, "gemini");
        assert_eq!(config.gateway.model, "gemini-2.5-flash");
        assert_eq!(config.gateway.credential_env, "API_KEY");
        assert!(!config.gateway.strict_schema);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = Config::default().retry_policy();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.gateway.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = Config::default();
        config.gateway.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gateway.credential_env = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_api_base() {
        let mut config = Config::default();
        config.gateway.api_base = Some("http://127.0.0.1:8080/v1beta".to_string());
        assert!(config.validate().is_ok());

        config.gateway.api_base = Some("file:///etc/passwd".to_string());
        assert!(matches!(
            config.validate(),
            Err(TaazaError::Configuration(_))
        ));

        config.gateway.api_base = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_schedule_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [retry]
            schedule = "exponential"
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.retry.schedule, BackoffSchedule::Exponential);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_step_ms, 1000);
        assert_eq!(config.gateway.model, "gemini-2.5-flash");
    }
}
