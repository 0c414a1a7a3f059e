//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/taazabites/config.toml)
//! 3. Project config (.taazabites/config.toml)
//! 4. Environment variables (TAAZA_* prefix, `__` between nested keys)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, TaazaError};

const ENV_PREFIX: &str = "TAAZA_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Load with explicit global and project file locations
    pub fn load_layers(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // e.g. TAAZA_GATEWAY__MODEL -> gateway.model
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| TaazaError::Configuration(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| TaazaError::Configuration(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/taazabites/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("taazabites"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".taazabites")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, as_json)?);
        Ok(())
    }

    /// Render configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| TaazaError::Configuration(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            TaazaError::Configuration("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;

        Ok(config_path)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        fs::create_dir_all(&project_dir)?;

        let config_path = Self::project_config_path();
        Self::write_default(&config_path, force)?;

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn write_default(path: &Path, force: bool) -> Result<()> {
        if !path.exists() || force {
            fs::write(path, Self::default_config())?;
            info!("Created config: {}", path.display());
        } else {
            info!("Config exists: {}", path.display());
        }
        Ok(())
    }

    /// Default config content (TOML)
    fn default_config() -> String {
        r#"# Taazabites AI Configuration
# Project settings in .taazabites/config.toml override the global file.
# Environment variables override both, e.g. TAAZA_GATEWAY__MODEL.

version = "1.0"

[gateway]
provider = "gemini"
model = "gemini-2.5-flash"
temperature = 0.2
timeout_secs = 60
# The API key is read from this variable on every request
credential_env = "API_KEY"
# Reject JSON responses that do not match the widget schema
strict_schema = false
# api_base = "https://generativelanguage.googleapis.com/v1beta"

[retry]
max_attempts = 3
backoff_step_ms = 1000
# "linear" (1s, 2s, ...) or "exponential" (1s, 2s, 4s, ...)
schedule = "linear"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::retry::BackoffSchedule;
    use figment::Jail;
    use tempfile::TempDir;

    fn load_in(jail: &Jail) -> Result<Config> {
        ConfigLoader::load_layers(
            Some(&jail.directory().join("global.toml")),
            &jail.directory().join(".taazabites/config.toml"),
        )
    }

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|jail| {
            let config = load_in(jail).map_err(|e| e.to_string())?;
            assert_eq!(config.version, "1.0");
            assert_eq!(config.gateway.model, "gemini-2.5-flash");
            assert_eq!(config.retry.max_attempts, 3);
            Ok(())
        });
    }

    #[test]
    fn test_project_overrides_global() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "global.toml",
                r#"
                [gateway]
                model = "global-model"
                timeout_secs = 30
                "#,
            )?;
            jail.create_dir(".taazabites")?;
            jail.create_file(
                ".taazabites/config.toml",
                r#"
                [gateway]
                model = "project-model"
                "#,
            )?;

            let config = load_in(jail).map_err(|e| e.to_string())?;
            assert_eq!(config.gateway.model, "project-model");
            assert_eq!(config.gateway.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.set_env("TAAZA_GATEWAY__MODEL", "env-model");
            jail.set_env("TAAZA_GATEWAY__CREDENTIAL_ENV", "GEMINI_KEY");
            jail.set_env("TAAZA_RETRY__SCHEDULE", "exponential");

            let config = load_in(jail).map_err(|e| e.to_string())?;
            assert_eq!(config.gateway.model, "env-model");
            assert_eq!(config.gateway.credential_env, "GEMINI_KEY");
            assert_eq!(config.retry.schedule, BackoffSchedule::Exponential);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("TAAZA_RETRY__MAX_ATTEMPTS", "0");
            let err = load_in(jail).unwrap_err();
            assert!(matches!(err, TaazaError::Configuration(_)));
            Ok(())
        });
    }

    #[test]
    fn test_default_config_file_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, ConfigLoader::default_config()).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.gateway.temperature, 0.2);
        assert_eq!(config.retry.backoff_step_ms, 1000);
        assert_eq!(config.retry.schedule, BackoffSchedule::Linear);
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let as_toml = ConfigLoader::render(&config, false).unwrap();
        assert!(as_toml.contains("[gateway]"));

        let as_json = ConfigLoader::render(&config, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&as_json).unwrap();
        assert_eq!(value["retry"]["schedule"], "linear");
    }
}
