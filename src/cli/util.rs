//! CLI Common Utilities
//!
//! Shared initialization for widget commands.

use crate::ai::CompletionGateway;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Command execution context
///
/// Loaded configuration plus the gateway built from it.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub gateway: CompletionGateway,
}

impl CommandContext {
    /// Load config (defaults → global → project → env) and build the gateway.
    ///
    /// The credential is not checked here; each call reads it.
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let gateway = CompletionGateway::from_config(&config)?;
        Ok(Self { config, gateway })
    }
}
