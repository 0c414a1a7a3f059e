//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/taazabites/config.toml)
//! 3. Project config (.taazabites/config.toml)
//! 4. Environment variables (TAAZA_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
