//! Config Command
//!
//! Manage Taazabites AI configuration.
//!
//! Usage:
//!   taazabites config show [-g] [-f json]
//!   taazabites config path
//!   taazabites config init [-g] [--force]

use crate::cli::{Output, OutputFormat};
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: OutputFormat) -> Result<()> {
    let out = Output::new();

    if global {
        match ConfigLoader::global_config_path() {
            Some(global_path) if global_path.exists() => {
                let content = std::fs::read_to_string(&global_path)?;
                println!("# Global Config: {}\n", global_path.display());
                println!("{}", content);
            }
            Some(_) => {
                out.info("No global config found.");
                out.info("Run 'taazabites config init --global' to create one.");
            }
            None => out.warning("Cannot determine global config directory."),
        }
    } else {
        // Merged effective config
        ConfigLoader::show_config(format == OutputFormat::Json)?;
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let out = Output::new();
    let (scope, config_path) = if global {
        ("global", ConfigLoader::init_global(force)?)
    } else {
        ("project", ConfigLoader::init_project(force)?)
    };

    out.success(&format!("Initialized {} configuration", scope));
    out.field("Config", &config_path.display().to_string());
    Ok(())
}
