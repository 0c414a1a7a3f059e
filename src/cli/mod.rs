pub mod commands;
pub mod ui;
pub mod util;

pub use ui::Output;
pub use util::CommandContext;

/// Output format for widget commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
