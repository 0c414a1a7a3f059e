pub mod config;
pub mod widgets;
