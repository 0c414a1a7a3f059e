//! Taazabites AI - Completion Gateway for the Taazabites Website
//!
//! Every AI widget on the site (meal planner, workout coach, search,
//! testimonials, hero copy, ...) goes through one gateway that talks to a
//! hosted generative model, retries failed attempts with backoff, and turns
//! the reply into plain text or schema-conforming JSON.
//!
//! ## Core Features
//!
//! - **Single entry point**: [`CompletionGateway`] for text and JSON completions
//! - **Bounded retries**: up to 3 attempts with linear backoff
//! - **Response cleanup**: markdown code fences stripped before JSON parsing
//! - **User-facing errors**: every failure maps to a displayable message
//!
//! ## Quick Start
//!
//! ```ignore
//! use taazabites_ai::{CompletionGateway, ConfigLoader};
//! use taazabites_ai::studio::generate_search_answer;
//!
//! let config = ConfigLoader::load()?;
//! let gateway = CompletionGateway::from_config(&config)?;
//! let answer = generate_search_answer(&gateway, "Do you deliver on Sundays?").await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: gateway, retry policy, upstream provider, response validation
//! - [`studio`]: prompts, schemas and result types for each widget
//! - [`config`]: layered configuration
//! - [`cli`]: the `taazabites` command line

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod studio;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader, GatewayConfig, RetryConfig};

// Error Types
pub use types::{ErrorCategory, ErrorKind, LlmError, Result, TaazaError};

// Gateway
pub use ai::{
    CompletionGateway, CompletionRequest, CompletionResult, CredentialSource, ResponseShape,
    RetryPolicy, SchemaDescriptor,
};
