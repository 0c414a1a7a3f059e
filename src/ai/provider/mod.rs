//! Completion Backend Abstraction
//!
//! Defines the [`CompletionBackend`] trait: one request/response round-trip
//! against a remote generative-text service. Backends do not retry and do
//! not parse JSON; they return the raw completion text or a classified
//! [`LlmError`]. Retry and parsing live in the gateway.

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::types::{LlmError, Result, TaazaError};

// =============================================================================
// Request / Reply
// =============================================================================

/// What the gateway asks the backend for on one attempt
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub temperature: f32,
    /// Upstream schema object; `Some` switches the backend to JSON mode
    pub response_schema: Option<Value>,
}

impl UpstreamRequest {
    pub fn wants_json(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// Raw completion text plus usage for logging
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub text: String,
    pub usage: TokenUsage,
}

impl UpstreamReply {
    /// Reply with text only (usage unknown)
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
        }
    }
}

/// Token usage metrics reported by the upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt + system instruction)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

// =============================================================================
// Backend Trait
// =============================================================================

/// Shared backend type for concurrent widget calls
pub type SharedBackend = Arc<dyn CompletionBackend>;

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// One round-trip. The credential is passed per call, never stored.
    async fn generate(
        &self,
        request: &UpstreamRequest,
        api_key: &SecretString,
    ) -> std::result::Result<UpstreamReply, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared backend from configuration
pub fn create_backend(config: &GatewayConfig) -> Result<SharedBackend> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config)?)),
        _ => Err(TaazaError::Configuration(format!(
            "Unknown provider: {}. Supported: gemini",
            config.provider
        ))),
    }
}
