//! Gemini API Provider
//!
//! Completion backend using the Gemini `generateContent` REST endpoint.
//! Free-text and JSON-mode requests differ only in `generationConfig`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{CompletionBackend, TokenUsage, UpstreamReply, UpstreamRequest};
use crate::config::GatewayConfig;
use crate::constants::{preview::MAX_BODY_PREVIEW_CHARS, upstream};
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, Result, TaazaError};

const PROVIDER_NAME: &str = "gemini";

/// Gemini REST provider
pub struct GeminiProvider {
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| upstream::DEFAULT_API_BASE.to_string());
        let api_base = Self::validate_endpoint(&api_base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                TaazaError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_base,
            model: config.model.clone(),
            client,
        })
    }

    /// Only http/https endpoints; trailing slash removed
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            TaazaError::Configuration(format!("Invalid API base URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TaazaError::Configuration(format!(
                "API base must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(request: &UpstreamRequest) -> GenerateContentRequest {
        let json_mode = request.wants_json();
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: (!request.system_instruction.is_empty()).then(|| Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: json_mode.then(|| upstream::JSON_MIME_TYPE.to_string()),
                response_schema: request.response_schema.clone(),
            },
        }
    }

    fn error(category: ErrorCategory, message: impl Into<String>) -> LlmError {
        LlmError::with_provider(category, message, PROVIDER_NAME)
    }
}

#[async_trait]
impl CompletionBackend for GeminiProvider {
    async fn generate(
        &self,
        request: &UpstreamRequest,
        api_key: &SecretString,
    ) -> std::result::Result<UpstreamReply, LlmError> {
        let start_time = Instant::now();
        let body = Self::build_request(request);

        debug!(
            model = %self.model,
            json = request.wants_json(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(upstream::API_KEY_HEADER, api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(MAX_BODY_PREVIEW_CHARS).collect();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Gemini API error ({}): {}", status, preview),
                PROVIDER_NAME,
            ));
        }

        let reply: GenerateContentResponse = response.json().await.map_err(|e| {
            Self::error(
                ErrorCategory::Unavailable,
                format!("Failed to decode Gemini response: {}", e),
            )
        })?;

        let elapsed = start_time.elapsed();
        let usage = reply
            .usage_metadata
            .as_ref()
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        if let Some(reason) = reply
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!(reason, "Gemini blocked the prompt");
            return Err(Self::error(
                ErrorCategory::Unavailable,
                format!("Prompt blocked by Gemini: {}", reason),
            ));
        }

        let text = reply.text().ok_or_else(|| {
            Self::error(ErrorCategory::Unavailable, "No text candidate in Gemini response")
        })?;

        debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Received response from Gemini"
        );

        Ok(UpstreamReply { text, usage })
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
