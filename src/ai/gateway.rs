//! AI Completion Gateway
//!
//! Single entry point for every widget that talks to the upstream model.
//! Two call shapes are offered:
//!
//! - [`CompletionGateway::complete_text`]: free text, returned verbatim
//! - [`CompletionGateway::complete_json`]: `application/json` output
//!   constrained by a [`SchemaDescriptor`], fence-stripped and parsed
//!
//! Each call reads the credential first, then drives the backend through
//! the [`RetryPolicy`]. Attempt failures are logged and retried; once the
//! budget is spent the caller receives a [`TaazaError`] carrying a short
//! user-readable message, with the last attempt's cause as its source.

use std::sync::Arc;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use super::credential::CredentialSource;
use super::provider::{SharedBackend, UpstreamRequest, create_backend};
use super::retry::{RetryExhausted, RetryPolicy, SharedSleeper, TokioSleeper};
use super::schema::SchemaDescriptor;
use super::validation::process_json_response;
use crate::config::Config;
use crate::constants::upstream;
use crate::types::{LlmError, Result, TaazaError};

const TEXT_UPSTREAM_MESSAGE: &str =
    "Failed to get a response from the AI after multiple retries. Please try again.";
const JSON_UPSTREAM_MESSAGE: &str = "AI failed to generate a valid plan after multiple retries. Please check your inputs and try again.";
const PARSE_MESSAGE: &str =
    "The AI returned an invalid response format after multiple retries. Please try again.";
const EMPTY_PROMPT_MESSAGE: &str = "Prompt must not be empty.";

/// Call shape as seen by error mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallShape {
    Text,
    Json,
}

impl CallShape {
    fn label(self) -> &'static str {
        match self {
            Self::Text => "text completion",
            Self::Json => "JSON completion",
        }
    }

    fn upstream_message(self) -> &'static str {
        match self {
            Self::Text => TEXT_UPSTREAM_MESSAGE,
            Self::Json => JSON_UPSTREAM_MESSAGE,
        }
    }
}

// =============================================================================
// Request / Result
// =============================================================================

/// Expected response shape
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Text,
    Json(SchemaDescriptor),
}

/// One completion request, built per user action
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub shape: ResponseShape,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            shape: ResponseShape::Text,
        }
    }

    pub fn json(
        prompt: impl Into<String>,
        system_instruction: impl Into<String>,
        schema: SchemaDescriptor,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            shape: ResponseShape::Json(schema),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    Text(String),
    Json(Value),
}

impl CompletionResult {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Retrying front for a [`CompletionBackend`](super::provider::CompletionBackend).
///
/// Cheap to clone; concurrent calls share only immutable state.
#[derive(Clone)]
pub struct CompletionGateway {
    backend: SharedBackend,
    credential: CredentialSource,
    sleeper: SharedSleeper,
    policy: RetryPolicy,
    temperature: f32,
    strict_schema: bool,
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGateway")
            .field("backend", &self.backend.name())
            .field("model", &self.backend.model())
            .field("credential", &self.credential)
            .field("policy", &self.policy)
            .field("temperature", &self.temperature)
            .field("strict_schema", &self.strict_schema)
            .finish()
    }
}

impl CompletionGateway {
    /// Gateway with the default retry policy and temperature
    pub fn new(backend: SharedBackend, credential: CredentialSource) -> Self {
        Self {
            backend,
            credential,
            sleeper: Arc::new(TokioSleeper),
            policy: RetryPolicy::default(),
            temperature: upstream::DEFAULT_TEMPERATURE,
            strict_schema: false,
        }
    }

    /// Build the production gateway described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let backend = create_backend(&config.gateway)?;
        let credential = CredentialSource::from_env(&config.gateway.credential_env);

        Ok(Self::new(backend, credential)
            .with_policy(config.retry_policy())
            .with_temperature(config.gateway.temperature)
            .with_strict_schema(config.gateway.strict_schema))
    }

    pub fn with_sleeper(mut self, sleeper: SharedSleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Free-text completion. The body is returned verbatim.
    #[instrument(skip(self, prompt, system_instruction), fields(model = %self.backend.model()))]
    pub async fn complete_text(&self, prompt: &str, system_instruction: &str) -> Result<String> {
        let request = self.upstream_request(prompt, system_instruction, None);
        self.execute(CallShape::Text, request, Ok)
            .await
    }

    /// Schema-constrained JSON completion, parsed after fence stripping
    #[instrument(skip(self, prompt, system_instruction, schema), fields(model = %self.backend.model()))]
    pub async fn complete_json(
        &self,
        prompt: &str,
        system_instruction: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value> {
        let request = self.upstream_request(
            prompt,
            system_instruction,
            Some(schema.to_upstream_schema()),
        );
        let strict = self.strict_schema;
        self.execute(CallShape::Json, request, |text| {
            process_json_response(&text, schema, strict)
        })
        .await
    }

    /// [`complete_json`](Self::complete_json) deserialized into `T`.
    ///
    /// A value that does not fit `T` fails the attempt like malformed JSON.
    #[instrument(skip(self, prompt, system_instruction, schema), fields(model = %self.backend.model()))]
    pub async fn complete_json_as<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system_instruction: &str,
        schema: &SchemaDescriptor,
    ) -> Result<T> {
        let request = self.upstream_request(
            prompt,
            system_instruction,
            Some(schema.to_upstream_schema()),
        );
        let strict = self.strict_schema;
        self.execute(CallShape::Json, request, |text| {
            let value = process_json_response(&text, schema, strict)?;
            serde_json::from_value::<T>(value).map_err(|e| {
                LlmError::parse(format!("response does not fit the expected type: {}", e))
            })
        })
        .await
    }

    /// Dispatch on the request's [`ResponseShape`]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult> {
        match &request.shape {
            ResponseShape::Text => self
                .complete_text(&request.prompt, &request.system_instruction)
                .await
                .map(CompletionResult::Text),
            ResponseShape::Json(schema) => self
                .complete_json(&request.prompt, &request.system_instruction, schema)
                .await
                .map(CompletionResult::Json),
        }
    }

    fn upstream_request(
        &self,
        prompt: &str,
        system_instruction: &str,
        response_schema: Option<Value>,
    ) -> UpstreamRequest {
        UpstreamRequest {
            prompt: prompt.to_string(),
            system_instruction: system_instruction.to_string(),
            temperature: self.temperature,
            response_schema,
        }
    }

    /// Preconditions, then retried attempts, then error mapping
    async fn execute<T, P>(
        &self,
        shape: CallShape,
        request: UpstreamRequest,
        process: P,
    ) -> Result<T>
    where
        P: Fn(String) -> std::result::Result<T, LlmError>,
    {
        let api_key = self.api_key()?;

        if request.prompt.trim().is_empty() {
            return Err(TaazaError::InvalidRequest(EMPTY_PROMPT_MESSAGE.to_string()));
        }

        let label = shape.label();
        info!(
            provider = self.backend.name(),
            max_attempts = self.policy.max_attempts,
            "Starting {}",
            label
        );

        let backend = &self.backend;
        let request = &request;
        let api_key = &api_key;
        let process = &process;

        let outcome = self
            .policy
            .run(self.sleeper.as_ref(), label, move |attempt| async move {
                debug!(attempt, "Sending attempt");
                let reply = backend.generate(request, api_key).await?;
                debug!(
                    attempt,
                    input_tokens = reply.usage.input_tokens,
                    output_tokens = reply.usage.output_tokens,
                    "Attempt returned"
                );
                process(reply.text)
            })
            .await;

        match outcome {
            Ok(value) => {
                info!("Completed {}", label);
                Ok(value)
            }
            Err(RetryExhausted { attempts, error }) => {
                error!(
                    attempts,
                    category = %error.category,
                    error = %error,
                    "{} failed after all retries",
                    label
                );
                Err(Self::exhausted(shape, attempts, error))
            }
        }
    }

    fn api_key(&self) -> Result<SecretString> {
        self.credential.get().ok_or_else(|| {
            error!(source = self.credential.origin(), "API credential not available");
            TaazaError::missing_credential(self.credential.origin())
        })
    }

    /// The last attempt decides between `Parse` and `Upstream`.
    /// Text calls only ever fail with `Upstream`.
    fn exhausted(shape: CallShape, attempts: u32, cause: LlmError) -> TaazaError {
        if shape == CallShape::Json && cause.is_parse_failure() {
            TaazaError::Parse {
                message: PARSE_MESSAGE.to_string(),
                attempts,
                cause,
            }
        } else {
            TaazaError::Upstream {
                message: shape.upstream_message().to_string(),
                attempts,
                cause,
            }
        }
    }
}
