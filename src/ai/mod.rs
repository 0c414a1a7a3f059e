//! AI Integration Layer
//!
//! Completion gateway in front of the upstream generative-text service,
//! plus the pieces it is built from: backend trait, retry policy,
//! credential source, response schemas and response validation.

pub mod credential;
pub mod gateway;
pub mod prompt;
pub mod provider;
pub mod retry;
pub mod schema;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use credential::CredentialSource;
pub use gateway::{CompletionGateway, CompletionRequest, CompletionResult, ResponseShape};
pub use prompt::{PromptBuilder, PromptSection, Rule};
pub use provider::{
    CompletionBackend, GeminiProvider, SharedBackend, TokenUsage, UpstreamReply, UpstreamRequest,
    create_backend,
};
pub use retry::{
    BackoffSchedule, RecordingSleeper, RetryExhausted, RetryPolicy, RetryState, SharedSleeper,
    Sleeper, TokioSleeper,
};
pub use schema::{FieldSpec, SchemaDescriptor};
pub use validation::{ShapeIssue, parse_completion_json, strip_code_fences, validate_shape};
