//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//!
//! Two layers:
//!
//! - [`LlmError`]: one failed attempt against the upstream service, classified
//!   by [`ErrorCategory`] for diagnostics. Attempt failures are logged and
//!   retried by the gateway; callers never see them directly.
//! - [`TaazaError`]: what callers receive. The upstream-facing variants carry
//!   a short user-readable message for display and keep the last attempt's
//!   cause as their `source()`.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Classification of a single failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the upstream (429)
    RateLimit,
    /// Credential rejected (401/403)
    Auth,
    /// Connectivity problem or request timeout
    Network,
    /// Model or endpoint unavailable, or no usable candidate returned
    Unavailable,
    /// Upstream rejected the request (400)
    BadRequest,
    /// Response body could not be parsed into the expected shape
    ParseError,
    /// Temporary server-side failure (5xx)
    Transient,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether the attempt reached the upstream and failed on the response body.
    ///
    /// Decides between [`TaazaError::Parse`] and [`TaazaError::Upstream`] once
    /// retries are exhausted.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::ParseError)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// One failed attempt, with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for diagnostics and final error mapping
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Add provider context to existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Attempt failure for a response that did not parse
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ParseError, message)
    }

    pub fn is_parse_failure(&self) -> bool {
        self.category.is_parse_failure()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport and HTTP failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500..=599 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a transport-level failure from the HTTP client.
    ///
    /// An unreadable response envelope is a service fault, not a parse failure;
    /// `ParseError` is reserved for the model's own JSON output.
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::Unavailable
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, format!("request failed: {}", err), provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

/// Coarse error kind for callers that branch on the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidRequest,
    Upstream,
    Parse,
    Io,
    Json,
}

#[derive(Debug, Error)]
pub enum TaazaError {
    /// Missing credential or invalid configuration. Never retried.
    #[error("{0}")]
    Configuration(String),

    /// The caller built an unusable request. Never retried.
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream call kept failing until retries ran out.
    #[error("{message}")]
    Upstream {
        message: String,
        attempts: u32,
        #[source]
        cause: LlmError,
    },

    /// The upstream kept answering with something that is not valid JSON.
    #[error("{message}")]
    Parse {
        message: String,
        attempts: u32,
        #[source]
        cause: LlmError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaazaError>;

impl TaazaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
        }
    }

    /// Message suitable for an inline error area in the UI
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Number of upstream attempts made before giving up (0 if none)
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Upstream { attempts, .. } | Self::Parse { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    /// The last attempt's underlying cause, if the upstream was reached
    pub fn cause(&self) -> Option<&LlmError> {
        match self {
            Self::Upstream { cause, .. } | Self::Parse { cause, .. } => Some(cause),
            _ => None,
        }
    }

    pub fn missing_credential(var: &str) -> Self {
        Self::Configuration(format!(
            "{} environment variable not set. Please configure it in your environment.",
            var
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
