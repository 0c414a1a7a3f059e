//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Upstream completion service constants
pub mod upstream {
    /// Default model identifier
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// Default REST API base
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Sampling temperature used for every widget call (deterministic-leaning)
    pub const DEFAULT_TEMPERATURE: f32 = 0.2;

    /// Default HTTP request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Environment variable holding the API credential
    pub const DEFAULT_CREDENTIAL_ENV: &str = "API_KEY";

    /// Header carrying the API credential
    pub const API_KEY_HEADER: &str = "x-goog-api-key";

    /// MIME type requested for schema-constrained completions
    pub const JSON_MIME_TYPE: &str = "application/json";
}

/// Retry policy constants
pub mod retry {
    /// Total attempts per gateway call (1 initial + 2 retries)
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Backoff step; the wait after failed attempt `n` is `n` steps
    pub const BACKOFF_STEP_MS: u64 = 1000;
}

/// Widget constants
pub mod studio {
    /// Upper bound requested for generated meta descriptions
    pub const META_DESCRIPTION_MAX_CHARS: usize = 160;

    /// Number of hero copy variations requested
    pub const HERO_VARIATIONS: usize = 3;

    /// Number of testimonials requested
    pub const TESTIMONIAL_COUNT: usize = 3;
}

/// Log preview constants
pub mod preview {
    /// Maximum characters of an upstream body quoted in errors and logs
    pub const MAX_BODY_PREVIEW_CHARS: usize = 200;
}
