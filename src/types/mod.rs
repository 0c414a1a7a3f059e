pub mod error;

pub use error::{ErrorCategory, ErrorClassifier, ErrorKind, LlmError, Result, TaazaError};
