//! Error types shared by the document, path, template, and pattern modules.

use thiserror::Error;

/// Errors surfaced while decoding documents, resolving paths, or reading
/// expected templates.
///
/// Structural differences between an expected template and an actual
/// document are not errors of this kind; they are reported as
/// [`StructuralMismatch`](crate::StructuralMismatch) values.
///
/// # Examples
/// ```
/// use apicheck_json::{JsonDocument, JsonError};
///
/// let err = JsonDocument::parse("{").unwrap_err();
/// assert!(matches!(err, JsonError::Parse { .. }));
/// assert_eq!(err.to_string(), "The string '{' is not valid json");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonError {
    /// Raised when text handed to the decoder is not syntactically valid JSON.
    #[error("The string '{text}' is not valid json")]
    Parse {
        /// The rejected input, decoded lossily when it was not UTF-8.
        text: String,
        /// Decoder failure describing where the input went wrong.
        #[source]
        source: serde_json::Error,
    },
    /// Raised when a path expression cannot be resolved against a document.
    #[error("Failed to evaluate expression {expression}")]
    Evaluation {
        /// The expression exactly as the caller supplied it.
        expression: String,
    },
    /// Raised when the expected JSON written by a test author is malformed.
    #[error("The expected JSON is not a valid template: {reason}")]
    InvalidTemplate {
        /// Why the template was rejected.
        reason: String,
    },
    /// Raised when a match pattern cannot be compiled.
    #[error("The pattern {pattern} is not valid: {reason}")]
    InvalidPattern {
        /// The pattern exactly as the caller supplied it.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },
}

impl JsonError {
    pub(crate) fn evaluation(expression: &str) -> Self {
        Self::Evaluation {
            expression: expression.to_owned(),
        }
    }

    pub(crate) fn invalid_template(reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: reason.to_string(),
        }
    }
}
