//! Error type surfaced by every assertion.

use apicheck_json::{JsonError, StructuralMismatch};
use thiserror::Error;

use crate::table::TableError;

/// Result alias returned by assertion steps.
pub type AssertionResult<T = ()> = Result<T, AssertionError>;

/// Reasons an assertion step fails.
///
/// The display text of each variant is the message a scenario runner should
/// report verbatim.
///
/// # Examples
/// ```
/// use apicheck::{AssertionError, RecordedResponse, RestAssertions};
///
/// let response = RecordedResponse::builder(404).build();
/// let err = RestAssertions::new(&response).status_code_should_be(200).unwrap_err();
/// assert!(matches!(err, AssertionError::Failed { .. }));
/// assert_eq!(err.to_string(), "Current response status code is 404, but 200 expected.");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssertionError {
    /// The body, an expected literal, or a path expression was rejected.
    #[error(transparent)]
    Json(#[from] JsonError),
    /// A structural comparison found differences.
    #[error(transparent)]
    Mismatch(#[from] StructuralMismatch),
    /// The response did not satisfy the assertion.
    #[error("{message}")]
    Failed {
        /// Human-readable description of the failure.
        message: String,
    },
    /// A step data table had the wrong shape.
    #[error(transparent)]
    Table(#[from] TableError),
    /// The requested character encoding is not one the checker knows.
    #[error("The encoding {encoding} is not supported")]
    UnsupportedEncoding {
        /// Encoding name as written in the step.
        encoding: String,
    },
    /// A date header could not be parsed as an RFC 2822 timestamp.
    #[error("The header [{header}] is not a valid date: {value}")]
    InvalidDate {
        /// Header name.
        header: String,
        /// Raw header value.
        value: String,
        /// Parser failure.
        #[source]
        source: chrono::ParseError,
    },
}

impl AssertionError {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log::debug!("assertion failed: {message}");
        Self::Failed { message }
    }
}

/// Fail with `message` unless `condition` holds.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> AssertionResult {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::failed(message()))
    }
}
