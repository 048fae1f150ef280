//! Assertions on the status line, headers, and raw body of a response.

use std::time::Duration;

use apicheck_json::compile_pattern;
use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{AssertionError, AssertionResult, ensure};
use crate::response::ResponseSource;

const DATE_HEADER: &str = "Date";
const EXPIRES_HEADER: &str = "Expires";
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const NO_TIMING_MESSAGE: &str = "You must send a HTTP request before checking its execution time";

/// Character encodings a body can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "us-ascii" | "ascii" => Some(Self::Ascii),
            "iso-8859-1" | "latin1" | "latin-1" => Some(Self::Latin1),
            _ => None,
        }
    }

    fn accepts(self, bytes: &[u8]) -> bool {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).is_ok(),
            Self::Ascii => bytes.is_ascii(),
            // Every byte sequence is valid Latin-1.
            Self::Latin1 => true,
        }
    }
}

/// REST assertions bound to one response.
///
/// Header values are compared case-insensitively; a missing header reads as
/// the empty string except in the existence checks.
///
/// # Examples
/// ```
/// use apicheck::{RecordedResponse, RestAssertions};
///
/// let response = RecordedResponse::builder(200)
///     .header("Content-Type", "application/json; charset=utf-8")
///     .body("{}")
///     .build();
/// let rest = RestAssertions::new(&response);
/// rest.status_code_should_be(200).unwrap();
/// rest.header_should_contain("content-type", "JSON").unwrap();
/// rest.response_should_be_encoded_in("utf-8").unwrap();
/// assert!(rest.header_should_exist("Location").is_err());
/// ```
#[derive(Debug)]
pub struct RestAssertions<'r, R: ?Sized> {
    response: &'r R,
}

impl<'r, R: ResponseSource + ?Sized> RestAssertions<'r, R> {
    /// Bind the assertions to a response.
    pub const fn new(response: &'r R) -> Self {
        Self { response }
    }

    fn header_text(&self, name: &str) -> String {
        self.response.header(name).unwrap_or_default()
    }

    /// The response status code equals `expected`.
    ///
    /// # Errors
    /// Fails when the status differs.
    pub fn status_code_should_be(&self, expected: u16) -> AssertionResult {
        let actual = self.response.status_code();
        log::debug!("checking status code {actual} against {expected}");
        ensure(actual == expected, || {
            format!("Current response status code is {actual}, but {expected} expected.")
        })
    }

    /// The body equals `expected` once `\"` escapes in the step text are
    /// undone.
    ///
    /// # Errors
    /// Fails when the body differs.
    pub fn response_should_be_equal_to(&self, expected: &str) -> AssertionResult {
        let expected = expected.replace("\\\"", "\"");
        let actual = self.response.body_text();
        ensure(actual == expected.as_str(), || {
            format!("Actual response is [{actual}], but expected [{expected}]")
        })
    }

    /// The body is empty.
    ///
    /// # Errors
    /// Fails when the body holds any bytes.
    pub fn response_should_be_empty(&self) -> AssertionResult {
        ensure(self.response.body().is_empty(), || {
            format!(
                "The response of the current page is not empty, it is: {}",
                self.response.body_text()
            )
        })
    }

    /// The header equals `value`, ignoring case.
    ///
    /// # Errors
    /// Fails when the header differs or is missing.
    pub fn header_should_be_equal_to(&self, name: &str, value: &str) -> AssertionResult {
        let actual = self.header_text(name);
        log::debug!("checking header {name} equals {value:?}");
        ensure(actual.to_lowercase() == value.to_lowercase(), || {
            format!("The header [{name}] should be equal to [{value}], but it is: [{actual}]")
        })
    }

    /// The header does not equal `value`, ignoring case.
    ///
    /// # Errors
    /// Fails when the header equals `value`.
    pub fn header_should_not_be_equal_to(&self, name: &str, value: &str) -> AssertionResult {
        let actual = self.header_text(name);
        ensure(actual.to_lowercase() != value.to_lowercase(), || {
            format!("The header [{name}] is equal to {actual}")
        })
    }

    /// The header contains `value`, ignoring case.
    ///
    /// # Errors
    /// Fails when `value` does not occur in the header.
    pub fn header_should_contain(&self, name: &str, value: &str) -> AssertionResult {
        let actual = self.header_text(name);
        log::debug!("checking header {name} contains {value:?}");
        ensure(contains_ignoring_case(&actual, value), || {
            format!(
                "The header [{name}] should contain value [{value}] but actual value is [{actual}]"
            )
        })
    }

    /// The header does not contain `value`, ignoring case.
    ///
    /// # Errors
    /// Fails when `value` occurs in the header.
    pub fn header_should_not_contain(&self, name: &str, value: &str) -> AssertionResult {
        let actual = self.header_text(name);
        ensure(!contains_ignoring_case(&actual, value), || {
            format!("The header [{name}] contains [{value}]")
        })
    }

    /// The header is present. Returns its value.
    ///
    /// # Errors
    /// Fails when the header is missing.
    pub fn header_should_exist(&self, name: &str) -> AssertionResult<String> {
        self.response
            .header(name)
            .ok_or_else(|| AssertionError::failed(format!("The header [{name}] does not exist")))
    }

    /// The header is absent.
    ///
    /// # Errors
    /// Fails when the header is present.
    pub fn header_should_not_exist(&self, name: &str) -> AssertionResult {
        ensure(self.response.header(name).is_none(), || {
            format!("The header [{name}] exists")
        })
    }

    /// The header matches a delimited pattern such as `/^no-cache/i`.
    ///
    /// # Errors
    /// Fails when the pattern does not match, or is itself invalid.
    pub fn header_should_match(&self, name: &str, pattern: &str) -> AssertionResult {
        let regex = compile_pattern(pattern)?;
        let actual = self.header_text(name);
        ensure(regex.is_match(&actual), || {
            format!("The header [{name}] should match [{pattern}], but it is: [{actual}]")
        })
    }

    /// The header does not match a delimited pattern.
    ///
    /// # Errors
    /// Fails when the pattern matches, or is itself invalid.
    pub fn header_should_not_match(&self, name: &str, pattern: &str) -> AssertionResult {
        let regex = compile_pattern(pattern)?;
        ensure(!regex.is_match(&self.header_text(name)), || {
            format!("The header [{name}] should not match [{pattern}]")
        })
    }

    /// The `Expires` header lies after the `Date` header, or after the
    /// current time when the response carries no `Date`.
    ///
    /// # Errors
    /// Fails when `Expires` is missing or not in the future, and with
    /// [`AssertionError::InvalidDate`] when either header is not an RFC 2822
    /// date.
    pub fn response_should_expire_in_the_future(&self) -> AssertionResult {
        let expires = self.date_header(EXPIRES_HEADER)?.ok_or_else(|| {
            AssertionError::failed(format!("The header [{EXPIRES_HEADER}] does not exist"))
        })?;
        let date = self
            .date_header(DATE_HEADER)?
            .unwrap_or_else(|| Utc::now().fixed_offset());
        log::debug!("checking expiry {expires} against {date}");
        ensure(expires > date, || {
            format!(
                "The response doesn't expire in the future ({})",
                expires.to_rfc3339()
            )
        })
    }

    fn date_header(&self, name: &str) -> AssertionResult<Option<DateTime<FixedOffset>>> {
        self.response
            .header(name)
            .map(|value| {
                DateTime::parse_from_rfc2822(value.trim()).map_err(|source| {
                    AssertionError::InvalidDate {
                        header: name.to_owned(),
                        value,
                        source,
                    }
                })
            })
            .transpose()
    }

    /// The body is valid in `encoding` and `Content-Type` declares it with
    /// `charset=<encoding>`.
    ///
    /// Known encodings are `UTF-8`, `US-ASCII` and `ISO-8859-1`, with the
    /// aliases `ASCII` and `latin1`.
    ///
    /// # Errors
    /// Fails when the body is invalid or the charset is not declared, and
    /// with [`AssertionError::UnsupportedEncoding`] for other encodings.
    pub fn response_should_be_encoded_in(&self, encoding: &str) -> AssertionResult {
        let known = Encoding::from_name(encoding).ok_or_else(|| {
            AssertionError::UnsupportedEncoding {
                encoding: encoding.to_owned(),
            }
        })?;
        ensure(known.accepts(self.response.body()), || {
            format!("The response is not encoded in {encoding}")
        })?;
        self.header_should_contain(CONTENT_TYPE_HEADER, &format!("charset={encoding}"))
    }

    /// The exchange took less than `limit`.
    ///
    /// # Errors
    /// Fails when the response took `limit` or longer, or when the client
    /// did not record timing.
    pub fn response_time_should_be_under(&self, limit: Duration) -> AssertionResult {
        let elapsed = self
            .response
            .elapsed()
            .ok_or_else(|| AssertionError::failed(NO_TIMING_MESSAGE))?;
        ensure(elapsed < limit, || {
            format!(
                "The response took {} ms, but the limit is {} ms",
                elapsed.as_millis(),
                limit.as_millis()
            )
        })
    }
}

pub(crate) fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
