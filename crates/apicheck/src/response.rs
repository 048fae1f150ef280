//! The HTTP response an assertion inspects.
//!
//! Sending requests is the job of whatever client drives the scenario. The
//! assertions only need read access to the last response, expressed by the
//! [`ResponseSource`] trait. [`RecordedResponse`] is a ready-made snapshot
//! for clients that buffer the response and for tests.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

/// Read access to the most recent HTTP response.
pub trait ResponseSource {
    /// The status code.
    fn status_code(&self) -> u16;

    /// The value of a header, matched case-insensitively. Repeated headers
    /// are joined with `", "`.
    fn header(&self, name: &str) -> Option<String>;

    /// Every header with all of its values.
    fn headers(&self) -> BTreeMap<String, Vec<String>>;

    /// The raw body.
    fn body(&self) -> &[u8];

    /// Time taken to receive the response, when the client measured it.
    fn elapsed(&self) -> Option<Duration> {
        None
    }

    /// The body decoded as UTF-8, replacing invalid sequences.
    fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.body())
    }
}

impl<T: ResponseSource + ?Sized> ResponseSource for &T {
    fn status_code(&self) -> u16 {
        (**self).status_code()
    }

    fn header(&self, name: &str) -> Option<String> {
        (**self).header(name)
    }

    fn headers(&self) -> BTreeMap<String, Vec<String>> {
        (**self).headers()
    }

    fn body(&self) -> &[u8] {
        (**self).body()
    }

    fn elapsed(&self) -> Option<Duration> {
        (**self).elapsed()
    }
}

/// An immutable snapshot of a received response.
///
/// # Examples
/// ```
/// use apicheck::{RecordedResponse, ResponseSource};
///
/// let response = RecordedResponse::builder(200)
///     .header("Content-Type", "application/json")
///     .header("Vary", "Accept")
///     .header("vary", "Origin")
///     .body(r#"{"ok": true}"#)
///     .build();
/// assert_eq!(response.header("content-type").as_deref(), Some("application/json"));
/// assert_eq!(response.header("VARY").as_deref(), Some("Accept, Origin"));
/// assert_eq!(response.body_text(), r#"{"ok": true}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedResponse {
    status: u16,
    headers: Vec<(String, Vec<String>)>,
    body: Vec<u8>,
    elapsed: Option<Duration>,
}

impl RecordedResponse {
    /// Start recording a response with the given status code.
    #[must_use]
    pub fn builder(status: u16) -> RecordedResponseBuilder {
        RecordedResponseBuilder {
            response: Self {
                status,
                ..Self::default()
            },
        }
    }

    fn values(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}

impl ResponseSource for RecordedResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.values(name).map(|values| values.join(", "))
    }

    fn headers(&self) -> BTreeMap<String, Vec<String>> {
        self.headers.iter().cloned().collect()
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

/// Builder for [`RecordedResponse`].
#[derive(Debug, Clone)]
#[must_use]
pub struct RecordedResponseBuilder {
    response: RecordedResponse,
}

impl RecordedResponseBuilder {
    /// Append a header value. Names are matched case-insensitively; the
    /// spelling of the first occurrence is kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .response
            .headers
            .iter_mut()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.response.headers.push((name, vec![value])),
        }
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.response.body = body.into();
        self
    }

    /// Record how long the exchange took.
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.response.elapsed = Some(elapsed);
        self
    }

    /// Finish recording.
    #[must_use]
    pub fn build(self) -> RecordedResponse {
        self.response
    }
}
