//! Decoded JSON documents and their textual encodings.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::errors::JsonError;
use crate::path;

const PRETTY_INDENT: &[u8] = b"    ";

/// A decoded JSON document.
///
/// The document is decoded once per assertion and then navigated with path
/// expressions. Object members keep their source order, so the compact and
/// pretty encodings reproduce the input layout key for key.
///
/// # Examples
/// ```
/// use apicheck_json::JsonDocument;
///
/// let doc = JsonDocument::parse(r#"{"foo": {"bar": [1, 2]}}"#).unwrap();
/// assert_eq!(doc.read("foo.bar[1]").unwrap(), &serde_json::json!(2));
/// assert_eq!(doc.to_string(), r#"{"foo":{"bar":[1,2]}}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    content: Value,
}

impl JsonDocument {
    /// Decode a document from text.
    ///
    /// # Errors
    /// Returns [`JsonError::Parse`] when `text` is not valid JSON, including
    /// the empty string.
    pub fn parse(text: &str) -> Result<Self, JsonError> {
        serde_json::from_str(text)
            .map(Self::from_value)
            .map_err(|source| {
                log::debug!("rejected JSON input: {source}");
                JsonError::Parse {
                    text: text.to_owned(),
                    source,
                }
            })
    }

    /// Decode a document from raw response bytes.
    ///
    /// # Errors
    /// Returns [`JsonError::Parse`] when `bytes` do not hold valid JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, JsonError> {
        serde_json::from_slice(bytes)
            .map(Self::from_value)
            .map_err(|source| {
                log::debug!("rejected JSON body: {source}");
                JsonError::Parse {
                    text: String::from_utf8_lossy(bytes).into_owned(),
                    source,
                }
            })
    }

    /// Wrap an already decoded value.
    #[must_use]
    pub const fn from_value(content: Value) -> Self {
        Self { content }
    }

    /// Borrow the decoded root value.
    #[must_use]
    pub const fn content(&self) -> &Value {
        &self.content
    }

    /// Consume the document, returning the root value.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.content
    }

    /// Resolve a path expression against the document.
    ///
    /// # Errors
    /// Returns [`JsonError::Evaluation`] when the expression does not address
    /// a node of this document.
    pub fn read(&self, expression: &str) -> Result<&Value, JsonError> {
        path::evaluate(&self.content, expression)
    }

    /// Encode the document, either compact or pretty-printed with a
    /// four-space indent.
    #[must_use]
    pub fn encode(&self, pretty: bool) -> String {
        if pretty {
            to_pretty_string(&self.content)
        } else {
            self.content.to_string()
        }
    }
}

impl fmt::Display for JsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.content, f)
    }
}

impl From<Value> for JsonDocument {
    fn from(content: Value) -> Self {
        Self::from_value(content)
    }
}

/// Pretty-print a value with a four-space indent.
///
/// Slashes and non-ASCII characters are written unescaped.
///
/// # Examples
/// ```
/// use apicheck_json::to_pretty_string;
///
/// let text = to_pretty_string(&serde_json::json!({"a": [1]}));
/// assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}");
/// ```
#[must_use]
pub fn to_pretty_string(value: &Value) -> String {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buffer).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("")]
    #[case("{")]
    #[case("<note><to>Tove</to></note>")]
    #[case("{\"foo\": }")]
    fn rejects_invalid_text(#[case] text: &str) {
        let Err(err) = JsonDocument::parse(text) else {
            panic!("{text:?} should not decode");
        };
        assert_eq!(err.to_string(), format!("The string '{text}' is not valid json"));
    }

    #[test]
    fn decodes_lists_and_scalars() {
        let doc = JsonDocument::parse("[1, \"two\", null]")
            .unwrap_or_else(|err| panic!("list should decode: {err}"));
        assert_eq!(doc.content(), &json!([1, "two", null]));

        let doc =
            JsonDocument::parse("42").unwrap_or_else(|err| panic!("scalar should decode: {err}"));
        assert_eq!(doc.into_inner(), json!(42));
    }

    #[test]
    fn keeps_member_order_in_compact_encoding() {
        let doc = JsonDocument::parse(r#"{"zeta": 1, "alpha": {"b": 2, "a": 1}}"#)
            .unwrap_or_else(|err| panic!("object should decode: {err}"));
        assert_eq!(doc.encode(false), r#"{"zeta":1,"alpha":{"b":2,"a":1}}"#);
    }

    #[test]
    fn pretty_encoding_uses_four_spaces_and_raw_slashes() {
        let doc = JsonDocument::from_value(json!({"bar": "Lorem/Ipsum é"}));
        assert_eq!(doc.encode(true), "{\n    \"bar\": \"Lorem/Ipsum é\"\n}");
    }

    #[test]
    fn decodes_bytes_lossily_for_diagnostics() {
        let Err(err) = JsonDocument::from_slice(b"\xff{") else {
            panic!("invalid bytes should not decode");
        };
        let JsonError::Parse { text, .. } = err else {
            panic!("expected a parse error");
        };
        assert_eq!(text, "\u{fffd}{");
    }
}
