//! Assertions on JSON response bodies.
//!
//! Every step decodes the body afresh, resolves its node with the path
//! grammar of [`apicheck_json::evaluate`], and reports failures with the
//! compact JSON encoding of the node it found.

use std::borrow::Cow;

use apicheck_json::{
    Comparator, JsonDocument, Template, compare_tabular_columns, compile_pattern,
    first_record_keys,
};
use serde_json::Value;

use crate::config;
use crate::error::{AssertionError, AssertionResult, ensure};
use crate::response::ResponseSource;
use crate::rest::contains_ignoring_case;
use crate::table::StepTable;

const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// JSON assertions bound to one response.
///
/// # Examples
/// ```
/// use apicheck::{JsonAssertions, RecordedResponse};
///
/// let response = RecordedResponse::builder(200)
///     .header("Content-Type", "application/json")
///     .body(r#"{"items": [{"id": 1, "name": "lamp"}], "next": null}"#)
///     .build();
/// let json = JsonAssertions::new(&response);
/// json.response_should_be_in_json().unwrap();
/// json.node_should_be_equal_to("root->items[0]->name", "lamp").unwrap();
/// json.node_should_be_null("next").unwrap();
/// json.node_should_have_elements("items", 1).unwrap();
/// json.json_should_match(r#"{"items": [{"id": 1, "name": "lamp"}], "next": null}"#).unwrap();
/// ```
#[derive(Debug)]
pub struct JsonAssertions<'r, R: ?Sized> {
    response: &'r R,
}

impl<'r, R: ResponseSource + ?Sized> JsonAssertions<'r, R> {
    /// Bind the assertions to a response.
    pub const fn new(response: &'r R) -> Self {
        Self { response }
    }

    fn document(&self) -> AssertionResult<JsonDocument> {
        Ok(JsonDocument::from_slice(self.response.body())?)
    }

    fn content_type_mentions_json(&self) -> bool {
        self.response
            .header(CONTENT_TYPE_HEADER)
            .is_some_and(|value| contains_ignoring_case(&value, "json"))
    }

    /// `Content-Type` mentions `json` and the body decodes.
    ///
    /// # Errors
    /// Fails when the header does not mention JSON, and with
    /// [`AssertionError::Json`] when the body is not valid JSON.
    pub fn response_should_be_in_json(&self) -> AssertionResult {
        ensure(self.content_type_mentions_json(), || {
            "The string 'json' was not found.".to_owned()
        })?;
        self.document().map(drop)
    }

    /// Either `Content-Type` does not mention `json` or the body does not
    /// decode.
    ///
    /// # Errors
    /// Fails when the response is JSON.
    pub fn response_should_not_be_in_json(&self) -> AssertionResult {
        let is_json = self.content_type_mentions_json()
            && JsonDocument::from_slice(self.response.body()).is_ok();
        ensure(!is_json, || "The response is in JSON".to_owned())
    }

    /// The node is a string equal to `text`.
    ///
    /// # Errors
    /// Fails when the node holds anything else, and with
    /// [`AssertionError::Json`] when the body or path is invalid.
    pub fn node_should_be_equal_to(&self, node: &str, text: &str) -> AssertionResult {
        let doc = self.document()?;
        check_string(&doc, node, text, Quote::Single)
    }

    /// Every `node | text` row of the table holds as in
    /// [`node_should_be_equal_to`](Self::node_should_be_equal_to).
    ///
    /// # Errors
    /// Fails on the first row that does not hold, and with
    /// [`AssertionError::Table`] when a row does not have two cells.
    pub fn nodes_should_be_equal_to(&self, table: &StepTable) -> AssertionResult {
        let doc = self.document()?;
        for (node, text) in table.rows_hash()? {
            check_string(&doc, node, text, Quote::Single)?;
        }
        Ok(())
    }

    /// The text of the node matches a delimited pattern such as `/^\d+$/`.
    ///
    /// # Errors
    /// Fails when the pattern does not match, and with
    /// [`AssertionError::Json`] when the pattern, body or path is invalid.
    pub fn node_should_match(&self, node: &str, pattern: &str) -> AssertionResult {
        let regex = compile_pattern(pattern)?;
        let doc = self.document()?;
        let actual = doc.read(node)?;
        ensure(regex.is_match(&node_text(actual)), || {
            Quote::Single.node_value(actual)
        })
    }

    /// The node is `null`.
    ///
    /// # Errors
    /// Fails when the node holds a value.
    pub fn node_should_be_null(&self, node: &str) -> AssertionResult {
        let doc = self.document()?;
        let actual = doc.read(node)?;
        ensure(actual.is_null(), || Quote::Backtick.node_value(actual))
    }

    /// The node exists and is not `null`.
    ///
    /// # Errors
    /// Fails when the node is `null`, and with [`AssertionError::Json`] when
    /// it does not exist.
    pub fn node_should_not_be_null(&self, node: &str) -> AssertionResult {
        let doc = self.document()?;
        let actual = doc.read(node)?;
        ensure(!actual.is_null(), || {
            format!("The node {node} should not be null")
        })
    }

    /// The node is the boolean `true`.
    ///
    /// # Errors
    /// Fails for any other value.
    pub fn node_should_be_true(&self, node: &str) -> AssertionResult {
        self.check_node(node, |actual| actual == &Value::Bool(true))
    }

    /// The node is the boolean `false`.
    ///
    /// # Errors
    /// Fails for any other value.
    pub fn node_should_be_false(&self, node: &str) -> AssertionResult {
        self.check_node(node, |actual| actual == &Value::Bool(false))
    }

    /// The node is a string equal to `text`.
    ///
    /// # Errors
    /// Fails when the node holds anything else.
    pub fn node_should_be_equal_to_the_string(
        &self,
        node: &str,
        text: &str,
    ) -> AssertionResult {
        let doc = self.document()?;
        check_string(&doc, node, text, Quote::Backtick)
    }

    /// The node is a number equal to `number`, compared as an integer when
    /// both sides are integral and as a float otherwise.
    ///
    /// # Errors
    /// Fails when the node is not that number, or `number` is not numeric.
    pub fn node_should_be_equal_to_the_number(
        &self,
        node: &str,
        number: &str,
    ) -> AssertionResult {
        self.check_node(node, |actual| number_matches(actual, number))
    }

    /// The node holds `count` elements. Lists and objects count their
    /// entries, `null` counts as empty, and any other value as one element.
    ///
    /// # Errors
    /// Fails when the count differs.
    pub fn node_should_have_elements(&self, node: &str, count: usize) -> AssertionResult {
        let doc = self.document()?;
        let actual = element_count(doc.read(node)?);
        ensure(actual == count, || {
            format!("Expected an array to contain {count} elements. Got: {actual}.")
        })
    }

    /// The text of the node contains `text`, ignoring case.
    ///
    /// # Errors
    /// Fails when `text` does not occur.
    pub fn node_should_contain(&self, node: &str, text: &str) -> AssertionResult {
        let doc = self.document()?;
        check_contains(&doc, node, text, true)
    }

    /// Every `node | text` row of the table holds as in
    /// [`node_should_contain`](Self::node_should_contain).
    ///
    /// # Errors
    /// Fails on the first row that does not hold.
    pub fn nodes_should_contain(&self, table: &StepTable) -> AssertionResult {
        let doc = self.document()?;
        for (node, text) in table.rows_hash()? {
            check_contains(&doc, node, text, true)?;
        }
        Ok(())
    }

    /// The text of the node does not contain `text`, ignoring case.
    ///
    /// # Errors
    /// Fails when `text` occurs.
    pub fn node_should_not_contain(&self, node: &str, text: &str) -> AssertionResult {
        let doc = self.document()?;
        check_contains(&doc, node, text, false)
    }

    /// Every `node | text` row of the table holds as in
    /// [`node_should_not_contain`](Self::node_should_not_contain).
    ///
    /// # Errors
    /// Fails on the first row that does not hold.
    pub fn nodes_should_not_contain(&self, table: &StepTable) -> AssertionResult {
        let doc = self.document()?;
        for (node, text) in table.rows_hash()? {
            check_contains(&doc, node, text, false)?;
        }
        Ok(())
    }

    /// The body is JSON and the node resolves. Returns the node.
    ///
    /// # Errors
    /// Fails when either does not hold.
    pub fn node_should_exist(&self, node: &str) -> AssertionResult<Value> {
        self.find_node(node)
            .ok_or_else(|| AssertionError::failed(format!("The node '{node}' does not exist.")))
    }

    /// The body is not JSON or the node does not resolve.
    ///
    /// # Errors
    /// Fails when the node exists.
    pub fn node_should_not_exist(&self, node: &str) -> AssertionResult {
        ensure(self.find_node(node).is_none(), || {
            format!("The node '{node}' exists.")
        })
    }

    fn find_node(&self, node: &str) -> Option<Value> {
        let doc = JsonDocument::from_slice(self.response.body()).ok()?;
        doc.read(node).ok().cloned()
    }

    /// The body encodes to exactly the same compact JSON as `expected`.
    /// Member order is significant.
    ///
    /// # Errors
    /// Fails when the encodings differ or `expected` is not valid JSON.
    pub fn json_should_be_equal_to(&self, expected: &str) -> AssertionResult {
        let actual = self.document()?;
        let expected = JsonDocument::parse(expected)
            .map_err(|_| AssertionError::failed("The expected JSON is not a valid"))?;
        ensure(expected.encode(false) == actual.encode(false), || {
            format!("The json is equal to:\n{}", actual.encode(true))
        })
    }

    /// The first record of the node exposes exactly the columns named in the
    /// first row of `columns`. Values are not inspected.
    ///
    /// # Errors
    /// Fails with [`AssertionError::Mismatch`] when the key sets differ.
    pub fn node_should_have_keys(&self, node: &str, columns: &StepTable) -> AssertionResult {
        let expected = columns.first_row()?;
        let doc = self.document()?;
        let keys = first_record_keys(doc.read(node)?);
        compare_tabular_columns(expected, &keys)?;
        Ok(())
    }

    /// The body matches an expected template: exactly the same top-level
    /// keys, then every member satisfying its placeholder, literal, or nested
    /// template.
    ///
    /// `<uuid>` placeholders follow [`config::strict_uuid`].
    ///
    /// # Errors
    /// Fails with [`AssertionError::Mismatch`] on the first difference, and
    /// with [`AssertionError::Json`] when `template` is malformed.
    pub fn json_should_match(&self, template: &str) -> AssertionResult {
        let template = Template::parse(template)?;
        let doc = self.document()?;
        Comparator::new(config::compare_options()).compare_document(&template, doc.content())?;
        Ok(())
    }

    fn check_node(&self, node: &str, accept: impl FnOnce(&Value) -> bool) -> AssertionResult {
        let doc = self.document()?;
        let actual = doc.read(node)?;
        ensure(accept(actual), || Quote::Backtick.node_value(actual))
    }
}

/// How a failing node value is quoted in the message.
#[derive(Debug, Clone, Copy)]
enum Quote {
    Single,
    Backtick,
}

impl Quote {
    fn node_value(self, actual: &Value) -> String {
        match self {
            Self::Single => format!("The node value is '{actual}'"),
            Self::Backtick => format!("The node value is `{actual}`"),
        }
    }
}

fn check_string(doc: &JsonDocument, node: &str, text: &str, quote: Quote) -> AssertionResult {
    let actual = doc.read(node)?;
    log::debug!("checking node {node} equals {text:?}");
    ensure(actual.as_str() == Some(text), || quote.node_value(actual))
}

fn check_contains(doc: &JsonDocument, node: &str, text: &str, expected: bool) -> AssertionResult {
    let actual = doc.read(node)?;
    let found = contains_ignoring_case(&node_text(actual), text);
    ensure(found == expected, || {
        if found {
            format!("The string '{text}' was found.")
        } else {
            format!("The string '{text}' was not found.")
        }
    })
}

/// Text of a node as substring and pattern checks see it.
fn node_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::Bool(false) | Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

fn element_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(members) => members.len(),
        Value::Null => 0,
        _ => 1,
    }
}

#[expect(
    clippy::float_cmp,
    reason = "step values are compared exactly"
)]
fn number_matches(actual: &Value, expected: &str) -> bool {
    let Value::Number(actual) = actual else {
        return false;
    };
    let expected = expected.trim();
    if let (Ok(wanted), Some(found)) = (expected.parse::<i64>(), actual.as_i64()) {
        return wanted == found;
    }
    match (expected.parse::<f64>(), actual.as_f64()) {
        (Ok(wanted), Some(found)) => wanted == found,
        _ => false,
    }
}

#[cfg(test)]
mod tests;
