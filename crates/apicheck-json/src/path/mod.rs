//! Path expressions addressing a node inside a JSON document.
//!
//! Expressions are `.`-separated property names, each optionally followed by
//! bracketed list indices: `items[0].tags[2]`, `[0].foo`, `matrix[1][0]`. A
//! leading `root.` prefix is ignored and `->` is accepted as an alias for
//! `.`. An empty expression addresses the whole document.

mod lexer;

use std::fmt;

use serde_json::Value;

use crate::errors::JsonError;

use lexer::{Step, lex_path, normalise};

/// A parsed path expression, reusable against any number of documents.
///
/// # Examples
/// ```
/// use apicheck_json::PathExpression;
/// use serde_json::json;
///
/// let path = PathExpression::parse("root->[0]->foo").unwrap();
/// let doc = json!([{"foo": "bar"}, {"bar": "baz"}]);
/// assert_eq!(path.evaluate(&doc).unwrap(), &json!("bar"));
/// assert_eq!(path.to_string(), "root->[0]->foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    steps: Vec<Step>,
}

impl PathExpression {
    /// Parse an expression.
    ///
    /// # Errors
    /// Returns [`JsonError::Evaluation`] carrying `expression` unchanged when
    /// a segment is malformed, for example an empty segment or a negative or
    /// non-numeric index.
    pub fn parse(expression: &str) -> Result<Self, JsonError> {
        let steps = lex_path(&normalise(expression)).map_err(|err| {
            log::trace!("path {expression:?} rejected: {err}");
            JsonError::evaluation(expression)
        })?;
        Ok(Self {
            source: expression.to_owned(),
            steps,
        })
    }

    /// The expression text as supplied to [`PathExpression::parse`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` when the expression addresses the whole document.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolve the expression against `root`.
    ///
    /// # Errors
    /// Returns [`JsonError::Evaluation`] when a property is absent, an index
    /// is out of range, a property is requested from a list, or an index is
    /// applied to a value that is not a list.
    pub fn evaluate<'a>(&self, root: &'a Value) -> Result<&'a Value, JsonError> {
        let mut current = root;
        for (position, step) in self.steps.iter().enumerate() {
            current = advance(current, step).ok_or_else(|| {
                log::trace!(
                    "path {:?} stopped at step {position} ({step:?})",
                    self.source
                );
                JsonError::evaluation(&self.source)
            })?;
        }
        Ok(current)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn advance<'a>(current: &'a Value, step: &Step) -> Option<&'a Value> {
    match (step, current) {
        (Step::Property(name), Value::Object(members)) => members.get(name),
        (Step::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}

/// Resolve `expression` against `root` in one call.
///
/// # Errors
/// Returns [`JsonError::Evaluation`] carrying the expression as written when it
/// is malformed or does not address a node of `root`.
///
/// # Examples
/// ```
/// use apicheck_json::evaluate;
/// use serde_json::json;
///
/// let doc = json!({"items": [[1, 2], [3, 4]]});
/// assert_eq!(evaluate(&doc, "items[1][0]").unwrap(), &json!(3));
/// assert_eq!(evaluate(&doc, "  ").unwrap(), &doc);
/// assert!(evaluate(&doc, "items[2]").is_err());
/// ```
pub fn evaluate<'a>(root: &'a Value, expression: &str) -> Result<&'a Value, JsonError> {
    PathExpression::parse(expression)?.evaluate(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn document() -> Value {
        json!({
            "id": 7,
            "items": [
                {"name": "first", "tags": ["a", "b"]},
                {"name": "second", "tags": []}
            ],
            "matrix": [[1, 2], [3, 4]],
            "empty": null
        })
    }

    #[rstest]
    #[case("id", json!(7))]
    #[case("root.id", json!(7))]
    #[case("root->id", json!(7))]
    #[case("items[1].name", json!("second"))]
    #[case("items[0].tags[1]", json!("b"))]
    #[case("items->[0]->name", json!("first"))]
    #[case("matrix[1][0]", json!(3))]
    #[case("empty", Value::Null)]
    fn resolves_nodes(document: Value, #[case] expression: &str, #[case] expected: Value) {
        let found = evaluate(&document, expression)
            .unwrap_or_else(|err| panic!("{expression:?} should resolve: {err}"));
        assert_eq!(found, &expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("root.")]
    #[case("root->")]
    fn resolves_whole_document(document: Value, #[case] expression: &str) {
        let found = evaluate(&document, expression)
            .unwrap_or_else(|err| panic!("{expression:?} should resolve: {err}"));
        assert_eq!(found, &document);
    }

    #[rstest]
    #[case("missing")]
    #[case("items[2]")]
    #[case("items.name")]
    #[case("id[0]")]
    #[case("items[-1]")]
    #[case("items[x]")]
    #[case("items[0].tags[9]")]
    #[case("id.value")]
    #[case("items..name")]
    fn reports_expression_as_written(document: Value, #[case] expression: &str) {
        let Err(err) = evaluate(&document, expression) else {
            panic!("{expression:?} should not resolve");
        };
        let JsonError::Evaluation { expression: reported } = &err else {
            panic!("expected an evaluation error, got {err:?}");
        };
        assert_eq!(reported, expression);
    }

    #[test]
    fn parsed_expression_is_reusable() {
        let path = PathExpression::parse("[0].foo")
            .unwrap_or_else(|err| panic!("path should parse: {err}"));
        let first = json!([{"foo": 1}]);
        let second = json!([{"foo": "two"}, {}]);
        assert!(!path.is_root());
        assert_eq!(path.evaluate(&first).ok(), Some(&json!(1)));
        assert_eq!(path.evaluate(&second).ok(), Some(&json!("two")));
        assert_eq!(path.as_str(), "[0].foo");
    }

    #[test]
    fn bracket_index_does_not_address_object_members() {
        let doc = json!({"0": "zero"});
        assert!(evaluate(&doc, "[0]").is_err());
        assert_eq!(evaluate(&doc, "0").ok(), Some(&json!("zero")));
    }
}
