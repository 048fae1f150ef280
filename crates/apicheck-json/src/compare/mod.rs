//! Structural comparison of expected templates against actual documents.
//!
//! Two checks run at every object level. The key-set check requires both
//! sides to expose exactly the same keys and reports unexpected and missing
//! keys together. The value check walks the template and stops at the first
//! member whose value fails its placeholder, literal, or nested template.

mod record;


use hashbrown::HashSet;
use serde_json::{Map, Value};

use crate::diagnostics::{Expectation, StructuralMismatch};
use crate::template::{Template, TemplateNode, TemplateObject};

use record::Record;

/// Outcome of a structural comparison.
pub type Comparison = Result<(), StructuralMismatch>;

/// Switches applied while comparing values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Validate `<uuid>` leaves as textual UUIDs rather than accepting any
    /// non-empty string.
    pub strict_uuid: bool,
}

/// Compares templates against actual values under fixed [`CompareOptions`].
///
/// A comparator holds no state between calls; the same inputs always give
/// the same result.
///
/// # Examples
/// ```
/// use apicheck_json::{Comparator, CompareOptions, Template};
/// use serde_json::json;
///
/// let template = Template::parse(r#"{"id": "<int>", "tags": ["a"]}"#).unwrap();
/// let comparator = Comparator::new(CompareOptions::default());
/// assert!(comparator.compare_document(&template, &json!({"id": 1, "tags": ["a"]})).is_ok());
///
/// let err = comparator
///     .compare_document(&template, &json!({"id": "1", "tags": ["a"]}))
///     .unwrap_err();
/// assert_eq!(err.summary(), "The value of key [id] does not match <int>");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    /// Create a comparator.
    #[must_use]
    pub const fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    /// The options this comparator applies.
    #[must_use]
    pub const fn options(&self) -> CompareOptions {
        self.options
    }

    /// Check the values of one object level against an object template.
    ///
    /// Nested object templates get their own key-set check, reported with
    /// the key of the nesting member as context. Value mismatches name the
    /// full dotted path.
    ///
    /// # Errors
    /// Returns the first [`StructuralMismatch`] encountered.
    pub fn compare_values(
        &self,
        expected: &TemplateObject,
        actual: &Map<String, Value>,
    ) -> Comparison {
        self.compare_members(expected.iter(), Record::Map(actual), None)
    }

    /// Run the full check of a document: top-level keys first, then values.
    ///
    /// A list template is compared by position. A scalar document exposes
    /// no keys, so any non-empty template reports all its keys as missing.
    /// Failures dump the whole template and the whole document.
    ///
    /// # Errors
    /// Returns the first [`StructuralMismatch`] encountered.
    pub fn compare_document(&self, template: &Template, actual: &Value) -> Comparison {
        let record = Record::of(actual);
        compare_keys(template.keys(), record.keys(), None)
            .and_then(|()| match template {
                Template::Object(object) => self.compare_members(object.iter(), record, None),
                Template::List(items) => self.compare_members(
                    items
                        .iter()
                        .enumerate()
                        .map(|(position, node)| (position.to_string(), node)),
                    record,
                    None,
                ),
            })
            .map_err(|mismatch| {
                log::debug!("document does not match template: {}", mismatch.summary());
                mismatch.with_dump(template.to_value(), actual.clone())
            })
    }

    /// `parent` is the dotted path of the enclosing member, used for value
    /// mismatches; key-set mismatches name only its last key.
    fn compare_members<'t, I, K>(
        &self,
        members: I,
        actual: Record<'_>,
        parent: Option<(&str, &str)>,
    ) -> Comparison
    where
        I: IntoIterator<Item = (K, &'t TemplateNode)>,
        K: AsRef<str>,
    {
        for (key, node) in members {
            let key = key.as_ref();
            let Some(value) = actual.get(key) else {
                return Err(StructuralMismatch::keys(
                    Vec::new(),
                    vec![key.to_owned()],
                    parent.map(|(_, context)| context.to_owned()),
                    key_list([key]),
                    key_list(actual.keys()),
                ));
            };
            let path = join_path(parent.map(|(path, _)| path), key);
            self.compare_node(node, value, &path, key)?;
        }
        Ok(())
    }

    fn compare_node(
        &self,
        node: &TemplateNode,
        actual: &Value,
        path: &str,
        key: &str,
    ) -> Comparison {
        log::trace!("comparing member {path}");
        let mismatch = |expectation| {
            StructuralMismatch::value(path.to_owned(), expectation, node.to_value(), actual.clone())
        };
        match node {
            TemplateNode::Placeholder(placeholder) => {
                if placeholder.accepts(actual, self.options.strict_uuid) {
                    Ok(())
                } else {
                    Err(mismatch(Expectation::Placeholder(*placeholder)))
                }
            }
            TemplateNode::Literal(expected) => {
                if expected == actual {
                    Ok(())
                } else {
                    Err(mismatch(Expectation::Literal))
                }
            }
            TemplateNode::Object(object) => {
                let Value::Object(members) = actual else {
                    return Err(mismatch(Expectation::Object));
                };
                compare_keys(object.keys(), members.keys(), Some(key))?;
                self.compare_members(object.iter(), Record::Map(members), Some((path, key)))
            }
        }
    }
}

fn join_path(parent: Option<&str>, key: &str) -> String {
    parent.map_or_else(|| key.to_owned(), |parent| format!("{parent}.{key}"))
}

fn key_list<I>(keys: I) -> Value
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Value::Array(
        keys.into_iter()
            .map(|key| Value::String(key.as_ref().to_owned()))
            .collect(),
    )
}

/// Keep the first occurrence of every key, preserving order.
fn first_seen<I>(keys: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for key in keys {
        let key = key.as_ref();
        if seen.insert(key.to_owned()) {
            ordered.push(key.to_owned());
        }
    }
    ordered
}

/// Check that two key sets are equal.
///
/// Keys present in `actual` but not `expected` are reported as "must not be
/// present"; keys present in `expected` but not `actual` as "missing". Both
/// clauses appear together when both apply, in first-seen order, suffixed
/// with `in parent <context>` when a context is given. The dump lists both
/// key sets.
///
/// # Errors
/// Returns a [`StructuralMismatch`] describing the differences.
///
/// # Examples
/// ```
/// use apicheck_json::compare_keys;
///
/// assert!(compare_keys(["a", "b"], ["b", "a"], None).is_ok());
/// let err = compare_keys(["foo", "bar"], ["foo"], None).unwrap_err();
/// assert_eq!(err.summary(), "Keys [bar] are missing");
/// ```
pub fn compare_keys<E, A>(expected: E, actual: A, context: Option<&str>) -> Comparison
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    let expected = first_seen(expected);
    let actual = first_seen(actual);
    let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let actual_set: HashSet<&str> = actual.iter().map(String::as_str).collect();
    let extra: Vec<String> = actual
        .iter()
        .filter(|key| !expected_set.contains(key.as_str()))
        .cloned()
        .collect();
    let missing: Vec<String> = expected
        .iter()
        .filter(|key| !actual_set.contains(key.as_str()))
        .cloned()
        .collect();
    if extra.is_empty() && missing.is_empty() {
        return Ok(());
    }
    log::debug!(
        "key sets differ{}: extra {extra:?}, missing {missing:?}",
        context.map_or_else(String::new, |parent| format!(" in {parent}"))
    );
    Err(StructuralMismatch::keys(
        extra,
        missing,
        context.map(str::to_owned),
        key_list(&expected),
        key_list(&actual),
    ))
}

/// Check one object level against an object template with default options.
///
/// # Errors
/// Returns the first [`StructuralMismatch`] encountered.
pub fn compare_values(expected: &TemplateObject, actual: &Map<String, Value>) -> Comparison {
    Comparator::default().compare_values(expected, actual)
}

/// Check that the first record of a collection exposes exactly the expected
/// columns. Values are not inspected.
///
/// Pair with [`first_record_keys`] to extract the actual keys.
///
/// # Errors
/// Returns a [`StructuralMismatch`] describing the differences.
///
/// # Examples
/// ```
/// use apicheck_json::{compare_tabular_columns, first_record_keys};
/// use serde_json::json;
///
/// let items = json!([{"id": 1, "name": "a"}, {"id": 2}]);
/// let keys = first_record_keys(&items);
/// assert!(compare_tabular_columns(["id", "name"], &keys).is_ok());
/// assert!(compare_tabular_columns(["id"], &keys).is_err());
/// ```
pub fn compare_tabular_columns<E, A>(expected_columns: E, actual_first_row_keys: A) -> Comparison
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    compare_keys(expected_columns, actual_first_row_keys, None)
}

/// Keys of the first record of a collection.
///
/// The first record is the first list element, or the first member value of
/// an object. When there is no first record, or it is not an object, the
/// result is empty.
#[must_use]
pub fn first_record_keys(collection: &Value) -> Vec<String> {
    match Record::of(collection).first() {
        Some(Value::Object(members)) => members.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
