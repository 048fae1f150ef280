//! Structural mismatch reports with needle and haystack dumps.

use std::fmt;

use serde_json::Value;

use crate::document::to_pretty_string;
use crate::template::Placeholder;

const BANNER_WIDTH: usize = 80;

/// What a leaf of the expected template asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expectation {
    /// A placeholder constraint.
    Placeholder(Placeholder),
    /// Strict equality with a literal.
    Literal,
    /// A JSON object, because the template nests an object template there.
    Object,
}

/// The part of a comparison that failed.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MismatchKind {
    /// Key sets differ at one object level.
    Keys {
        /// Keys present in the actual value but not expected, first-seen order.
        extra: Vec<String>,
        /// Keys expected but absent from the actual value, first-seen order.
        missing: Vec<String>,
        /// Dotted key path of the enclosing object, `None` at the top level.
        context: Option<String>,
    },
    /// A single value failed its expectation.
    Value {
        /// Dotted key path of the offending member.
        path: String,
        /// The constraint that was not met.
        expectation: Expectation,
        /// The expected template fragment.
        expected: Value,
        /// The actual value found at `path`.
        actual: Value,
    },
}

/// A failed structural comparison.
///
/// The [`Display`](fmt::Display) output starts with a one-line summary and
/// then dumps the needle (expected) and haystack (actual) as pretty-printed
/// JSON framed by banners, so a failing step shows its full context.
///
/// # Examples
/// ```
/// use apicheck_json::compare_keys;
///
/// let err = compare_keys(["foo"], ["foo", "bar"], None).unwrap_err();
/// assert_eq!(err.summary(), "Keys [bar] must not be present");
/// assert!(err.to_string().contains("= Needle ="));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMismatch {
    kind: MismatchKind,
    needle: Value,
    haystack: Value,
}

impl StructuralMismatch {
    pub(crate) fn keys(
        extra: Vec<String>,
        missing: Vec<String>,
        context: Option<String>,
        needle: Value,
        haystack: Value,
    ) -> Self {
        Self {
            kind: MismatchKind::Keys {
                extra,
                missing,
                context,
            },
            needle,
            haystack,
        }
    }

    pub(crate) fn value(
        path: String,
        expectation: Expectation,
        expected: Value,
        actual: Value,
    ) -> Self {
        Self {
            kind: MismatchKind::Value {
                path,
                expectation,
                expected: expected.clone(),
                actual: actual.clone(),
            },
            needle: expected,
            haystack: actual,
        }
    }

    /// Replace the dumped needle and haystack, keeping the mismatch details.
    #[must_use]
    pub fn with_dump(mut self, needle: Value, haystack: Value) -> Self {
        self.needle = needle;
        self.haystack = haystack;
        self
    }

    /// The mismatch details.
    #[must_use]
    pub const fn kind(&self) -> &MismatchKind {
        &self.kind
    }

    /// The expected side of the dump.
    #[must_use]
    pub const fn needle(&self) -> &Value {
        &self.needle
    }

    /// The actual side of the dump.
    #[must_use]
    pub const fn haystack(&self) -> &Value {
        &self.haystack
    }

    /// Keys reported as unexpected; empty for value mismatches.
    #[must_use]
    pub fn extra_keys(&self) -> &[String] {
        match &self.kind {
            MismatchKind::Keys { extra, .. } => extra,
            MismatchKind::Value { .. } => &[],
        }
    }

    /// Keys reported as missing; empty for value mismatches.
    #[must_use]
    pub fn missing_keys(&self) -> &[String] {
        match &self.kind {
            MismatchKind::Keys { missing, .. } => missing,
            MismatchKind::Value { .. } => &[],
        }
    }

    /// The one-line summary without the dump.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.kind {
            MismatchKind::Keys {
                extra,
                missing,
                context,
            } => keys_summary(extra, missing, context.as_deref()),
            MismatchKind::Value {
                path, expectation, ..
            } => value_summary(path, expectation),
        }
    }
}

fn keys_summary(extra: &[String], missing: &[String], context: Option<&str>) -> String {
    let suffix = context.map_or_else(String::new, |parent| format!(" in parent {parent}"));
    let mut clauses = Vec::with_capacity(2);
    if !extra.is_empty() {
        clauses.push(format!("Keys [{}] must not be present{suffix}", extra.join(", ")));
    }
    if !missing.is_empty() {
        clauses.push(format!("Keys [{}] are missing{suffix}", missing.join(", ")));
    }
    clauses.join(" and ")
}

fn value_summary(path: &str, expectation: &Expectation) -> String {
    match expectation {
        Expectation::Placeholder(placeholder) => {
            format!("The value of key [{path}] does not match {placeholder}")
        }
        Expectation::Literal => {
            format!("The value of key [{path}] is not equal to the expected value")
        }
        Expectation::Object => format!("The value of key [{path}] should be a JSON object"),
    }
}

fn write_banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(f, "{rule}")?;
    writeln!(f, "{:=<width$}", format!("= {title} "), width = BANNER_WIDTH)?;
    writeln!(f, "{rule}")
}

impl fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        writeln!(f)?;
        write_banner(f, "Needle")?;
        writeln!(f, "{}", to_pretty_string(&self.needle))?;
        write_banner(f, "Haystack")?;
        writeln!(f, "{}", to_pretty_string(&self.haystack))
    }
}

impl std::error::Error for StructuralMismatch {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_both_key_clauses_with_context() {
        let mismatch = StructuralMismatch::keys(
            vec!["baz".into()],
            vec!["bar".into(), "qux".into()],
            Some("address".into()),
            json!(["bar", "qux"]),
            json!(["baz"]),
        );
        assert_eq!(
            mismatch.summary(),
            "Keys [baz] must not be present in parent address and Keys [bar, qux] are missing in parent address"
        );
        assert_eq!(mismatch.extra_keys(), ["baz"]);
        assert_eq!(mismatch.missing_keys(), ["bar", "qux"]);
    }

    #[test]
    fn renders_needle_and_haystack_banners() {
        let mismatch = StructuralMismatch::keys(
            Vec::new(),
            vec!["bar".into()],
            None,
            json!(["foo", "bar"]),
            json!(["foo"]),
        );
        let rule = "=".repeat(80);
        let expected = format!(
            "Keys [bar] are missing\n\n{rule}\n= Needle {}\n{rule}\n[\n    \"foo\",\n    \"bar\"\n]\n{rule}\n= Haystack {}\n{rule}\n[\n    \"foo\"\n]\n",
            "=".repeat(71),
            "=".repeat(69),
        );
        assert_eq!(mismatch.to_string(), expected);
    }

    #[test]
    fn describes_value_mismatches() {
        let mismatch = StructuralMismatch::value(
            "user.id".into(),
            Expectation::Placeholder(Placeholder::Int),
            json!("<int>"),
            json!("42"),
        );
        assert_eq!(
            mismatch.summary(),
            "The value of key [user.id] does not match <int>"
        );
        assert_eq!(mismatch.needle(), &json!("<int>"));
        assert_eq!(mismatch.haystack(), &json!("42"));
        assert!(mismatch.extra_keys().is_empty());
    }

    #[test]
    fn with_dump_keeps_details() {
        let mismatch = StructuralMismatch::value(
            "name".into(),
            Expectation::Literal,
            json!("Ada"),
            json!("Grace"),
        )
        .with_dump(json!({"name": "Ada"}), json!({"name": "Grace"}));
        assert_eq!(
            mismatch.summary(),
            "The value of key [name] is not equal to the expected value"
        );
        assert_eq!(mismatch.needle(), &json!({"name": "Ada"}));
        let MismatchKind::Value { expected, .. } = mismatch.kind() else {
            panic!("expected a value mismatch");
        };
        assert_eq!(expected, &json!("Ada"));
    }
}
