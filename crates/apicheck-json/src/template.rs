//! Expected templates: JSON shapes whose leaves may be typed placeholders.
//!
//! Template text is ordinary JSON. String values held by an object member
//! that spell one of the placeholder tokens (`<int>`, `<string>`, `<uuid>`,
//! `<dateTime>`, `<date>`) become type constraints; any other leaf is a
//! literal compared for strict equality. Object members that are themselves
//! objects are nested templates. Lists nested inside a template are literals:
//! tokens inside them carry no meaning, and neither do tokens used as keys.
//!
//! A template whose root is a list is read as a record keyed by position, so
//! its elements follow the member rules above.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::JsonError;

static DATE_TIME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}[+-][0-9]{2}:[0-9]{2}$").ok()
});
static DATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").ok());
static UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").ok()
});

/// Type constraints a template leaf may declare instead of a literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `<int>`: an integer number.
    Int,
    /// `<string>`: a non-empty string.
    String,
    /// `<uuid>`: a non-empty string; textual UUID form only in strict mode.
    Uuid,
    /// `<dateTime>`: `YYYY-MM-DDTHH:MM:SS±HH:MM`.
    DateTime,
    /// `<date>`: `YYYY-MM-DD`.
    Date,
}

impl Placeholder {
    /// Every placeholder, in token order.
    pub const ALL: [Self; 5] = [
        Self::Int,
        Self::String,
        Self::Uuid,
        Self::DateTime,
        Self::Date,
    ];

    /// Recognise a placeholder token.
    ///
    /// # Examples
    /// ```
    /// use apicheck_json::Placeholder;
    ///
    /// assert_eq!(Placeholder::from_token("<dateTime>"), Some(Placeholder::DateTime));
    /// assert_eq!(Placeholder::from_token("<datetime>"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<int>" => Some(Self::Int),
            "<string>" => Some(Self::String),
            "<uuid>" => Some(Self::Uuid),
            "<dateTime>" => Some(Self::DateTime),
            "<date>" => Some(Self::Date),
            _ => None,
        }
    }

    /// The token spelling of this placeholder.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Int => "<int>",
            Self::String => "<string>",
            Self::Uuid => "<uuid>",
            Self::DateTime => "<dateTime>",
            Self::Date => "<date>",
        }
    }

    /// Check `value` against the constraint.
    ///
    /// `strict_uuid` turns on textual UUID validation for [`Placeholder::Uuid`];
    /// it has no effect on the other placeholders.
    ///
    /// # Examples
    /// ```
    /// use apicheck_json::Placeholder;
    /// use serde_json::json;
    ///
    /// assert!(Placeholder::Int.accepts(&json!(42), false));
    /// assert!(!Placeholder::Int.accepts(&json!("42"), false));
    /// assert!(Placeholder::Uuid.accepts(&json!("not-a-uuid"), false));
    /// assert!(!Placeholder::Uuid.accepts(&json!("not-a-uuid"), true));
    /// ```
    #[must_use]
    pub fn accepts(self, value: &Value, strict_uuid: bool) -> bool {
        match (self, value) {
            (Self::Int, Value::Number(number)) => number.is_i64() || number.is_u64(),
            (Self::String, Value::String(text)) => !text.is_empty(),
            (Self::Uuid, Value::String(text)) => {
                !text.is_empty() && (!strict_uuid || matches_pattern(&UUID, text))
            }
            (Self::DateTime, Value::String(text)) => matches_pattern(&DATE_TIME, text),
            (Self::Date, Value::String(text)) => matches_pattern(&DATE, text),
            _ => false,
        }
    }
}

fn matches_pattern(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One node of an expected template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// A type constraint.
    Placeholder(Placeholder),
    /// A nested object template.
    Object(TemplateObject),
    /// A literal compared for strict equality.
    Literal(Value),
}

impl TemplateNode {
    /// Classify a member value of a template object.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => match Placeholder::from_token(&text) {
                Some(placeholder) => Self::Placeholder(placeholder),
                None => Self::Literal(Value::String(text)),
            },
            Value::Object(members) => Self::Object(TemplateObject::from_map(members)),
            other => Self::Literal(other),
        }
    }

    /// Render the node back into the JSON it was read from.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Placeholder(placeholder) => Value::String(placeholder.token().to_owned()),
            Self::Object(object) => object.to_value(),
            Self::Literal(value) => value.clone(),
        }
    }
}

/// An object template: members in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateObject {
    members: Vec<(String, TemplateNode)>,
}

impl TemplateObject {
    /// Build an object template from decoded members.
    #[must_use]
    pub fn from_map(members: Map<String, Value>) -> Self {
        let members = members
            .into_iter()
            .map(|(key, value)| (key, TemplateNode::from_value(value)))
            .collect();
        Self { members }
    }

    /// Member keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(key, _)| key.as_str())
    }

    /// Members in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateNode)> {
        self.members.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Look up a member by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TemplateNode> {
        self.members
            .iter()
            .find_map(|(candidate, node)| (candidate == key).then_some(node))
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when the template declares no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Render the template back into JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.members
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }
}

/// A complete expected template as written by a test author.
///
/// # Examples
/// ```
/// use apicheck_json::{Placeholder, Template, TemplateNode};
///
/// let template = Template::parse(r#"{"id": "<int>", "name": "Ada"}"#).unwrap();
/// let Template::Object(object) = &template else { unreachable!() };
/// assert_eq!(object.get("id"), Some(&TemplateNode::Placeholder(Placeholder::Int)));
/// assert!(Template::parse("\"<int>\"").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// An object root: keys are member names.
    Object(TemplateObject),
    /// A list root: keys are element positions.
    List(Vec<TemplateNode>),
}

impl Template {
    /// Parse template text.
    ///
    /// # Errors
    /// Returns [`JsonError::InvalidTemplate`] when `text` is not valid JSON or
    /// its root is neither an object nor a list.
    pub fn parse(text: &str) -> Result<Self, JsonError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| JsonError::invalid_template(err.to_string()))?;
        Self::from_value(value)
    }

    /// Build a template from an already decoded value.
    ///
    /// # Errors
    /// Returns [`JsonError::InvalidTemplate`] when `value` is neither an
    /// object nor a list.
    pub fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Object(members) => Ok(Self::Object(TemplateObject::from_map(members))),
            Value::Array(items) => Ok(Self::List(
                items.into_iter().map(TemplateNode::from_value).collect(),
            )),
            other => Err(JsonError::invalid_template(format!(
                "expected an object or a list at the root, found {}",
                kind_name(&other)
            ))),
        }
    }

    /// Top-level keys: member names, or positions for a list root.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Object(object) => object.keys().map(str::to_owned).collect(),
            Self::List(items) => (0..items.len()).map(|index| index.to_string()).collect(),
        }
    }

    /// Render the template back into JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(object) => object.to_value(),
            Self::List(items) => Value::Array(items.iter().map(TemplateNode::to_value).collect()),
        }
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
