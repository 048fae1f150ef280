//! JSON path evaluation and structural comparison for apicheck.
//!
//! The crate holds the pure core behind the JSON assertion steps: decoding
//! response bodies, resolving path expressions such as `root->items[0].id`,
//! parsing expected templates with typed placeholders, and comparing those
//! templates against actual documents with needle/haystack diagnostics.
//! Nothing here performs I/O or reads configuration.

mod compare;
mod diagnostics;
mod document;
mod errors;
mod path;
mod pattern;
mod template;

pub use compare::{
    Comparator, CompareOptions, Comparison, compare_keys, compare_tabular_columns, compare_values,
    first_record_keys,
};
pub use diagnostics::{Expectation, MismatchKind, StructuralMismatch};
pub use document::{JsonDocument, to_pretty_string};
pub use errors::JsonError;
pub use path::{PathExpression, evaluate};
pub use pattern::compile_pattern;
pub use template::{Placeholder, Template, TemplateNode, TemplateObject};
