//! Step-definition assertions for behaviour-driven HTTP API tests.
//!
//! The crate checks the last response of a scenario. [`RestAssertions`]
//! covers the status code, headers and raw body; [`JsonAssertions`] covers
//! JSON bodies, from single nodes addressed with `root->items[0]->id` paths
//! to whole-document templates with typed placeholders such as `<int>` and
//! `<dateTime>`. Each assertion returns an [`AssertionResult`] whose error
//! message can be reported verbatim by the scenario runner.
//!
//! Sending requests is left to the HTTP client; it exposes the response via
//! [`ResponseSource`], or records it into a [`RecordedResponse`].

pub mod config;
mod error;
mod json;
mod macros;
mod response;
mod rest;
mod table;

pub use apicheck_json::{JsonError, StructuralMismatch};
pub use error::{AssertionError, AssertionResult};
pub use json::JsonAssertions;
pub use response::{RecordedResponse, RecordedResponseBuilder, ResponseSource};
pub use rest::RestAssertions;
pub use table::{StepTable, TableError};
