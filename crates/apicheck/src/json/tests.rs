//! Unit tests for the JSON assertion set.

use super::*;
use crate::response::RecordedResponse;
use rstest::{fixture, rstest};
use serde_json::json;

const BODY: &str = r#"{
    "foo": "bar",
    "url": "https://example.com/a/b",
    "count": 3,
    "ratio": 0.5,
    "ok": true,
    "off": false,
    "nothing": null,
    "items": [
        {"id": 1, "name": "Lamp"},
        {"id": 2, "name": "Desk"}
    ],
    "meta": {"page": 1, "size": 20}
}"#;

#[fixture]
fn response() -> RecordedResponse {
    RecordedResponse::builder(200)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(BODY)
        .build()
}

fn failure_message(result: AssertionResult) -> String {
    match result {
        Ok(()) => panic!("assertion should fail"),
        Err(err) => err.to_string(),
    }
}

#[rstest]
fn recognises_json_responses(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert!(json.response_should_be_in_json().is_ok());
    assert_eq!(
        failure_message(json.response_should_not_be_in_json()),
        "The response is in JSON"
    );
}

#[rstest]
#[case("text/html", "{}")]
#[case("application/json", "<html></html>")]
fn rejects_non_json_responses(#[case] content_type: &str, #[case] body: &str) {
    let response = RecordedResponse::builder(200)
        .header("Content-Type", content_type)
        .body(body)
        .build();
    let json = JsonAssertions::new(&response);
    assert!(json.response_should_be_in_json().is_err());
    assert!(json.response_should_not_be_in_json().is_ok());
}

#[rstest]
fn string_equality_quotes_the_found_value(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert!(json.node_should_be_equal_to("foo", "bar").is_ok());
    assert!(json.node_should_be_equal_to("root->items[1]->name", "Desk").is_ok());
    assert_eq!(
        failure_message(json.node_should_be_equal_to("count", "3")),
        "The node value is '3'"
    );
    assert_eq!(
        failure_message(json.node_should_be_equal_to_the_string("foo", "baz")),
        "The node value is `\"bar\"`"
    );
}

#[rstest]
fn unknown_nodes_report_the_expression(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert_eq!(
        failure_message(json.node_should_be_equal_to("root->missing", "x")),
        "Failed to evaluate expression root->missing"
    );
}

#[rstest]
fn table_rows_are_checked_in_order(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    let passing = StepTable::from_rows([["foo", "bar"], ["items[0].name", "Lamp"]]);
    assert!(json.nodes_should_be_equal_to(&passing).is_ok());

    let failing = StepTable::from_rows([["foo", "bar"], ["items[0].name", "Desk"]]);
    assert_eq!(
        failure_message(json.nodes_should_be_equal_to(&failing)),
        "The node value is '\"Lamp\"'"
    );

    let uneven = StepTable::from_rows([vec!["foo"]]);
    assert!(matches!(
        json.nodes_should_be_equal_to(&uneven),
        Err(AssertionError::Table(_))
    ));
}

#[rstest]
#[case("foo", "/^BA/i", true)]
#[case("count", "/^\\d+$/", true)]
#[case("ok", "/^1$/", true)]
#[case("meta", "/\"page\":1/", true)]
#[case("foo", "/^baz$/", false)]
fn pattern_checks_use_node_text(
    response: RecordedResponse,
    #[case] node: &str,
    #[case] pattern: &str,
    #[case] passes: bool,
) {
    let result = JsonAssertions::new(&response).node_should_match(node, pattern);
    assert_eq!(result.is_ok(), passes, "{result:?}");
}

#[rstest]
fn null_checks(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert!(json.node_should_be_null("nothing").is_ok());
    assert!(json.node_should_not_be_null("foo").is_ok());
    assert_eq!(
        failure_message(json.node_should_be_null("count")),
        "The node value is `3`"
    );
    assert_eq!(
        failure_message(json.node_should_not_be_null("nothing")),
        "The node nothing should not be null"
    );
    assert!(matches!(
        json.node_should_not_be_null("absent"),
        Err(AssertionError::Json(_))
    ));
}

#[rstest]
fn boolean_checks_are_strict(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert!(json.node_should_be_true("ok").is_ok());
    assert!(json.node_should_be_false("off").is_ok());
    assert_eq!(
        failure_message(json.node_should_be_true("count")),
        "The node value is `3`"
    );
    assert!(json.node_should_be_false("nothing").is_err());
}

#[rstest]
#[case("count", "3", true)]
#[case("count", "3.0", true)]
#[case("ratio", "0.5", true)]
#[case("ratio", ".5", true)]
#[case("count", "4", false)]
#[case("foo", "3", false)]
#[case("count", "three", false)]
fn number_checks(
    response: RecordedResponse,
    #[case] node: &str,
    #[case] number: &str,
    #[case] passes: bool,
) {
    let result = JsonAssertions::new(&response).node_should_be_equal_to_the_number(node, number);
    assert_eq!(result.is_ok(), passes, "{result:?}");
}

#[rstest]
#[case("items", 2)]
#[case("meta", 2)]
#[case("foo", 1)]
#[case("nothing", 0)]
fn element_counts(response: RecordedResponse, #[case] node: &str, #[case] count: usize) {
    assert!(JsonAssertions::new(&response).node_should_have_elements(node, count).is_ok());
}

#[rstest]
fn element_count_mismatch_message(response: RecordedResponse) {
    assert_eq!(
        failure_message(JsonAssertions::new(&response).node_should_have_elements("items", 3)),
        "Expected an array to contain 3 elements. Got: 2."
    );
}

#[rstest]
fn contains_checks_ignore_case(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert!(json.node_should_contain("url", "EXAMPLE.com/a").is_ok());
    assert!(json.node_should_not_contain("url", "http://").is_ok());
    assert_eq!(
        failure_message(json.node_should_contain("foo", "qux")),
        "The string 'qux' was not found."
    );
    assert_eq!(
        failure_message(json.node_should_not_contain("foo", "AR")),
        "The string 'AR' was found."
    );
    let rows = StepTable::from_rows([["foo", "b"], ["items[1].name", "es"]]);
    assert!(json.nodes_should_contain(&rows).is_ok());
    assert!(json.nodes_should_not_contain(&rows).is_err());
}

#[rstest]
fn existence_checks(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert_eq!(
        json.node_should_exist("meta").ok(),
        Some(json!({"page": 1, "size": 20}))
    );
    assert!(json.node_should_not_exist("meta.total").is_ok());
    assert_eq!(
        failure_message(json.node_should_exist("meta.total").map(drop)),
        "The node 'meta.total' does not exist."
    );
    assert_eq!(
        failure_message(json.node_should_not_exist("items[0]")),
        "The node 'items[0]' exists."
    );
}

#[test]
fn existence_on_non_json_body() {
    let response = RecordedResponse::builder(200).body("plain").build();
    let json = JsonAssertions::new(&response);
    assert!(json.node_should_not_exist("anything").is_ok());
    assert!(json.node_should_exist("").is_err());
}

#[test]
fn whole_document_equality_uses_compact_encoding() {
    let response = RecordedResponse::builder(200)
        .body(r#"{ "a": [1, 2], "b": "x/y" }"#)
        .build();
    let json = JsonAssertions::new(&response);
    assert!(json.json_should_be_equal_to(r#"{"a":[1,2],"b":"x/y"}"#).is_ok());
    assert_eq!(
        failure_message(json.json_should_be_equal_to(r#"{"b":"x/y","a":[1,2]}"#)),
        "The json is equal to:\n{\n    \"a\": [\n        1,\n        2\n    ],\n    \"b\": \"x/y\"\n}"
    );
    assert_eq!(
        failure_message(json.json_should_be_equal_to("{")),
        "The expected JSON is not a valid"
    );
}

#[rstest]
fn tabular_keys_check_the_first_record(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    assert!(json.node_should_have_keys("items", &StepTable::from_rows([["id", "name"]])).is_ok());
    let err = json
        .node_should_have_keys("items", &StepTable::from_rows([["id", "price"]]))
        .err()
        .unwrap_or_else(|| panic!("columns differ"));
    let AssertionError::Mismatch(mismatch) = &err else {
        panic!("expected a structural mismatch, got {err:?}");
    };
    assert_eq!(
        mismatch.summary(),
        "Keys [name] must not be present and Keys [price] are missing"
    );
    assert!(matches!(
        json.node_should_have_keys("items", &StepTable::default()),
        Err(AssertionError::Table(_))
    ));
}

#[rstest]
fn template_matching_reports_structural_mismatch(response: RecordedResponse) {
    let json = JsonAssertions::new(&response);
    let template = r#"{
        "foo": "<string>",
        "url": "<string>",
        "count": "<int>",
        "ratio": 0.5,
        "ok": true,
        "off": false,
        "nothing": null,
        "items": [{"id": 1, "name": "Lamp"}, {"id": 2, "name": "Desk"}],
        "meta": {"page": "<int>", "size": "<int>"}
    }"#;
    assert!(json.json_should_match(template).is_ok());

    let Err(AssertionError::Mismatch(mismatch)) = json.json_should_match(r#"{"foo": "<int>"}"#)
    else {
        panic!("template should not match");
    };
    assert!(mismatch.summary().starts_with("Keys [url, count"));
    assert!(matches!(
        json.json_should_match("not json"),
        Err(AssertionError::Json(_))
    ));
}

#[rstest]
#[case(json!("text"), "text")]
#[case(json!(true), "1")]
#[case(json!(false), "")]
#[case(Value::Null, "")]
#[case(json!(2.5), "2.5")]
#[case(json!([1, "a"]), "[1,\"a\"]")]
fn renders_node_text(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(node_text(&value), expected);
}
