//! Assertion helpers for step outcomes.
//!
//! The macros are exported at the crate root via `#[macro_export]`.

/// Assert that a step outcome is `Ok` and unwrap it.
///
/// Panics with the failure message when the value is an `Err`, so a
/// scenario runner reports exactly what the step reported.
///
/// # Examples
/// ```
/// use apicheck::{RecordedResponse, RestAssertions, assert_check_ok};
///
/// let response = RecordedResponse::builder(200).header("ETag", "\"v1\"").build();
/// let etag = assert_check_ok!(RestAssertions::new(&response).header_should_exist("etag"));
/// assert_eq!(etag, "\"v1\"");
/// ```
#[macro_export]
macro_rules! assert_check_ok {
    ($expr:expr $(,)?) => {
        match $expr {
            Ok(value) => value,
            Err(e) => panic!("check failed unexpectedly:\n{e}"),
        }
    };
}

/// Assert that a step outcome is `Err` and unwrap the error.
///
/// Optionally asserts that the error's display contains a substring.
///
/// # Examples
/// ```
/// use apicheck::{RecordedResponse, RestAssertions, assert_check_err};
///
/// let response = RecordedResponse::builder(500).build();
/// let err = assert_check_err!(
///     RestAssertions::new(&response).status_code_should_be(200),
///     "is 500",
/// );
/// assert!(err.to_string().ends_with("200 expected."));
/// ```
#[macro_export]
macro_rules! assert_check_err {
    ($expr:expr $(,)?) => {
        match $expr {
            Ok(_) => panic!("check passed but a failure was expected"),
            Err(e) => e,
        }
    };
    ($expr:expr, $msg:expr $(,)?) => {
        match $expr {
            Ok(_) => panic!("check passed but a failure was expected"),
            Err(e) => {
                let __apicheck_display = e.to_string();
                let __apicheck_msg: &str = $msg.as_ref();
                assert!(
                    __apicheck_display.contains(__apicheck_msg),
                    "failure message {:?} does not contain {:?}",
                    __apicheck_display,
                    __apicheck_msg,
                );
                e
            }
        }
    };
}
