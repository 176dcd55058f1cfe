//! Tests for domain error construction and serialisation.

use super::*;
use crate::domain::{TraceId, Violation};
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_operation("bad")
}

#[rstest]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::invalid_operation("x"), ErrorCode::InvalidOperation)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::cancelled("x"), ErrorCode::Cancelled)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::NotFound, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn validation_failed_reports_every_violation() {
    let mut violations = Violations::default();
    violations.push(Violation::new("user.email", "invalid_email", "Email is invalid"));
    violations.push(Violation::new(
        "user.username",
        "empty",
        "Username must not be empty",
    ));

    let error = Error::validation_failed(violations);

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.violated_fields(), vec!["user.email", "user.username"]);
    let details = error.details().expect("details present");
    assert_eq!(
        details["errors"][0],
        json!({
            "field": "user.email",
            "code": "invalid_email",
            "message": "Email is invalid",
        })
    );
}

#[rstest]
fn violated_fields_is_empty_for_other_codes(base_error: Error) {
    assert!(base_error.violated_fields().is_empty());
}

#[rstest]
fn serialises_snake_case_codes() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(value["code"], "not_found");
    assert!(value.get("traceId").is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({ "code": "not_found", "message": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn deserialising_keeps_payload_trace_id(expected_trace_id: String) {
    let payload = json!({
        "code": "forbidden",
        "message": "nope",
        "traceId": expected_trace_id,
    });
    let error: Error = serde_json::from_value(payload).expect("valid payload");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}
