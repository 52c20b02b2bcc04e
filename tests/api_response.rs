use serde_json::json;
use supportctl::api::response::{extract_confirmation, extract_error_message};
use supportctl::api::Payload;
use supportctl::ApiErrorKind;

#[test]
fn test_extract_error_message_from_detail() {
    let body = json!({ "detail": "Session not found" });
    assert_eq!(
        extract_error_message(&body),
        Some("Session not found".to_string())
    );
}

#[test]
fn test_extract_error_message_prefers_detail_over_message() {
    let body = json!({ "message": "generic", "detail": "specific" });
    assert_eq!(extract_error_message(&body), Some("specific".to_string()));
}

#[test]
fn test_extract_error_message_from_validation_list() {
    let body = json!({
        "detail": [
            { "loc": ["body", "client_id"], "msg": "field required", "type": "value_error.missing" },
            { "loc": ["query", "limit"], "msg": "ensure this value is less than or equal to 100" }
        ]
    });

    let message = extract_error_message(&body).unwrap();
    assert_eq!(
        message,
        "body.client_id: field required; query.limit: ensure this value is less than or equal to 100"
    );
}

#[test]
fn test_extract_error_message_from_nested_error() {
    let body = json!({ "error": { "message": "quota exceeded" } });
    assert_eq!(extract_error_message(&body), Some("quota exceeded".to_string()));
}

#[test]
fn test_extract_error_message_missing() {
    assert_eq!(extract_error_message(&json!({ "ok": false })), None);
    assert_eq!(extract_error_message(&json!({ "detail": "" })), None);
}

#[test]
fn test_extract_confirmation() {
    assert_eq!(
        extract_confirmation(&json!({ "message": "Gap answered" })),
        Some("Gap answered".to_string())
    );
    assert_eq!(
        extract_confirmation(&json!({ "status": "deleted" })),
        Some("deleted".to_string())
    );
    assert_eq!(extract_confirmation(&json!("done")), Some("done".to_string()));
    assert_eq!(extract_confirmation(&json!(null)), None);
}

#[test]
fn test_text_payload_parses_as_json_when_possible() {
    let payload = Payload::Text("{\"content\": \"hello\"}".to_string());
    let value = payload.into_json().unwrap();
    assert_eq!(value["content"], "hello");
}

#[test]
fn test_text_payload_that_is_not_json_is_a_decode_error() {
    let payload = Payload::Text("<html>oops</html>".to_string());
    let err = payload.into_json().unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[test]
fn test_empty_text_payload_is_null() {
    let payload = Payload::Text("  ".to_string());
    assert!(payload.into_json().unwrap().is_null());
}
