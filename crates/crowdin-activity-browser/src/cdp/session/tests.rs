use serde_json::json;

use super::core::PageSession;

#[test]
fn test_ready_states() {
    assert!(PageSession::is_ready_state("complete"));
    assert!(PageSession::is_ready_state("interactive"));
    assert!(!PageSession::is_ready_state("loading"));
}

#[test]
fn test_exception_text_prefers_description() {
    let exception = json!({
        "text": "Uncaught",
        "exception": {"description": "TypeError: list is null"}
    });
    assert_eq!(PageSession::exception_text(&exception), "TypeError: list is null");
}

#[test]
fn test_exception_text_fallbacks() {
    assert_eq!(PageSession::exception_text(&json!({"text": "Uncaught"})), "Uncaught");
    assert_eq!(PageSession::exception_text(&json!({})), "Unknown error");
}

#[test]
fn test_node_ids() {
    assert_eq!(PageSession::node_ids(&json!({"nodeIds": [12, 14, 19]})), vec![12, 14, 19]);
    assert!(PageSession::node_ids(&json!({"nodeIds": []})).is_empty());
    assert!(PageSession::node_ids(&json!({})).is_empty());
}
