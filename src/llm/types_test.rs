use super::*;

#[test]
fn retryable_classification() {
    assert!(LlmError::ApiRequest("timeout".into()).retryable());
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
    assert!(!LlmError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::MissingApiKey { var: "X".into() }.retryable());
    assert!(!LlmError::ApiParse("bad".into()).retryable());
}

#[test]
fn completion_serde_round_trip() {
    let completion = Completion { text: "hello".into(), model: "m".into(), input_tokens: 10, output_tokens: 2 };
    let json = serde_json::to_string(&completion).unwrap();
    let restored: Completion = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.text, "hello");
    assert_eq!(restored.input_tokens, 10);
}
