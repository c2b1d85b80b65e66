use super::*;

#[test]
fn text_joins_text_blocks_and_skips_others() {
    let resp = ChatResponse {
        content: vec![
            ContentBlock::Thinking { thinking: "hmm".into() },
            ContentBlock::Text { text: "1. First".into() },
            ContentBlock::Unknown,
            ContentBlock::Text { text: "2. Second".into() },
        ],
        model: "m".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 1,
        output_tokens: 2,
    };
    assert_eq!(resp.text(), "1. First\n2. Second");
}

#[test]
fn unknown_block_type_deserializes_to_unknown() {
    let block: ContentBlock = serde_json::from_str(r#"{"type":"tool_use","id":"x","name":"y","input":{}}"#).unwrap();
    assert!(matches!(block, ContentBlock::Unknown));
}

#[test]
fn user_message_serializes_role_and_content() {
    let value = serde_json::to_value(Message::user("hi")).unwrap();
    assert_eq!(value, serde_json::json!({ "role": "user", "content": "hi" }));
}

#[test]
fn api_response_error_display_includes_status() {
    let err = LlmError::ApiResponse { status: 529, body: "overloaded".into() };
    assert_eq!(err.to_string(), "API response error: status 529");
}
