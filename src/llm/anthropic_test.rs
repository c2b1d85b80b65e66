use super::*;

fn make_response(content: serde_json::Value) -> String {
    serde_json::json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": content,
        "model": "claude-sonnet-4-5-20250929",
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 100, "output_tokens": 50 }
    })
    .to_string()
}

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([
        { "type": "text", "text": "1. Resolved the login loop." }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "1. Resolved the login loop."));
    assert_eq!(resp.model, "claude-sonnet-4-5-20250929");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 100);
    assert_eq!(resp.output_tokens, 50);
}

#[test]
fn parse_drops_unknown_blocks() {
    let json = make_response(serde_json::json!([
        { "type": "server_tool_use", "id": "x" },
        { "type": "text", "text": "ok" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert_eq!(resp.text(), "ok");
}

#[test]
fn parse_rejects_malformed_json() {
    let err = parse_response("{not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[test]
fn parse_rejects_missing_usage() {
    let json = serde_json::json!({
        "content": [],
        "model": "m",
        "stop_reason": "end_turn"
    })
    .to_string();
    assert!(matches!(parse_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn request_body_serializes_expected_shape() {
    let messages = [Message::user("hello")];
    let body = ApiRequest { model: "m", max_tokens: 512, system: "sys", messages: &messages };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["model"], "m");
    assert_eq!(value["max_tokens"], 512);
    assert_eq!(value["system"], "sys");
    assert_eq!(value["messages"][0]["role"], "user");
}
