use std::sync::Mutex;

use time::macros::datetime;
use uuid::Uuid;

use super::*;
use crate::llm::types::{ChatResponse, ContentBlock, LlmError};
use crate::model::{EffortLevel, ImpactType};

// =========================================================================
// MockLlm
// =========================================================================

struct MockLlm {
    reply: Mutex<Option<Result<ChatResponse, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    fn replying(text: &str) -> Self {
        Self {
            reply: Mutex::new(Some(Ok(ChatResponse {
                content: vec![ContentBlock::Text { text: text.into() }],
                model: "mock".into(),
                stop_reason: "end_turn".into(),
                input_tokens: 10,
                output_tokens: 20,
            }))),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: LlmError) -> Self {
        Self { reply: Mutex::new(Some(Err(err))), prompts: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, _max_tokens: u32, _system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .extend(messages.iter().map(|m| m.content.clone()));
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(LlmError::ApiRequest("no scripted reply".into())))
    }
}

fn log(title: &str, description: &str, impact: ImpactType, effort: EffortLevel) -> WorkLog {
    WorkLog {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        title: title.into(),
        description: description.into(),
        impact_type: impact,
        effort_level: effort,
        created_at: datetime!(2025-06-01 09:00 UTC),
    }
}

fn two_logs() -> Vec<WorkLog> {
    vec![
        log("Fixed Login Loop", "Session cookie path", ImpactType::BugFix, EffortLevel::Low),
        log("Search API", "Added index", ImpactType::Performance, EffortLevel::High),
    ]
}

// =========================================================================
// parse_numbered_bullets / prompt
// =========================================================================

#[test]
fn parse_keeps_only_numbered_lines() {
    let reply = "Here you go:\n1. Resolved the login loop.\n  2.   Optimized search.  \n- stray\n10. Tenth.\n3.NoSpace\n4. ";
    assert_eq!(
        parse_numbered_bullets(reply),
        vec!["Resolved the login loop.", "Optimized search.", "Tenth."]
    );
}

#[test]
fn format_logs_numbers_each_entry() {
    assert_eq!(
        format_logs(&two_logs()),
        "1. Fixed Login Loop: Session cookie path (Bug Fix, Low)\n2. Search API: Added index (Performance, High)"
    );
}

#[test]
fn prompt_states_exact_count_and_logs() {
    let prompt = build_prompt(&two_logs());
    assert!(prompt.contains("Return EXACTLY 2 bullet points"));
    assert!(prompt.contains("2. Search API: Added index (Performance, High)"));
}

// =========================================================================
// generate_bullets
// =========================================================================

#[tokio::test]
async fn without_llm_uses_templates() {
    let logs = two_logs();
    let generated = generate_bullets(None, &logs).await;
    assert_eq!(generated.source, SummarySource::Template);
    assert_eq!(generated.bullets, summary::template_bullets(&logs));
}

#[tokio::test]
async fn matching_count_uses_llm_bullets() {
    let llm = MockLlm::replying("1. Resolved a login loop, restoring access.\n2. Optimized search latency.");
    let logs = two_logs();
    let generated = generate_bullets(Some(&llm), &logs).await;
    assert_eq!(generated.source, SummarySource::Llm);
    assert_eq!(generated.bullets, vec!["Resolved a login loop, restoring access.", "Optimized search latency."]);

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("1. Fixed Login Loop"));
}

#[tokio::test]
async fn wrong_count_falls_back_to_generic_bullets() {
    let llm = MockLlm::replying("1. Did everything at once.");
    let generated = generate_bullets(Some(&llm), &two_logs()).await;
    assert_eq!(generated.source, SummarySource::LlmCountMismatch);
    assert_eq!(
        generated.bullets,
        vec![
            "Delivered fixed login loop, contributing to bug fix improvements.",
            "Delivered search api, contributing to performance improvements.",
        ]
    );
}

#[tokio::test]
async fn llm_error_falls_back_to_templates() {
    let llm = MockLlm::failing(LlmError::ApiResponse { status: 529, body: "overloaded".into() });
    let logs = two_logs();
    let generated = generate_bullets(Some(&llm), &logs).await;
    assert_eq!(generated.source, SummarySource::Template);
    assert_eq!(generated.bullets, summary::template_bullets(&logs));
}

#[test]
fn summary_source_serializes_snake_case() {
    assert_eq!(serde_json::to_value(SummarySource::LlmCountMismatch).unwrap(), "llm_count_mismatch");
}

#[tokio::test]
async fn state_configured_llm_is_used_through_the_trait_object() {
    let llm = std::sync::Arc::new(MockLlm::replying("1. Resolved a login loop.\n2. Optimized search."));
    let state = crate::state::test_helpers::test_app_state_with_llm(llm.clone());
    let generated = generate_bullets(state.llm.as_deref(), &two_logs()).await;
    assert_eq!(generated.source, SummarySource::Llm);
    assert_eq!(llm.prompts.lock().unwrap().len(), 1);
}
