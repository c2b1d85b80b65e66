//! Summary bullet generation: model wording with template fallback.
//!
//! DESIGN
//! ======
//! Without a configured LLM, bullets come straight from the impact-keyed
//! templates in `crate::summary`. With one, the model is asked for exactly
//! one numbered bullet per log, in log order.
//!
//! ERROR HANDLING
//! ==============
//! The bullet count must match the log count. A reply with the wrong count is
//! replaced by generic "Delivered ..." bullets; a failed call falls back to the
//! templates. Neither case fails the request.

use serde::Serialize;

use crate::llm::LlmChat;
use crate::llm::types::Message;
use crate::model::WorkLog;
use crate::summary;

const MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You are a senior software engineering manager writing performance review bullets \
that will be read by leadership.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Template,
    Llm,
    LlmCountMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBullets {
    pub bullets: Vec<String>,
    pub source: SummarySource,
}

/// Produce one bullet per log, preferring the LLM when one is configured.
pub async fn generate_bullets(llm: Option<&dyn LlmChat>, logs: &[WorkLog]) -> GeneratedBullets {
    let Some(llm) = llm else {
        return GeneratedBullets { bullets: summary::template_bullets(logs), source: SummarySource::Template };
    };

    let prompt = build_prompt(logs);
    let reply = match llm.chat(MAX_TOKENS, SYSTEM_PROMPT, &[Message::user(prompt)]).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, logs = logs.len(), "llm summary failed, using templates");
            return GeneratedBullets { bullets: summary::template_bullets(logs), source: SummarySource::Template };
        }
    };

    let bullets = parse_numbered_bullets(&reply.text());
    if bullets.len() == logs.len() {
        tracing::info!(
            logs = logs.len(),
            input_tokens = reply.input_tokens,
            output_tokens = reply.output_tokens,
            "llm summary generated"
        );
        return GeneratedBullets { bullets, source: SummarySource::Llm };
    }

    tracing::warn!(expected = logs.len(), got = bullets.len(), "llm returned wrong bullet count");
    GeneratedBullets { bullets: logs.iter().map(generic_bullet).collect(), source: SummarySource::LlmCountMismatch }
}

fn generic_bullet(log: &WorkLog) -> String {
    format!(
        "Delivered {}, contributing to {} improvements.",
        log.title.to_lowercase(),
        log.impact_type.as_str().to_lowercase()
    )
}

/// `1. Title: description (Impact, Effort)` per log.
pub(crate) fn format_logs(logs: &[WorkLog]) -> String {
    logs.iter()
        .enumerate()
        .map(|(i, l)| {
            format!(
                "{}. {}: {} ({}, {})",
                i + 1,
                l.title,
                l.description,
                l.impact_type.as_str(),
                l.effort_level.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn build_prompt(logs: &[WorkLog]) -> String {
    let count = logs.len();
    let formatted = format_logs(logs);
    format!(
        "STRICT RULES (no exceptions):
- Return EXACTLY {count} bullet points
- Each bullet corresponds to the SAME log, in the SAME order
- One sentence per bullet
- Do NOT merge logs
- Do NOT repeat sentence structure
- Do NOT repeat verbs

FORBIDDEN PHRASES (never use):
- \"contributing to\"
- \"improvements\"
- \"helped\"
- \"supported\"
- \"assisted\"
- \"delivered\"

EACH BULLET MUST:
- Start with a strong past-tense action verb (Resolved, Optimized, Implemented, Improved, Accelerated, Strengthened)
- Describe the specific technical change
- Explicitly state concrete impact using words like:
  reliability, availability, latency, throughput, stability, developer velocity, user access

WORK LOGS (in order):
{formatted}

OUTPUT:
Return only numbered bullet points (\"1. ...\"), one per line."
    )
}

/// Keep only `N. text` lines, returning the text part.
pub(crate) fn parse_numbered_bullets(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                return None;
            }
            let rest = line[digits..].strip_prefix('.')?;
            if !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let text = rest.trim();
            (!text.is_empty()).then(|| text.to_owned())
        })
        .collect()
}

#[cfg(test)]
#[path = "ai_test.rs"]
mod tests;
