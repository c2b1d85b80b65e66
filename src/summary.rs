//! Summary templating: one bullet per log, reframed per output mode.
//!
//! DESIGN
//! ======
//! Generation produces a newline-separated list of `• `-prefixed bullets.
//! Modes never regenerate; they rewrite that same text:
//! - appraisal: bullets as generated
//! - resume: leading verb swapped for a shorter one, clause after the first comma dropped
//! - manager: every bullet ends with a period, copy text gains a heading

use serde::{Deserialize, Serialize};

use crate::model::{ImpactType, WorkLog};

pub const BULLET: &str = "•";
pub const MANAGER_HEADING: &str = "Executive Summary";
pub const NO_LOGS_MESSAGE: &str = "No logs found for selected period";

const TITLE_VERBS: [&str; 4] = ["improved", "optimized", "implemented", "fixed"];
const RESUME_VERBS: [(&str, &str); 3] = [("Resolved", "Fixed"), ("Optimized", "Improved"), ("Implemented", "Built")];

// =============================================================================
// MODE / PERIOD
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Appraisal,
    Resume,
    Manager,
}

/// Look-back window offered by the summary screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    Last30Days,
    Quarter,
    HalfYear,
}

impl Period {
    /// Map a day count to a period. Only the offered windows are accepted.
    #[must_use]
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            30 => Some(Self::Last30Days),
            90 => Some(Self::Quarter),
            180 => Some(Self::HalfYear),
            _ => None,
        }
    }

    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            Self::Last30Days => 30,
            Self::Quarter => 90,
            Self::HalfYear => 180,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Last30Days => "Last 30 days",
            Self::Quarter => "This Quarter",
            Self::HalfYear => "Last 6 months",
        }
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Drop a leading action verb from a log title so templates can supply their own.
#[must_use]
pub fn clean_title(title: &str) -> String {
    let Some(split) = title.find(char::is_whitespace) else {
        return title.trim().to_owned();
    };
    let (word, rest) = title.split_at(split);
    if TITLE_VERBS.iter().any(|verb| word.eq_ignore_ascii_case(verb)) {
        rest.trim().to_owned()
    } else {
        title.trim().to_owned()
    }
}

/// Deterministic bullet text for one log, keyed by impact category.
#[must_use]
pub fn template_bullet(log: &WorkLog) -> String {
    let title = clean_title(&log.title).to_lowercase();
    match log.impact_type {
        ImpactType::BugFix => format!(
            "Resolved a production issue related to {title}, restoring system reliability and preventing user-facing failures."
        ),
        ImpactType::Performance => {
            format!("Optimized {title}, reducing latency and improving performance for critical user flows.")
        }
        ImpactType::Delivery => {
            format!("Implemented {title}, accelerating feature delivery and improving development velocity.")
        }
        ImpactType::Collaboration => {
            format!("Improved {title}, increasing operational visibility and strengthening team collaboration.")
        }
        ImpactType::Ownership => format!("Delivered {title}, improving overall product quality and user experience."),
    }
}

#[must_use]
pub fn template_bullets(logs: &[WorkLog]) -> Vec<String> {
    logs.iter().map(template_bullet).collect()
}

/// Join bullets into the stored summary text, one `• ` line each.
#[must_use]
pub fn summary_text(bullets: &[String]) -> String {
    bullets
        .iter()
        .map(|b| format!("{BULLET} {b}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// MODE FORMATTING
// =============================================================================

/// Split summary text into bullets and apply the mode's rewrite.
#[must_use]
pub fn format_by_mode(summary: &str, mode: Mode) -> Vec<String> {
    let bullets = summary
        .lines()
        .map(strip_bullet)
        .filter(|b| !b.is_empty());

    match mode {
        Mode::Appraisal => bullets.map(str::to_owned).collect(),
        Mode::Resume => bullets.map(resume_bullet).collect(),
        Mode::Manager => bullets
            .map(|b| if b.ends_with('.') { b.to_owned() } else { format!("{b}.") })
            .collect(),
    }
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim_start();
    line.strip_prefix(BULLET).unwrap_or(line).trim()
}

fn resume_bullet(bullet: &str) -> String {
    let mut out = RESUME_VERBS
        .iter()
        .find_map(|(from, to)| bullet.strip_prefix(from).map(|rest| format!("{to}{rest}")))
        .unwrap_or_else(|| bullet.to_owned());
    if let Some(comma) = out.find(',') {
        out.truncate(comma);
    }
    out
}

/// Plain text handed back for the clipboard.
#[must_use]
pub fn copy_text(bullets: &[String], mode: Mode) -> String {
    let body = summary_text(bullets);
    match mode {
        Mode::Manager => format!("{MANAGER_HEADING}\n\n{body}"),
        Mode::Appraisal | Mode::Resume => body,
    }
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
