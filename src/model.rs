//! Work log entry types and input validation.
//!
//! DESIGN
//! ======
//! Impact and effort are closed enums on the Rust side and plain text in
//! Postgres (guarded by CHECK constraints). They serialize as their display
//! strings so JSON payloads read `"Bug Fix"` rather than `"bug_fix"`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;

// =============================================================================
// ENUMS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactType {
    #[default]
    Delivery,
    Performance,
    #[serde(rename = "Bug Fix")]
    BugFix,
    Collaboration,
    Ownership,
}

impl ImpactType {
    pub const ALL: [Self; 5] = [Self::Delivery, Self::Performance, Self::BugFix, Self::Collaboration, Self::Ownership];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Performance => "Performance",
            Self::BugFix => "Bug Fix",
            Self::Collaboration => "Collaboration",
            Self::Ownership => "Ownership",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffortLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EffortLevel {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == raw)
    }
}

// =============================================================================
// WORK LOG
// =============================================================================

/// A stored work log entry. Mirrors the `work_logs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub impact_type: ImpactType,
    pub effort_level: EffortLevel,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("title must be at most {MAX_TITLE_CHARS} characters")]
    TitleTooLong,
    #[error("description must be at most {MAX_DESCRIPTION_CHARS} characters")]
    DescriptionTooLong,
}

/// Body of a create request. Missing impact/effort fall back to the form defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkLog {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact_type: ImpactType,
    #[serde(default)]
    pub effort_level: EffortLevel,
}

impl NewWorkLog {
    /// Trim and check field lengths, returning the cleaned entry.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty or oversize title or an
    /// oversize description.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = validate_title(&self.title)?;
        let description = validate_description(&self.description)?;
        Ok(Self { title, description, ..self })
    }
}

/// Body of a PATCH request. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkLogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub impact_type: Option<ImpactType>,
    pub effort_level: Option<EffortLevel>,
}

impl WorkLogPatch {
    /// # Errors
    ///
    /// Same rules as [`NewWorkLog::validate`], applied to present fields only.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        let description = self
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        Ok(Self { title, description, ..self })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.impact_type.is_none() && self.effort_level.is_none()
    }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_owned())
}

fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let description = raw.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(description.to_owned())
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
