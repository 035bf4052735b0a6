//! Requirement (tracked work item) model.
//!
//! # Invariants
//! - `id` is stable for the requirement lifetime.
//! - `title` is never empty: blank input falls back to [`DEFAULT_REQUIREMENT_TITLE`]
//!   on create and keeps the previous title on rename.
//! - `created_at` is set once at creation.

use crate::model::{now_epoch_ms, EpochMillis};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title used when a requirement is created with blank input.
pub const DEFAULT_REQUIREMENT_TITLE: &str = "Untitled";

const REQUIREMENT_ID_PREFIX: &str = "req_";

/// Opaque requirement identifier.
///
/// Arrives verbatim from UI callers, so any string is accepted; freshly
/// generated ids use the `req_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(String);

impl RequirementId {
    /// Generates a new unique requirement id.
    pub fn generate() -> Self {
        Self(format!("{REQUIREMENT_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for RequirementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RequirementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for RequirementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-step priority cycle shown by the UI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Next value in the `low -> medium -> high -> low` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Tracked work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: RequirementId,
    pub title: String,
    #[serde(default)]
    pub archived: bool,
    pub created_at: EpochMillis,
    /// Absent on records written before priorities existed; read as lowest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Requirement {
    /// Builds a fresh, unarchived requirement stamped with the current time.
    pub fn new(title: Option<&str>) -> Self {
        Self {
            id: RequirementId::generate(),
            title: normalize_title(title).unwrap_or_else(|| DEFAULT_REQUIREMENT_TITLE.to_string()),
            archived: false,
            created_at: now_epoch_ms(),
            priority: None,
        }
    }

    /// Replaces the title with trimmed `title`; blank input is ignored.
    ///
    /// Returns whether the title changed.
    pub fn rename(&mut self, title: Option<&str>) -> bool {
        match normalize_title(title) {
            Some(next) if next != self.title => {
                self.title = next;
                true
            }
            _ => false,
        }
    }

    /// Priority with absent values read as [`Priority::Low`].
    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }
}

fn normalize_title(title: Option<&str>) -> Option<String> {
    title
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{Priority, Requirement, RequirementId, DEFAULT_REQUIREMENT_TITLE};

    #[test]
    fn new_requirement_trims_title_and_falls_back_when_blank() {
        assert_eq!(Requirement::new(Some("  Ship v2 ")).title, "Ship v2");
        assert_eq!(Requirement::new(Some(" \t ")).title, DEFAULT_REQUIREMENT_TITLE);
        assert_eq!(Requirement::new(None).title, DEFAULT_REQUIREMENT_TITLE);
    }

    #[test]
    fn rename_ignores_blank_input() {
        let mut requirement = Requirement::new(Some("before"));
        assert!(!requirement.rename(Some("   ")));
        assert!(!requirement.rename(None));
        assert_eq!(requirement.title, "before");

        assert!(requirement.rename(Some(" after ")));
        assert_eq!(requirement.title, "after");
    }

    #[test]
    fn priority_cycles_through_three_values() {
        assert_eq!(Priority::Low.next(), Priority::Medium);
        assert_eq!(Priority::Medium.next(), Priority::High);
        assert_eq!(Priority::High.next(), Priority::Low);
        assert_eq!(Requirement::new(None).effective_priority(), Priority::Low);
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let id = RequirementId::generate();
        assert!(id.as_str().starts_with("req_"));
        assert_ne!(id, RequirementId::generate());
    }
}
