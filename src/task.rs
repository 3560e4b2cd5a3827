//! Task model for taskflow.
//!
//! A task is the sole entity in the system. Snapshots persist tasks with
//! camelCase field names (`dueDate`, `createdAt`); `description` and
//! `dueDate` are omitted when absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority from user input (case-insensitive).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown priority '{other}' (expected low|medium|high)"
            ))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Personal
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
            Category::Other => "other",
        }
    }

    /// Parse a category from user input (case-insensitive).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "health" => Ok(Category::Health),
            "learning" => Ok(Category::Learning),
            "other" => Ok(Category::Other),
            unknown => Err(Error::InvalidArgument(format!(
                "unknown category '{unknown}' (expected work|personal|health|learning|other)"
            ))),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored task.
///
/// `id` and `created_at` are assigned once at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Construct a task from a validated draft with a fresh id and timestamp.
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            description: normalize_description(draft.description.as_deref()),
            completed: draft.completed,
            priority: draft.priority,
            category: draft.category,
            due_date: draft.due_date,
            created_at: Utc::now(),
        }
    }

    /// Normalize fields that tolerate legacy snapshot values.
    ///
    /// Empty or whitespace-only descriptions collapse to absent.
    pub fn normalize(&mut self) {
        self.description = normalize_description(self.description.as_deref());
    }
}

/// Everything a task carries except `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Draft with default flags: not completed, medium priority, personal.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            priority: Priority::default(),
            category: Category::default(),
            due_date: None,
        }
    }

    /// Reject drafts whose title is empty or whitespace-only.
    ///
    /// Validation runs before any `Task` is constructed; a draft that fails
    /// here never reaches the store.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidArgument("title cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Canonical representation for optional descriptions: absent, never "".
pub fn normalize_description(value: Option<&str>) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        _ => None,
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`) for `dueDate`.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!(
            "invalid due date '{}' (expected YYYY-MM-DD)",
            value.trim()
        ))
    })
}
