//! Query/filter engine for taskflow.
//!
//! Pure, side-effect-free derivation of a visible task subset and summary
//! statistics from the task list and a filter selection. Both functions
//! are recomputed on demand; nothing here is incrementally maintained.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::{Category, Priority, Task};

/// Status facet of a filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Active,
    Completed,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl StatusFilter {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown status filter '{other}' (expected all|active|completed)"
            ))),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

/// Three independent facets; `None` means "all" for category and priority.
/// All facets are ANDed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub status: StatusFilter,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl FilterSelection {
    /// Selection with every facet set to "all".
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.matches(task) {
            return false;
        }
        if let Some(category) = self.category {
            if task.category != category {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }
}

/// Parse a category facet: "all" lifts the restriction.
pub fn parse_category_filter(value: &str) -> Result<Option<Category>> {
    if value.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        Category::parse(value).map(Some)
    }
}

/// Parse a priority facet: "all" lifts the restriction.
pub fn parse_priority_filter(value: &str) -> Result<Option<Priority>> {
    if value.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        Priority::parse(value).map(Some)
    }
}

/// The ordered subsequence of `tasks` matching every facet of `selection`.
pub fn filter<'a>(tasks: &'a [Task], selection: &FilterSelection) -> Vec<&'a Task> {
    tasks.iter().filter(|task| selection.matches(task)).collect()
}

/// Summary statistics over the full task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Completed share as a whole percentage, rounded half-up; 0 when the
    /// list is empty.
    pub completion_rate: u32,
    pub active_count: usize,
    pub high_priority_open_count: usize,
}

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let high_priority_open_count = tasks
        .iter()
        .filter(|task| task.priority == Priority::High && !task.completed)
        .count();

    let completion_rate = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };

    TaskStats {
        total,
        completed,
        completion_rate,
        active_count: total - completed,
        high_priority_open_count,
    }
}
