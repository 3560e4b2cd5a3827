//! Suggestion collaborator for taskflow.
//!
//! The contract is a single call taking the current task list and
//! returning a batch of task drafts. The shipped implementation is a stub
//! that simulates latency and always returns the same three drafts; a real
//! integration would call an external recommendation service behind the
//! same trait, keeping the calling contract (may fail, returns drafts)
//! unchanged.

use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::task::{Category, Priority, Task, TaskDraft};

/// Simulated latency of the stub provider.
pub const DEFAULT_DELAY_MS: u64 = 1500;

/// External recommendation service seam.
pub trait SuggestionProvider {
    /// Produce a batch of drafts for the given workload.
    fn suggest(&self, tasks: &[Task]) -> Result<Vec<TaskDraft>>;
}

/// Stub provider: sleeps, then returns a fixed batch regardless of input.
#[derive(Debug, Clone)]
pub struct CannedSuggestions {
    delay: Duration,
}

impl CannedSuggestions {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The fixed batch every call returns.
    pub fn drafts() -> Vec<TaskDraft> {
        vec![
            TaskDraft {
                title: "Review weekly goals".to_string(),
                description: Some(
                    "Take time to review progress and adjust priorities".to_string(),
                ),
                completed: false,
                priority: Priority::Medium,
                category: Category::Personal,
                due_date: None,
            },
            TaskDraft {
                title: "Schedule deep work session".to_string(),
                description: Some(
                    "Block 2 hours for focused work on high-priority tasks".to_string(),
                ),
                completed: false,
                priority: Priority::High,
                category: Category::Work,
                due_date: None,
            },
            TaskDraft {
                title: "Take a break".to_string(),
                description: Some("Step away from screen for mental refresh".to_string()),
                completed: false,
                priority: Priority::Low,
                category: Category::Health,
                due_date: None,
            },
        ]
    }
}

impl Default for CannedSuggestions {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DELAY_MS))
    }
}

impl SuggestionProvider for CannedSuggestions {
    fn suggest(&self, _tasks: &[Task]) -> Result<Vec<TaskDraft>> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(Self::drafts())
    }
}
