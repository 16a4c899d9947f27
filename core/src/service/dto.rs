use chrono::NaiveDate;

use crate::model::task::{Priority, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    // 1-based position in the collection; what the user types to pick a task.
    pub number: usize,
    pub title: String,
    pub project: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    // 0 when there is no due date.
    pub days_until_due: i64,
    pub complete: bool,
    pub overdue: bool,
}

impl TaskRow {
    pub fn from_entity(index: usize, task: &Task, today: NaiveDate) -> Self {
        Self {
            number: index + 1,
            title: task.title().to_string(),
            project: task.project().to_string(),
            priority: task.priority(),
            due_date: task.due_date(),
            days_until_due: task.days_until_due(today).unwrap_or(0),
            complete: task.is_complete(),
            overdue: task.is_overdue(today),
        }
    }

    pub fn due_label(&self) -> String {
        self.due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn completed_label(&self) -> &'static str {
        if self.complete {
            "YES"
        } else {
            "NO"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub not_completed: usize,
}
