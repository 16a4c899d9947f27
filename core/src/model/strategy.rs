use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::TaskError;
use crate::model::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    Completion,
    Project,
}

impl FromStr for SortKey {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "due" | "date" | "due-date" => Ok(SortKey::DueDate),
            "priority" | "pri" => Ok(SortKey::Priority),
            "completion" | "status" | "done" => Ok(SortKey::Completion),
            "project" => Ok(SortKey::Project),
            other => Err(TaskError::Validation(format!("Unknown sort key '{}'", other))),
        }
    }
}

impl SortKey {
    // Total order for this key. Callers sort stably, so ties keep the
    // existing order.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::DueDate => compare_due(a, b),
            SortKey::Priority => a.priority().name().cmp(b.priority().name()),
            SortKey::Completion => a.is_complete().cmp(&b.is_complete()),
            SortKey::Project => a.project().cmp(b.project()),
        }
    }
}

fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due_date(), b.due_date()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    tasks.sort_by(|a, b| key.compare(a, b));
}
