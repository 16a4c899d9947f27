use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};
use crate::time::{days_between, today};

// Days ahead of the due date at which `render` starts nagging.
pub const DUE_SOON_DAYS: i64 = 2;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    title: String,
    project: String,
    due_date: Option<NaiveDate>,
    priority: Priority,
    complete: bool,
    completed_date: Option<NaiveDate>,
    notes: String,
}

// Due dates are not checked against today: a loaded task may be overdue.
#[derive(Deserialize)]
struct TaskRecord {
    title: String,
    #[serde(default)]
    project: String,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    complete: bool,
    #[serde(default)]
    completed_date: Option<NaiveDate>,
    #[serde(default)]
    notes: String,
}

impl TryFrom<TaskRecord> for Task {
    type Error = String;

    fn try_from(record: TaskRecord) -> std::result::Result<Self, Self::Error> {
        let title = record.title.trim();
        if title.is_empty() {
            return Err("task record with an empty title".to_string());
        }
        if record.complete && record.completed_date.is_none() {
            return Err(format!("completed task '{}' has no completed_date", title));
        }
        Ok(Task {
            title: title.to_string(),
            project: record.project.trim().to_string(),
            due_date: record.due_date,
            priority: record.priority,
            complete: record.complete,
            completed_date: if record.complete { record.completed_date } else { None },
            notes: record.notes.trim().to_string(),
        })
    }
}

impl Task {
    pub(crate) fn create(
        title: &str,
        project: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
        today: NaiveDate,
    ) -> Result<Self> {
        let mut task = Task {
            title: String::new(),
            project: String::new(),
            due_date: None,
            priority,
            complete: false,
            completed_date: None,
            notes: String::new(),
        };
        task.set_title(title)?;
        task.set_project(project);
        if let Some(date) = due_date {
            task.set_due_date_as_of(date, today)?;
        }
        Ok(task)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn completed_date(&self) -> Option<NaiveDate> {
        self.completed_date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::Validation("Title can not be empty.".to_string()));
        }
        self.title = title.to_string();
        Ok(())
    }

    pub fn set_project(&mut self, project: &str) {
        self.project = project.trim().to_string();
    }

    pub fn set_due_date(&mut self, date: NaiveDate) -> Result<()> {
        self.set_due_date_as_of(date, today())
    }

    pub(crate) fn set_due_date_as_of(&mut self, date: NaiveDate, today: NaiveDate) -> Result<()> {
        if date < today {
            return Err(TaskError::Date(format!(
                "{} is in the past. Past dates are not allowed",
                date
            )));
        }
        self.due_date = Some(date);
        Ok(())
    }

    pub fn set_priority(&mut self, priority: &str) {
        self.priority = Priority::parse(priority);
    }

    pub fn set_notes(&mut self, notes: Option<&str>) {
        self.notes = notes.map(str::trim).unwrap_or_default().to_string();
    }

    pub fn mark_completed(&mut self) {
        self.mark_completed_on(today());
    }

    pub(crate) fn mark_completed_on(&mut self, today: NaiveDate) {
        self.complete = true;
        self.completed_date = Some(today);
    }

    pub fn mark_incomplete(&mut self) {
        self.complete = false;
        self.completed_date = None;
    }

    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| days_between(today, due))
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.complete && self.days_until_due(today).is_some_and(|days| days < 0)
    }

    pub fn is_due_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        !self.complete
            && self
                .days_until_due(today)
                .is_some_and(|days| (0..=window_days).contains(&days))
    }

    pub fn render(&self) -> String {
        self.render_as_of(today(), DUE_SOON_DAYS)
    }

    pub fn render_as_of(&self, today: NaiveDate, due_soon_days: i64) -> String {
        let dash = || "-".to_string();
        let mut out = format!(
            "Title     : {}\n\
             Project   : {}\n\
             Due Date  : {}\n\
             Priority  : {}\n\
             Status    : {}\n\
             Completed : {}\n\
             Notes     : {}\n",
            self.title,
            self.project,
            self.due_date.map(|d| d.to_string()).unwrap_or_else(dash),
            self.priority,
            if self.complete { "Completed" } else { "NOT COMPLETED" },
            self.completed_date.map(|d| d.to_string()).unwrap_or_else(dash),
            if self.notes.is_empty() { "-" } else { self.notes.as_str() },
        );
        if self.is_due_soon(today, due_soon_days) {
            if let Some(days) = self.days_until_due(today) {
                out.push_str(&format!("Reminder  : due in {} day(s)\n", days));
            }
        }
        out
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
