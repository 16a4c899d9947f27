use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

// None of these are fatal: callers print the message and return to the
// prompt they came from.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("REQUIRED: {0}")]
    Validation(String),

    #[error("Invalid date: {0}")]
    Date(String),

    #[error("Task number {} is not in the task list (1..={len})", .index + 1)]
    Index { index: usize, len: usize },

    #[error("Task already exists: '{title}' due {}", due_label(.due))]
    Duplicate {
        title: String,
        due: Option<NaiveDate>,
    },

    #[error("Data file {} does not exist or is not readable", .0.display())]
    NotFound(PathBuf),

    #[error("Data file {} is corrupt: {reason}", .path.display())]
    CorruptData { path: PathBuf, reason: String },

    #[error("Could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

fn due_label(due: &Option<NaiveDate>) -> String {
    due.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

pub type Result<T> = std::result::Result<T, TaskError>;
