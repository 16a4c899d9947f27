pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use config::Config;
pub use error::{Result, TaskError};
pub use input::{expand_key, parse_args, parse_task_fields, ParsedInput, TaskFields};
pub use model::strategy::SortKey;
pub use model::task::{Priority, Task};
pub use repository::{FileTaskRepository, TaskRepository};
pub use service::dto::{Summary, TaskRow};
pub use service::task_collection::{TaskCollection, TaskUpdate};
pub use time::{parse_date, parse_due_date, today};
