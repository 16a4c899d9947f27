use std::path::Path;

use crate::error::Result;
use crate::model::task::Task;

// Whole-collection storage: every save overwrites, every load replaces.
pub trait TaskRepository {
    // Fails with `NotFound` when nothing has been stored yet and
    // `CorruptData` when the stored bytes do not decode.
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
    fn location(&self) -> &Path;
}
