use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::model::task::Task;
use crate::repository::traits::TaskRepository;

#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        FileTaskRepository {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn io_error(&self, source: std::io::Error) -> TaskError {
        TaskError::Io {
            path: self.file_path.clone(),
            source,
        }
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        if !self.file_path.is_file() {
            return Err(TaskError::NotFound(self.file_path.clone()));
        }
        let file =
            File::open(&self.file_path).map_err(|_| TaskError::NotFound(self.file_path.clone()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                return TaskError::NotFound(self.file_path.clone());
            }
            warn!(path = %self.file_path.display(), error = %e, "task file does not decode");
            TaskError::CorruptData {
                path: self.file_path.clone(),
                reason: e.to_string(),
            }
        })
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let file = File::create(&self.file_path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)
            .map_err(|e| self.io_error(e.into()))?;
        writer.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> Result<Vec<Task>> {
        let tasks = self.read_tasks()?;
        debug!(path = %self.file_path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.write_tasks(tasks)?;
        debug!(path = %self.file_path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.file_path
    }
}
