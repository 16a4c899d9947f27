use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::input::TaskFields;
use crate::model::strategy::{sort_tasks, SortKey};
use crate::model::task::{normalize_title, Priority, Task};
use crate::repository::{FileTaskRepository, TaskRepository};
use crate::service::dto::{Summary, TaskRow};
use crate::time::{parse_due_date, today};

// `None` and blank text both mean "leave unchanged".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub project: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

impl TaskUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl From<TaskFields> for TaskUpdate {
    fn from(fields: TaskFields) -> Self {
        Self {
            title: fields.title,
            project: fields.project,
            due_date: fields.due,
            priority: fields.priority,
            notes: fields.notes,
        }
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// Tasks are addressed by their current 0-based position. Removing a task
// shifts every later task down by one, so positions are only valid until
// the next `remove` or `sort_by`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Task> {
        self.tasks.get(index).ok_or(TaskError::Index {
            index,
            len: self.tasks.len(),
        })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Task> {
        let len = self.tasks.len();
        self.tasks
            .get_mut(index)
            .ok_or(TaskError::Index { index, len })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn add(
        &mut self,
        title: &str,
        project: &str,
        due_date: &str,
        priority: &str,
        notes: &str,
    ) -> Result<usize> {
        self.add_as_of(title, project, due_date, priority, notes, today())
    }

    pub(crate) fn add_as_of(
        &mut self,
        title: &str,
        project: &str,
        due_date: &str,
        priority: &str,
        notes: &str,
        today: NaiveDate,
    ) -> Result<usize> {
        let due = parse_due_date(due_date)?;
        let mut task = Task::create(title, project, due, Priority::parse(priority), today)?;
        task.set_notes(Some(notes));

        if self.find_duplicate(&task, None).is_some() {
            warn!(title = task.title(), "rejected duplicate task");
            return Err(TaskError::Duplicate {
                title: task.title().to_string(),
                due: task.due_date(),
            });
        }

        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        debug!(index, title = self.tasks[index].title(), "added task");
        Ok(index)
    }

    fn find_duplicate(&self, task: &Task, skip: Option<usize>) -> Option<usize> {
        let title = task.normalized_title();
        self.tasks.iter().enumerate().position(|(i, t)| {
            Some(i) != skip
                && !title.is_empty()
                && normalize_title(t.title()) == title
                && t.due_date() == task.due_date()
        })
    }

    // All changes are validated on a copy first, so a bad due date leaves
    // an accompanying new title unapplied too. Returns whether the task
    // actually changed.
    pub fn update(&mut self, index: usize, changes: &TaskUpdate) -> Result<bool> {
        self.update_as_of(index, changes, today())
    }

    pub(crate) fn update_as_of(
        &mut self,
        index: usize,
        changes: &TaskUpdate,
        today: NaiveDate,
    ) -> Result<bool> {
        let current = self.get(index)?;
        let mut updated = current.clone();

        if let Some(title) = provided(&changes.title) {
            updated.set_title(title)?;
        }
        if let Some(project) = provided(&changes.project) {
            updated.set_project(project);
        }
        if let Some(due) = provided(&changes.due_date) {
            if let Some(date) = parse_due_date(due)? {
                updated.set_due_date_as_of(date, today)?;
            }
        }
        if let Some(priority) = provided(&changes.priority) {
            updated.set_priority(priority);
        }
        if let Some(notes) = provided(&changes.notes) {
            updated.set_notes(Some(notes));
        }

        if updated == *current {
            return Ok(false);
        }
        if self.find_duplicate(&updated, Some(index)).is_some() {
            warn!(index, title = updated.title(), "update would duplicate another task");
            return Err(TaskError::Duplicate {
                title: updated.title().to_string(),
                due: updated.due_date(),
            });
        }

        self.tasks[index] = updated;
        debug!(index, "updated task");
        Ok(true)
    }

    pub fn complete(&mut self, index: usize) -> Result<()> {
        self.get_mut(index)?.mark_completed();
        debug!(index, "marked task completed");
        Ok(())
    }

    pub fn incomplete(&mut self, index: usize) -> Result<()> {
        self.get_mut(index)?.mark_incomplete();
        debug!(index, "marked task incomplete");
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Task> {
        self.get(index)?;
        let task = self.tasks.remove(index);
        debug!(index, title = task.title(), "removed task");
        Ok(task)
    }

    pub fn count<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Task) -> bool,
    {
        self.tasks.iter().filter(|t| predicate(t)).count()
    }

    pub fn completed_count(&self) -> usize {
        self.count(Task::is_complete)
    }

    pub fn not_completed_count(&self) -> usize {
        self.count(|t| !t.is_complete())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.len(),
            completed: self.completed_count(),
            not_completed: self.not_completed_count(),
        }
    }

    pub fn search(&self, keyword: &str) -> Vec<(usize, &Task)> {
        let keyword = keyword.trim().to_lowercase();
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                t.title().to_lowercase().contains(&keyword)
                    || t.project().to_lowercase().contains(&keyword)
            })
            .collect()
    }

    pub fn sorted_view(&self, key: SortKey) -> Vec<(usize, &Task)> {
        let mut view: Vec<(usize, &Task)> = self.tasks.iter().enumerate().collect();
        view.sort_by(|(_, a), (_, b)| key.compare(a, b));
        view
    }

    // Reorders the stored sequence. This changes positions and the order
    // written by the next save.
    pub fn sort_by(&mut self, key: SortKey) {
        sort_tasks(&mut self.tasks, key);
        debug!(?key, "sorted tasks");
    }

    pub fn list_with_index(&self) -> Vec<TaskRow> {
        let today = today();
        rows(self.tasks.iter().enumerate(), today)
    }

    pub fn list_by_due_date(&self) -> Vec<TaskRow> {
        rows(self.sorted_view(SortKey::DueDate), today())
    }

    pub fn list_by_project(&self) -> Vec<TaskRow> {
        rows(self.sorted_view(SortKey::Project), today())
    }

    pub fn load(&mut self, repo: &impl TaskRepository) -> Result<()> {
        let tasks = repo.load()?;
        if let Some((first, second)) = first_collision(&tasks) {
            warn!(first, second, "stored tasks share title and due date");
            return Err(TaskError::CorruptData {
                path: repo.location().to_path_buf(),
                reason: format!(
                    "tasks {} and {} are both '{}' due {}",
                    first + 1,
                    second + 1,
                    tasks[second].title(),
                    tasks[second]
                        .due_date()
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            });
        }
        self.tasks = tasks;
        Ok(())
    }

    pub fn save(&self, repo: &impl TaskRepository) -> Result<()> {
        repo.save(&self.tasks)
    }

    pub fn load_from(&mut self, path: &Path) -> Result<()> {
        self.load(&FileTaskRepository::new(path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.save(&FileTaskRepository::new(path))
    }
}

// Positions of the first two tasks with the same normalized title and due date.
fn first_collision(tasks: &[Task]) -> Option<(usize, usize)> {
    let mut seen: HashMap<(String, Option<NaiveDate>), usize> = HashMap::new();
    for (index, task) in tasks.iter().enumerate() {
        let key = (task.normalized_title(), task.due_date());
        if let Some(&first) = seen.get(&key) {
            return Some((first, index));
        }
        seen.insert(key, index);
    }
    None
}

pub(crate) fn rows<'a>(
    view: impl IntoIterator<Item = (usize, &'a Task)>,
    today: NaiveDate,
) -> Vec<TaskRow> {
    view.into_iter()
        .map(|(index, task)| TaskRow::from_entity(index, task, today))
        .collect()
}
