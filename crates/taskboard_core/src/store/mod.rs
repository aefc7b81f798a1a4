//! The task lifecycle container.
//!
//! A [`TaskStore`] is an immutable value holding the active tasks and the
//! completed tasks, both newest first. Every transition goes through
//! [`TaskStore::apply`], which returns a fresh store and leaves the receiver
//! untouched. Unknown ids are no-ops, never errors.

mod action;
mod source;

pub use action::Action;
pub use source::{Clock, FixedClock, IdSource, SequentialIds, SystemClock, UuidIdSource};

use crate::model::{CompletedTask, Task};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    completed: Vec<CompletedTask>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn completed(&self) -> &[CompletedTask] {
        &self.completed
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// True when `id` is known to either collection.
    pub fn contains(&self, id: &str) -> bool {
        self.find_task(id).is_some() || self.completed.iter().any(|task| task.id == id)
    }

    pub fn apply(&self, action: &Action) -> TaskStore {
        debug!(action = action.kind(), id = ?action.task_id(), "dispatch");

        match action {
            Action::AddTask { id, text } => {
                if self.contains(id) {
                    warn!(id = %id, "ignoring add with an id already in the store");
                    return self.clone();
                }

                let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
                tasks.push(Task {
                    id: id.clone(),
                    text: text.trim().to_string(),
                });
                tasks.extend(self.tasks.iter().cloned());

                TaskStore {
                    tasks,
                    completed: self.completed.clone(),
                }
            }
            Action::DeleteTask { id } => TaskStore {
                tasks: self
                    .tasks
                    .iter()
                    .filter(|task| &task.id != id)
                    .cloned()
                    .collect(),
                completed: self.completed.clone(),
            },
            Action::CompleteTask { id, completed_at } => {
                let Some(task) = self.find_task(id) else {
                    debug!(id = %id, "complete ignored, task is not active");
                    return self.clone();
                };

                let mut completed = Vec::with_capacity(self.completed.len() + 1);
                completed.push(CompletedTask::from_task(task, completed_at));
                completed.extend(self.completed.iter().cloned());

                TaskStore {
                    tasks: self
                        .tasks
                        .iter()
                        .filter(|task| &task.id != id)
                        .cloned()
                        .collect(),
                    completed,
                }
            }
            Action::ClearCompleted => TaskStore {
                tasks: self.tasks.clone(),
                completed: Vec::new(),
            },
        }
    }

    pub fn add(&self, text: &str, ids: &dyn IdSource) -> TaskStore {
        self.apply(&Action::add_task(text, ids))
    }

    pub fn delete(&self, id: &str) -> TaskStore {
        self.apply(&Action::delete_task(id))
    }

    pub fn complete(&self, id: &str, clock: &dyn Clock) -> TaskStore {
        self.apply(&Action::complete_task(id, clock))
    }

    pub fn clear_completed(&self) -> TaskStore {
        self.apply(&Action::clear_completed())
    }
}
