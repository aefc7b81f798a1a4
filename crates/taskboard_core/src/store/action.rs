use super::source::{Clock, IdSource};

/// A single state transition understood by [`TaskStore::apply`](super::TaskStore::apply).
///
/// Ids and timestamps are drawn when the action is built, so applying the
/// same action to the same state always yields the same result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTask { id: String, text: String },
    DeleteTask { id: String },
    CompleteTask { id: String, completed_at: String },
    ClearCompleted,
}

impl Action {
    pub fn add_task(text: &str, ids: &dyn IdSource) -> Self {
        Self::AddTask {
            id: ids.next_id(),
            text: text.trim().to_string(),
        }
    }

    pub fn delete_task(id: &str) -> Self {
        Self::DeleteTask { id: id.to_string() }
    }

    pub fn complete_task(id: &str, clock: &dyn Clock) -> Self {
        Self::CompleteTask {
            id: id.to_string(),
            completed_at: clock.now(),
        }
    }

    pub fn clear_completed() -> Self {
        Self::ClearCompleted
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddTask { .. } => "add_task",
            Self::DeleteTask { .. } => "delete_task",
            Self::CompleteTask { .. } => "complete_task",
            Self::ClearCompleted => "clear_completed",
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::AddTask { id, .. } | Self::DeleteTask { id } | Self::CompleteTask { id, .. } => {
                Some(id.as_str())
            }
            Self::ClearCompleted => None,
        }
    }
}
