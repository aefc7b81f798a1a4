use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub text: String,
    /// RFC 3339 timestamp taken when the task was promoted.
    pub completed_at: String,
}

impl CompletedTask {
    pub fn from_task(task: &Task, completed_at: &str) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            completed_at: completed_at.to_string(),
        }
    }
}
