pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod view;

pub use error::AppError;
pub use model::{CompletedTask, Task};
pub use store::{Action, TaskStore};
pub use view::TodoView;

#[cfg(test)]
mod tests {
    use crate::model::{CompletedTask, Task};

    #[test]
    fn completed_task_copies_task_fields() {
        let task = Task {
            id: "task-1".to_string(),
            text: "demo".to_string(),
        };

        let done = CompletedTask::from_task(&task, "2025-12-20T00:00:00Z");

        assert_eq!(done.id, "task-1");
        assert_eq!(done.text, "demo");
        assert_eq!(done.completed_at, "2025-12-20T00:00:00Z");
    }

    #[test]
    fn tasks_serialize_with_snake_case_fields() {
        let done = CompletedTask {
            id: "task-1".to_string(),
            text: "demo".to_string(),
            completed_at: "2025-12-20T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&done).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": "task-1",
                "text": "demo",
                "completed_at": "2025-12-20T00:00:00Z"
            })
        );
    }
}
