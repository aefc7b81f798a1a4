use crate::config::DEFAULT_MIN_TASK_LENGTH;
use crate::error::AppError;
use crate::model::{CompletedTask, Task};
use crate::store::{Action, Clock, IdSource, SystemClock, TaskStore, UuidIdSource};
use std::collections::HashSet;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};

/// The to-do page: owns the store, validates input and gates completion
/// behind a per-task "checked" flag that the store never sees.
pub struct TodoView {
    store: TaskStore,
    checked: HashSet<String>,
    min_task_length: usize,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
}

impl Default for TodoView {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TASK_LENGTH)
    }
}

impl TodoView {
    pub fn new(min_task_length: usize) -> Self {
        Self::with_sources(min_task_length, Box::new(SystemClock), Box::new(UuidIdSource))
    }

    pub fn with_sources(
        min_task_length: usize,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdSource>,
    ) -> Self {
        Self {
            store: TaskStore::new(),
            checked: HashSet::new(),
            min_task_length,
            clock,
            ids,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn completed(&self) -> &[CompletedTask] {
        self.store.completed()
    }

    pub fn active_count(&self) -> usize {
        self.store.active_count()
    }

    pub fn completed_count(&self) -> usize {
        self.store.completed_count()
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    fn dispatch(&mut self, action: Action) {
        self.store = self.store.apply(&action);
    }

    pub fn add(&mut self, text: &str) -> Result<Task, AppError> {
        if text.trim().chars().count() < self.min_task_length {
            debug!(len = text.trim().chars().count(), "rejecting short task text");
            return Err(AppError::invalid_input(format!(
                "Task must be at least {} characters.",
                self.min_task_length
            )));
        }

        let action = Action::add_task(text, self.ids.as_ref());
        let id = action.task_id().unwrap_or_default().to_string();
        self.dispatch(action);

        self.store
            .find_task(&id)
            .cloned()
            .ok_or_else(|| AppError::invalid_data("generated task id already in use"))
    }

    /// Flips the checked flag of an active task and returns the new value.
    pub fn toggle_checked(&mut self, id: &str) -> Result<bool, AppError> {
        let id = require_id(id)?;
        if self.store.find_task(id).is_none() {
            return Err(AppError::invalid_input("task not found"));
        }

        if self.checked.remove(id) {
            Ok(false)
        } else {
            self.checked.insert(id.to_string());
            Ok(true)
        }
    }

    pub fn complete(&mut self, id: &str) -> Result<CompletedTask, AppError> {
        let id = require_id(id)?;
        if self.store.find_task(id).is_none() {
            return Err(AppError::invalid_input("task not found"));
        }
        if !self.checked.contains(id) {
            debug!(id, "complete blocked, task not checked");
            return Err(AppError::invalid_input(
                "Check the task before completing it.",
            ));
        }

        self.dispatch(Action::complete_task(id, self.clock.as_ref()));
        self.checked.remove(id);

        self.store
            .completed()
            .first()
            .filter(|task| task.id == id)
            .cloned()
            .ok_or_else(|| AppError::invalid_data("completed task missing after promotion"))
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, AppError> {
        let id = require_id(id)?;
        let removed = self
            .store
            .find_task(id)
            .cloned()
            .ok_or_else(|| AppError::invalid_input("task not found"))?;

        self.dispatch(Action::delete_task(id));
        self.checked.remove(id);

        Ok(removed)
    }

    /// Drops every completed task and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let count = self.store.completed_count();
        if count == 0 {
            info!("nothing to clear");
            return 0;
        }

        self.dispatch(Action::clear_completed());
        count
    }
}

fn require_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Renders an RFC 3339 stamp as `YYYY-MM-DD HH:MM:SS` in `offset`.
/// Anything unparseable is passed through unchanged.
pub fn format_completed_at(raw: &str, offset: UtcOffset) -> String {
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|stamp| stamp.to_offset(offset).format(&display).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::{TodoView, format_completed_at};
    use crate::store::{FixedClock, SequentialIds};
    use time::UtcOffset;
    use time::macros::offset;

    fn view() -> TodoView {
        TodoView::with_sources(
            2,
            Box::new(FixedClock("2025-12-20T10:00:00Z".to_string())),
            Box::new(SequentialIds::new()),
        )
    }

    #[test]
    fn add_rejects_short_text() {
        let mut view = view();

        let err = view.add("  a  ").unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.message(), "Task must be at least 2 characters.");
        assert_eq!(view.active_count(), 0);
    }

    #[test]
    fn add_uses_configured_minimum() {
        let mut view = TodoView::with_sources(
            5,
            Box::new(FixedClock("2025-12-20T10:00:00Z".to_string())),
            Box::new(SequentialIds::new()),
        );

        assert!(view.add("tiny").is_err());
        assert_eq!(view.add("  plenty ").unwrap().text, "plenty");
    }

    #[test]
    fn add_returns_created_task() {
        let mut view = view();

        let task = view.add("  Buy milk ").unwrap();

        assert_eq!(task.id, "task-1");
        assert_eq!(task.text, "Buy milk");
        assert_eq!(view.tasks()[0], task);
    }

    #[test]
    fn complete_requires_checked_task() {
        let mut view = view();
        let task = view.add("Buy milk").unwrap();

        let err = view.complete(&task.id).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(view.active_count(), 1);

        assert!(view.toggle_checked(&task.id).unwrap());
        let done = view.complete(&task.id).unwrap();

        assert_eq!(done.id, task.id);
        assert_eq!(done.completed_at, "2025-12-20T10:00:00Z");
        assert_eq!(view.active_count(), 0);
        assert_eq!(view.completed_count(), 1);
        assert!(!view.is_checked(&task.id));
    }

    #[test]
    fn toggle_twice_unchecks() {
        let mut view = view();
        let task = view.add("Buy milk").unwrap();

        assert!(view.toggle_checked(&task.id).unwrap());
        assert!(!view.toggle_checked(&task.id).unwrap());
        assert!(view.complete(&task.id).is_err());
    }

    #[test]
    fn toggle_rejects_unknown_or_blank_id() {
        let mut view = view();

        assert_eq!(view.toggle_checked("task-9").unwrap_err().message(), "task not found");
        assert_eq!(view.toggle_checked("  ").unwrap_err().message(), "id is required");
    }

    #[test]
    fn complete_rejects_unknown_id() {
        let mut view = view();

        let err = view.complete("task-9").unwrap_err();

        assert_eq!(err.message(), "task not found");
    }

    #[test]
    fn delete_drops_checked_flag() {
        let mut view = view();
        let task = view.add("Buy milk").unwrap();
        view.toggle_checked(&task.id).unwrap();

        let removed = view.delete(&task.id).unwrap();

        assert_eq!(removed, task);
        assert!(!view.is_checked(&task.id));
        assert!(view.delete(&task.id).is_err());
        assert_eq!(view.completed_count(), 0);
    }

    #[test]
    fn clear_completed_reports_count() {
        let mut view = view();
        assert_eq!(view.clear_completed(), 0);

        for text in ["one", "two"] {
            let task = view.add(text).unwrap();
            view.toggle_checked(&task.id).unwrap();
            view.complete(&task.id).unwrap();
        }
        view.add("three").unwrap();

        assert_eq!(view.clear_completed(), 2);
        assert_eq!(view.completed_count(), 0);
        assert_eq!(view.active_count(), 1);
    }

    #[test]
    fn lists_stay_newest_first() {
        let mut view = view();
        view.add("A.").unwrap();
        view.add("B.").unwrap();

        let texts: Vec<&str> = view.tasks().iter().map(|task| task.text.as_str()).collect();
        assert_eq!(texts, vec!["B.", "A."]);
    }

    #[test]
    fn format_completed_at_uses_offset() {
        assert_eq!(
            format_completed_at("2025-12-20T10:00:00Z", UtcOffset::UTC),
            "2025-12-20 10:00:00"
        );
        assert_eq!(
            format_completed_at("2025-12-20T23:30:00Z", offset!(+2)),
            "2025-12-21 01:30:00"
        );
    }

    #[test]
    fn format_completed_at_passes_through_garbage() {
        assert_eq!(format_completed_at("yesterday", UtcOffset::UTC), "yesterday");
    }
}
