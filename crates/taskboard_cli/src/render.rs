use crate::cli::ListScope;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::TodoView;
use taskboard_core::config::Palette;
use taskboard_core::error::AppError;
use taskboard_core::model::{CompletedTask, Task};
use taskboard_core::view::format_completed_at;
use time::UtcOffset;

#[derive(Tabled)]
struct ActiveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Checked")]
    checked: &'static str,
    #[tabled(rename = "Task")]
    text: String,
}

#[derive(Tabled)]
struct CompletedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Completed")]
    completed_at: String,
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

pub fn stats_line(view: &TodoView) -> String {
    format!(
        "Active: {} | Completed: {}",
        view.active_count(),
        view.completed_count()
    )
}

pub fn list_plain(view: &TodoView, scope: ListScope, palette: &Palette, offset: UtcOffset) -> String {
    let mut sections = Vec::new();

    if scope.shows_active() {
        let heading = palette.accentize(&format!("Active tasks ({})", view.active_count()));
        let body = if view.tasks().is_empty() {
            "No active tasks.".to_string()
        } else {
            table(
                view.tasks()
                    .iter()
                    .map(|task| ActiveRow {
                        id: task.id.clone(),
                        checked: if view.is_checked(&task.id) { "[x]" } else { "[ ]" },
                        text: task.text.clone(),
                    })
                    .collect(),
            )
        };
        sections.push(format!("{heading}\n{body}"));
    }

    if scope.shows_completed() {
        let heading = palette.accentize(&format!("Completed tasks ({})", view.completed_count()));
        let body = if view.completed().is_empty() {
            "No completed tasks.".to_string()
        } else {
            table(
                view.completed()
                    .iter()
                    .map(|task| CompletedRow {
                        id: task.id.clone(),
                        text: task.text.clone(),
                        completed_at: palette
                            .mutedize(&format_completed_at(&task.completed_at, offset)),
                    })
                    .collect(),
            )
        };
        sections.push(format!("{heading}\n{body}"));
    }

    sections.join("\n\n")
}

fn active_json(view: &TodoView) -> serde_json::Value {
    view.tasks()
        .iter()
        .map(|task| {
            serde_json::json!({
                "id": task.id,
                "text": task.text,
                "checked": view.is_checked(&task.id),
            })
        })
        .collect()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn list_json(view: &TodoView, scope: ListScope) -> Result<serde_json::Value, AppError> {
    let mut payload = serde_json::Map::new();
    if scope.shows_active() {
        payload.insert("active".to_string(), active_json(view));
    }
    if scope.shows_completed() {
        payload.insert("completed".to_string(), to_json(view.completed())?);
    }
    Ok(serde_json::Value::Object(payload))
}

pub fn task_json(task: &Task) -> Result<serde_json::Value, AppError> {
    to_json(task)
}

pub fn completed_task_json(task: &CompletedTask) -> Result<serde_json::Value, AppError> {
    to_json(task)
}

pub fn stats_json(view: &TodoView) -> serde_json::Value {
    serde_json::json!({
        "active": view.active_count(),
        "completed": view.completed_count(),
    })
}
