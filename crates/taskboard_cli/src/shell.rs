use crate::cli::{SessionCommand, SessionLine, split_command_line};
use crate::render;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use taskboard_core::TodoView;
use taskboard_core::config::{Config, Palette};
use taskboard_core::error::AppError;
use taskboard_core::view::local_offset;
use time::UtcOffset;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Print(String),
    Skip,
    Exit,
}

/// One interactive session: a single to-do view living for the lifetime of the process.
pub struct Shell {
    view: TodoView,
    config: Config,
    palette: Palette,
    offset: UtcOffset,
    json: bool,
}

impl Shell {
    pub fn new(config: Config, json: bool) -> Self {
        let view = TodoView::new(config.min_task_length());
        Self::with_view(view, config, json)
    }

    pub fn with_view(view: TodoView, config: Config, json: bool) -> Self {
        Self {
            view,
            palette: config.palette(),
            config,
            offset: local_offset(),
            json,
        }
    }

    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn view(&self) -> &TodoView {
        &self.view
    }

    pub fn help_text() -> String {
        SessionLine::command().render_help().to_string()
    }

    pub fn execute(&mut self, line: &str) -> Result<LineOutcome, AppError> {
        let mut args = split_command_line(line.trim())?;
        if let Some(expansion) = args.first().and_then(|word| self.config.alias(word)) {
            debug!(alias = %args[0], to = expansion, "expanded alias");
            let mut expanded = split_command_line(expansion)?;
            expanded.extend(args.drain(1..));
            args = expanded;
        }

        if args.is_empty() {
            return Ok(LineOutcome::Skip);
        }
        if args.len() == 1 {
            let word = args[0].as_str();
            if word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit") {
                return Ok(LineOutcome::Exit);
            }
            if word == "help" || word == "?" {
                return Ok(LineOutcome::Print(Self::help_text()));
            }
        }

        let parsed = match SessionLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                return Ok(LineOutcome::Print(err.render().to_string()));
            }
            Err(err) => return Err(normalize_parse_error(&err)),
        };

        self.run(parsed.command).map(LineOutcome::Print)
    }

    fn run(&mut self, command: SessionCommand) -> Result<String, AppError> {
        let output = match command {
            SessionCommand::Add { text } => {
                let task = self.view.add(&text.join(" "))?;
                if self.json {
                    render::task_json(&task)?.to_string()
                } else {
                    format!("Added task: {} ({})", task.text, task.id)
                }
            }
            SessionCommand::Check { id } => {
                let checked = self.view.toggle_checked(&id)?;
                if self.json {
                    serde_json::json!({ "id": id.trim(), "checked": checked }).to_string()
                } else if checked {
                    format!("Checked task: {}", id.trim())
                } else {
                    format!("Unchecked task: {}", id.trim())
                }
            }
            SessionCommand::Complete { id } => {
                let task = self.view.complete(&id)?;
                if self.json {
                    render::completed_task_json(&task)?.to_string()
                } else {
                    format!("Completed task: {} ({})", task.text, task.id)
                }
            }
            SessionCommand::Delete { id } => {
                let task = self.view.delete(&id)?;
                if self.json {
                    render::task_json(&task)?.to_string()
                } else {
                    format!("Deleted task: {} ({})", task.text, task.id)
                }
            }
            SessionCommand::Clear => {
                let cleared = self.view.clear_completed();
                if self.json {
                    serde_json::json!({ "cleared": cleared }).to_string()
                } else if cleared == 0 {
                    "No completed tasks to clear.".to_string()
                } else {
                    format!("Cleared {cleared} completed task(s)")
                }
            }
            SessionCommand::List { scope } => {
                if self.json {
                    render::list_json(&self.view, scope)?.to_string()
                } else {
                    render::list_plain(&self.view, scope, &self.palette, self.offset)
                }
            }
            SessionCommand::Stats => {
                if self.json {
                    render::stats_json(&self.view).to_string()
                } else {
                    render::stats_line(&self.view)
                }
            }
        };

        Ok(output)
    }
}

pub fn normalize_parse_error(err: &clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}
