use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taskboard_core::config::{ConfigOverrides, canonical_key};
use taskboard_core::error::AppError;

/// Run an in-memory to-do board session. Commands are read one per line.
#[derive(Parser, Debug)]
#[command(name = "taskboard", author, version, long_about = None)]
pub struct Cli {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,

    /// Read commands from FILE instead of stdin
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    no_binary_name = true,
    disable_version_flag = true,
    after_help = "Also: help, ?, exit, quit"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Add a new task
    ///
    /// Example: add Buy milk
    Add {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Check or uncheck a task; only checked tasks can be completed
    ///
    /// Example: check task-3f2a...
    Check { id: String },
    /// Move a checked task to the completed list
    Complete { id: String },
    /// Delete an active task
    Delete { id: String },
    /// Remove every completed task
    Clear,
    /// List tasks
    ///
    /// Example: list completed
    List {
        #[arg(value_enum, default_value_t = ListScope::All)]
        scope: ListScope,
    },
    /// Show active and completed counts
    Stats,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Active,
    Completed,
    All,
}

impl ListScope {
    pub fn shows_active(self) -> bool {
        matches!(self, Self::Active | Self::All)
    }

    pub fn shows_completed(self) -> bool {
        matches!(self, Self::Completed | Self::All)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    MinTaskLength,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, AppError> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| AppError::invalid_data("override must be in KEY=VALUE format"))?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = match key_raw.split_once('.') {
        Some((field, rest)) => (field, Some(rest.trim())),
        None => (key_raw, None),
    };

    let target = match canonical_key(field).as_str() {
        "" => return Err(AppError::invalid_data("override key cannot be empty")),
        "theme" | "min_task_length" if remainder.is_some() => {
            return Err(AppError::invalid_data(format!(
                "{} override cannot have subfields",
                field.trim()
            )));
        }
        "theme" => ConfigOverrideTarget::Theme,
        "min_task_length" => ConfigOverrideTarget::MinTaskLength,
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| AppError::invalid_data("aliases override requires an alias name"))?;
            ConfigOverrideTarget::Alias(alias_name.to_string())
        }
        other => return Err(AppError::invalid_data(format!("unknown config field '{other}'"))),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::MinTaskLength => {
                let length = parsed.value.parse::<usize>().map_err(|_| {
                    AppError::invalid_data("min_task_length must be a non-negative integer")
                })?;
                overrides.min_task_length = Some(length);
            }
        }
    }

    Ok(overrides)
}

/// Splits a session line into words. Double quotes group words; inside
/// quotes `\"` and `\\` are escapes and any other backslash is kept.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_quotes => match chars.next() {
                Some(next @ ('"' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '"' => {
                in_quotes = !in_quotes;
                quoted_word = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted_word {
                    args.push(std::mem::take(&mut current));
                }
                quoted_word = false;
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted_word {
        args.push(current);
    }

    Ok(args)
}
