use clap::Parser;
use clap::error::ErrorKind;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use taskboard_cli::cli::{Cli, collect_overrides};
use taskboard_cli::shell::{LineOutcome, Shell, normalize_parse_error};
use taskboard_core::config::{Config, load_config_with_fallback, merge_overrides};
use taskboard_core::error::AppError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKBOARD_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!(error = %err, "falling back to default configuration");
        eprintln!("WARNING: {}", err);
    }

    let overrides = collect_overrides(&cli.config_override)?;
    Ok(merge_overrides(&loaded.config, &overrides))
}

fn open_input(cli: &Cli) -> Result<Box<dyn BufRead>, AppError> {
    match cli.script.as_deref() {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn run_session(shell: &mut Shell, input: &mut dyn BufRead) -> Result<(), AppError> {
    let mut line = String::new();
    let stdout = io::stdout();

    loop {
        line.clear();
        let bytes = input
            .read_line(&mut line)
            .map_err(|err| AppError::io(err.to_string()))?;
        if bytes == 0 {
            break;
        }

        match shell.execute(&line) {
            Ok(LineOutcome::Print(text)) => {
                let mut out = stdout.lock();
                writeln!(out, "{text}").map_err(|err| AppError::io(err.to_string()))?;
                out.flush().map_err(|err| AppError::io(err.to_string()))?;
            }
            Ok(LineOutcome::Skip) => {}
            Ok(LineOutcome::Exit) => break,
            Err(err) => eprintln!("ERROR: {}", err),
        }
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli)?;
    let mut input = open_input(&cli)?;
    let mut shell = Shell::new(config, cli.json);

    info!(json = cli.json, "session started");
    run_session(&mut shell, input.as_mut())?;
    info!(
        active = shell.view().active_count(),
        completed = shell.view().completed_count(),
        "session ended"
    );

    Ok(())
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(&err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
