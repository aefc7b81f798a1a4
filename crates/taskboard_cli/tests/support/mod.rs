#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
}

pub fn command(config_path: &PathBuf) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_taskboard"));
    command
        .env("TASKBOARD_CONFIG_PATH", config_path)
        .env_remove("TASKBOARD_LOG");
    command
}

pub fn run_session_with(args: &[&str], config_path: &PathBuf, input: &str) -> Output {
    let mut child = command(config_path)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child.wait_with_output().expect("failed to read session output")
}

pub fn run_session(args: &[&str], input: &str) -> Output {
    let config_path = temp_path("missing-config.json");
    run_session_with(args, &config_path, input)
}

/// A `--json` session driven one line at a time, so later commands can use
/// ids printed by earlier ones. Every successful command prints exactly one line.
pub struct LiveSession {
    child: Child,
    stdout: BufReader<ChildStdout>,
    config_path: PathBuf,
}

impl LiveSession {
    pub fn start() -> Self {
        let config_path = temp_path("live-config.json");
        let mut child = command(&config_path)
            .arg("--json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn session");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdout,
            config_path,
        }
    }

    /// Sends a line that prints nothing on stdout (errors, blank lines).
    pub fn send_silent(&mut self, line: &str) {
        let stdin = self.child.stdin.as_mut().expect("stdin");
        writeln!(stdin, "{line}").expect("failed to write to stdin");
        stdin.flush().expect("failed to flush stdin");
    }

    pub fn send(&mut self, line: &str) -> serde_json::Value {
        self.send_silent(line);
        let mut reply = String::new();
        self.stdout
            .read_line(&mut reply)
            .expect("failed to read reply");
        serde_json::from_str(reply.trim()).expect("reply is JSON")
    }

    /// Closes stdin and returns everything written to stderr.
    pub fn finish(mut self) -> String {
        drop(self.child.stdin.take());
        let output = self.child.wait_with_output().expect("failed to wait for session");
        std::fs::remove_file(&self.config_path).ok();
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stderr).into_owned()
    }
}
