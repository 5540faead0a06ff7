//! Thin wrapper over `std::process::Command` for the system tools roost drives
//! (`tasklist`, `taskkill`, `pgrep`, `pkill`, `crontab`).

use std::io::Write;
use std::process::{Command, Output, Stdio};

use crate::error::PlatformError;

/// Captured result of a finished tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout + stderr, for error details.
    pub fn details(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        let status = match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, true) => status,
            (false, true) => format!("{status}: {stdout}"),
            (true, false) => format!("{status}: {stderr}"),
            (false, false) => format!("{status}: {stdout} {stderr}"),
        }
    }
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Run `program args..` to completion and capture its output.
pub fn run_tool(program: &str, args: &[&str]) -> Result<ToolOutput, PlatformError> {
    tracing::debug!("running {program} {}", args.join(" "));
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| PlatformError::Command {
            program: program.to_string(),
            source,
        })?;
    Ok(output.into())
}

/// Run `program args..` feeding `input` on stdin.
pub fn run_tool_with_stdin(
    program: &str,
    args: &[&str],
    input: &str,
) -> Result<ToolOutput, PlatformError> {
    tracing::debug!("running {program} {} with piped stdin", args.join(" "));
    let command_err = |source| PlatformError::Command {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(command_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).map_err(command_err)?;
    }
    let output = child.wait_with_output().map_err(command_err)?;
    Ok(output.into())
}
