//! Detect and terminate the managed executable by name.
//!
//! Kill is a single OS-level action whose exit status already tells "was not
//! running" apart from "could not kill", so callers never check first.

use roost_core::Platform;

use crate::command::{run_tool, ToolOutput};
use crate::error::PlatformError;

/// Result of a kill attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Killed,
    NotRunning,
}

/// Platform-specific process detection and termination.
pub trait ProcessController {
    /// Whether any process with executable name `name` is running.
    fn is_running(&self, name: &str) -> Result<bool, PlatformError>;

    /// Forcefully terminate every process named `name`.
    fn kill(&self, name: &str) -> Result<KillOutcome, PlatformError>;
}

/// Select the controller for `platform`.
pub fn process_controller_for(platform: Platform) -> Box<dyn ProcessController> {
    match platform {
        Platform::Windows => Box::new(TaskkillController),
        Platform::MacOs | Platform::Linux => Box::new(PkillController { platform }),
    }
}

// ---------------------------------------------------------------------------
// Windows: tasklist / taskkill
// ---------------------------------------------------------------------------

/// `tasklist` for detection, `taskkill /F` for termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskkillController;

/// `taskkill` exit code when no process matched the image name.
const TASKKILL_NOT_FOUND: i32 = 128;

impl ProcessController for TaskkillController {
    fn is_running(&self, name: &str) -> Result<bool, PlatformError> {
        let filter = format!("IMAGENAME eq {name}");
        let out = run_tool("tasklist", &["/FI", &filter, "/FO", "CSV", "/NH"])?;
        if !out.success() {
            return Err(PlatformError::ProcessQuery {
                name: name.to_string(),
                details: out.details(),
            });
        }
        Ok(tasklist_lists(&out.stdout, name))
    }

    fn kill(&self, name: &str) -> Result<KillOutcome, PlatformError> {
        let out = run_tool("taskkill", &["/F", "/IM", name])?;
        classify_taskkill(name, &out)
    }
}

/// Whether CSV `tasklist` output contains a row for `name`.
pub fn tasklist_lists(stdout: &str, name: &str) -> bool {
    let quoted = format!("\"{}\"", name.to_ascii_lowercase());
    stdout.lines().any(|line| {
        line.split(',')
            .next()
            .is_some_and(|image| image.trim().to_ascii_lowercase() == quoted)
    })
}

pub(crate) fn classify_taskkill(name: &str, out: &ToolOutput) -> Result<KillOutcome, PlatformError> {
    if out.success() {
        tracing::info!("killed {name}");
        return Ok(KillOutcome::Killed);
    }
    if out.code == Some(TASKKILL_NOT_FOUND) || out.stderr.contains("not found") {
        tracing::debug!("{name} was not running");
        return Ok(KillOutcome::NotRunning);
    }
    Err(PlatformError::KillFailure {
        name: name.to_string(),
        details: out.details(),
    })
}

// ---------------------------------------------------------------------------
// macOS / Linux: pgrep / pkill
// ---------------------------------------------------------------------------

/// `pgrep -x` for detection, `pkill -KILL -x` for termination.
#[derive(Debug, Clone, Copy)]
pub struct PkillController {
    pub platform: Platform,
}

/// Linux truncates process names (`comm`) to 15 bytes.
const LINUX_COMM_LEN: usize = 15;
/// macOS truncates `p_comm` to 16 bytes (`MAXCOMLEN`).
const MACOS_COMM_LEN: usize = 16;

impl PkillController {
    fn comm_len(&self) -> Option<usize> {
        match self.platform {
            Platform::Linux => Some(LINUX_COMM_LEN),
            Platform::MacOs => Some(MACOS_COMM_LEN),
            Platform::Windows => None,
        }
    }

    /// The exact-match pattern `pgrep`/`pkill` compare against.
    pub fn pattern(&self, name: &str) -> String {
        match self.comm_len() {
            Some(limit) if name.len() > limit => {
                let mut end = limit;
                while !name.is_char_boundary(end) {
                    end -= 1;
                }
                name[..end].to_string()
            }
            _ => name.to_string(),
        }
    }
}

impl ProcessController for PkillController {
    fn is_running(&self, name: &str) -> Result<bool, PlatformError> {
        let pattern = self.pattern(name);
        let out = run_tool("pgrep", &["-x", &pattern])?;
        match out.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(PlatformError::ProcessQuery {
                name: name.to_string(),
                details: out.details(),
            }),
        }
    }

    fn kill(&self, name: &str) -> Result<KillOutcome, PlatformError> {
        let pattern = self.pattern(name);
        let out = run_tool("pkill", &["-KILL", "-x", &pattern])?;
        classify_pkill(name, &out)
    }
}

pub(crate) fn classify_pkill(name: &str, out: &ToolOutput) -> Result<KillOutcome, PlatformError> {
    match out.code {
        Some(0) => {
            tracing::info!("killed {name}");
            Ok(KillOutcome::Killed)
        }
        // No match. pkill also exits 1 when a match could not be signalled,
        // in which case it says why on stderr.
        Some(1) if out.stderr.trim().is_empty() => {
            tracing::debug!("{name} was not running");
            Ok(KillOutcome::NotRunning)
        }
        _ => Err(PlatformError::KillFailure {
            name: name.to_string(),
            details: out.details(),
        }),
    }
}
