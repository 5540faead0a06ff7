//! Fire-and-forget start of the freshly deployed executable.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::LifecycleError;

/// Starts the installed program without waiting for it.
pub trait Launcher {
    /// Spawn `exe` with `work_dir` as working directory; returns the child's pid.
    fn launch(&self, exe: &Path, work_dir: &Path) -> Result<u32, LifecycleError>;
}

/// Spawns the program detached from roost's terminal and process group.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLauncher;

impl Launcher for DetachedLauncher {
    fn launch(&self, exe: &Path, work_dir: &Path) -> Result<u32, LifecycleError> {
        let mut command = Command::new(exe);
        command
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut command);

        let child = command.spawn().map_err(|source| LifecycleError::Launch {
            path: exe.to_path_buf(),
            source,
        })?;
        // Never waited on; the program outlives roost.
        let pid = child.id();
        tracing::info!("launched {} (pid {pid})", exe.display());
        Ok(pid)
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}
