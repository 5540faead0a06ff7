use std::path::{Path, PathBuf};

use roost_core::{DeployFile, LauncherStyle, RemoveOutcome};

use super::{StartupScheduler, UnscheduleOutcome};
use crate::error::PlatformError;

/// Schedules by dropping a `.cmd` launcher into the user's Startup folder.
#[derive(Debug, Clone)]
pub struct DropInScheduler {
    file: DeployFile,
}

impl DropInScheduler {
    /// `path` is the launcher inside the Startup folder, `target` the
    /// installed executable it starts.
    pub fn new(path: PathBuf, target: PathBuf) -> Self {
        Self {
            file: DeployFile::launcher(target, path, LauncherStyle::Cmd).with_absolute_destination(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file.destination
    }

    fn target_dir(&self) -> &Path {
        self.file.source.parent().unwrap_or(Path::new("."))
    }
}

impl StartupScheduler for DropInScheduler {
    fn is_scheduled(&self) -> Result<bool, PlatformError> {
        Ok(self.path().is_file())
    }

    fn schedule(&self) -> Result<(), PlatformError> {
        self.file.deploy(self.target_dir(), self.target_dir())?;
        tracing::info!("scheduled at startup: {}", self.path().display());
        Ok(())
    }

    fn unschedule(&self) -> Result<UnscheduleOutcome, PlatformError> {
        match self.file.remove(self.target_dir())? {
            RemoveOutcome::Removed => {
                tracing::info!("removed startup launcher {}", self.path().display());
                Ok(UnscheduleOutcome::Unscheduled)
            }
            RemoveOutcome::AlreadyAbsent => Ok(UnscheduleOutcome::WasNotScheduled),
        }
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}
