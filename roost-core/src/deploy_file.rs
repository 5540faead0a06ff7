//! Declarative source → install-location mapping.
//!
//! A [`DeployFile`] pairs a source (relative to the project directory unless
//! flagged absolute) with a destination (relative to the install root unless
//! flagged absolute). Both `deploy` and `remove` are idempotent.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};
use crate::launcher::LauncherStyle;

/// How a [`DeployFile`] materialises at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployKind {
    /// Byte-for-byte copy of the source.
    Copy,
    /// Generated launcher script; the source is the installed executable it starts.
    Launcher(LauncherStyle),
}

/// Outcome of [`DeployFile::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    AlreadyAbsent,
}

/// A single file that must exist at an install location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_is_absolute: bool,
    pub destination_is_absolute: bool,
    pub kind: DeployKind,
}

impl DeployFile {
    /// A plain copy of `<base>/<source>` to `<install root>/<destination>`.
    pub fn copy(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            source_is_absolute: false,
            destination_is_absolute: false,
            kind: DeployKind::Copy,
        }
    }

    /// A launcher script at `<install root>/<destination>` that starts the
    /// already-installed executable at the absolute path `target`.
    pub fn launcher(
        target: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        style: LauncherStyle,
    ) -> Self {
        Self {
            source: target.into(),
            destination: destination.into(),
            source_is_absolute: true,
            destination_is_absolute: false,
            kind: DeployKind::Launcher(style),
        }
    }

    /// Treat `destination` as an absolute path instead of install-root relative.
    pub fn with_absolute_destination(mut self) -> Self {
        self.destination_is_absolute = true;
        self
    }

    /// Resolved source path — pure, no I/O.
    pub fn source_path(&self, base: &Path) -> PathBuf {
        if self.source_is_absolute {
            self.source.clone()
        } else {
            base.join(&self.source)
        }
    }

    /// Resolved destination path — pure, no I/O.
    pub fn destination_path(&self, install_root: &Path) -> PathBuf {
        if self.destination_is_absolute {
            self.destination.clone()
        } else {
            install_root.join(&self.destination)
        }
    }

    /// Replace whatever is at the destination with a fresh copy of the source.
    ///
    /// A missing source is a [`CoreError::Copy`]; an existing destination is
    /// removed first so read-only or stale files never block the copy.
    pub fn deploy(&self, base: &Path, install_root: &Path) -> Result<PathBuf, CoreError> {
        let destination = self.destination_path(install_root);
        let source = self.source_path(base);

        self.remove(install_root)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        match self.kind {
            DeployKind::Copy => {
                fs::copy(&source, &destination).map_err(|e| CoreError::Copy {
                    source_path: source.clone(),
                    destination: destination.clone(),
                    source: e,
                })?;
            }
            DeployKind::Launcher(style) => {
                let work_dir = source.parent().unwrap_or(install_root);
                fs::write(&destination, style.render(&source, work_dir))
                    .map_err(|e| io_err(&destination, e))?;
                set_executable(&destination)?;
            }
        }

        tracing::debug!("deployed {} -> {}", source.display(), destination.display());
        Ok(destination)
    }

    /// Delete the destination. An absent destination is success.
    pub fn remove(&self, install_root: &Path) -> Result<RemoveOutcome, CoreError> {
        let destination = self.destination_path(install_root);
        match fs::remove_file(&destination) {
            Ok(()) => {
                tracing::debug!("removed {}", destination.display());
                Ok(RemoveOutcome::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::AlreadyAbsent),
            Err(e) => Err(io_err(destination, e)),
        }
    }

    /// Whether the destination currently exists.
    pub fn is_deployed(&self, install_root: &Path) -> bool {
        self.destination_path(install_root).is_file()
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}
