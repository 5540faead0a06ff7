//! Host platform detection and the per-platform path layout.
//!
//! Every path helper takes an explicit `home` so tests can point it at a
//! `TempDir`; nothing here touches the filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;

/// Operating systems roost knows how to install onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Result<Self, ConfigurationError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a [`Platform`].
    pub fn from_os(os: &str) -> Result<Self, ConfigurationError> {
        match os {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            other => Err(ConfigurationError::UnsupportedPlatform {
                os: other.to_owned(),
            }),
        }
    }

    /// File name of the built executable for a cargo package called `name`.
    pub fn exe_name(self, name: &str) -> String {
        match self {
            Self::Windows => format!("{name}.exe"),
            Self::MacOs | Self::Linux => name.to_owned(),
        }
    }

    /// `<home>/AppData/Local/<name>`, `<home>/Library/Application Support/<name>`
    /// or `<home>/.local/share/<name>`.
    pub fn install_root_at(self, home: &Path, name: &str) -> PathBuf {
        match self {
            Self::Windows => home.join("AppData").join("Local").join(name),
            Self::MacOs => home
                .join("Library")
                .join("Application Support")
                .join(name),
            Self::Linux => home.join(".local").join("share").join(name),
        }
    }

    /// The per-user startup folder. Only Windows schedules through a folder.
    pub fn startup_dir_at(self, home: &Path) -> Option<PathBuf> {
        match self {
            Self::Windows => Some(
                home.join("AppData")
                    .join("Roaming")
                    .join("Microsoft")
                    .join("Windows")
                    .join("Start Menu")
                    .join("Programs")
                    .join("Startup"),
            ),
            Self::MacOs | Self::Linux => None,
        }
    }

    /// Whether startup scheduling goes through the user's cron table.
    pub fn uses_cron(self) -> bool {
        !matches!(self, Self::Windows)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        };
        f.write_str(s)
    }
}
