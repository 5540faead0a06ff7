//! Error types for roost-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from install configuration and file deployment.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a deploy file into the install root failed (usually a missing source).
    #[error("failed to copy {source_path} to {destination}: {source}")]
    Copy {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `roost.yaml` exists but could not be parsed.
    #[error("failed to parse manifest at {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `Cargo.toml` exists but is not valid TOML.
    #[error("failed to parse {path}: {source}")]
    CargoManifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Problems the user has to fix in their environment before retrying.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no `{key}` environment variable is set and no env file exists at {path}")]
    EnvFileMissing { key: String, path: PathBuf },

    #[error("no environment variable set or presence in {path} for `{key}`")]
    SettingMissing { key: String, path: PathBuf },

    #[error("failed to read env file {path}: {details}")]
    EnvFileUnreadable { path: PathBuf, details: String },

    #[error("unsupported operating system '{os}'; expected windows, macos or linux")]
    UnsupportedPlatform { os: String },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
