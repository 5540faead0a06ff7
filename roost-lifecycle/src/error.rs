use std::path::PathBuf;

use thiserror::Error;

use roost_core::CoreError;
use roost_platform::PlatformError;

/// Fatal failures of a lifecycle operation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The external build command failed; its own output has already gone to the terminal.
    #[error("build failed: `{command}` {details}")]
    BuildFailure { command: String, details: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file of the install set could not be deployed. Files before it were
    /// already replaced; nothing is rolled back.
    #[error("deploy aborted after {deployed} of {total} files: {source}")]
    PartialDeploy {
        deployed: usize,
        total: usize,
        #[source]
        source: CoreError,
    },

    #[error("failed to launch {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LifecycleError {
    LifecycleError::Io {
        path: path.into(),
        source,
    }
}
