use thiserror::Error;

/// Error surface for process control and startup scheduling.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The system tool could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exists (or might) but could not be terminated.
    #[error("failed to kill process {name}: {details}")]
    KillFailure { name: String, details: String },

    /// Listing running processes failed for a reason other than "no match".
    #[error("failed to query process {name}: {details}")]
    ProcessQuery { name: String, details: String },

    #[error("startup scheduler error: {0}")]
    Scheduler(String),

    #[error(transparent)]
    Core(#[from] roost_core::CoreError),
}
