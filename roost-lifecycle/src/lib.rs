//! # roost-lifecycle
//!
//! Sequences build, process control, file deployment and startup scheduling
//! into the three top-level operations: [`Lifecycle::deploy`],
//! [`Lifecycle::uninstall`] and [`Lifecycle::kill`].

pub mod build;
mod error;
pub mod launch;
pub mod orchestrator;

pub use build::{BuildStep, CargoBuild};
pub use error::LifecycleError;
pub use launch::{DetachedLauncher, Launcher};
pub use orchestrator::{
    DeployOptions, DeployReport, FileStatus, InstallStatus, Lifecycle, UninstallReport,
};
