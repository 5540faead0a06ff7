//! roost core library — install layout, deploy files, configuration, errors.
//!
//! Public API surface:
//! - [`platform`] — [`Platform`] and per-platform paths
//! - [`config`] — [`InstallConfig`], the resolved process-wide install description
//! - [`deploy_file`] — [`DeployFile`] with idempotent `deploy` / `remove`
//! - [`settings`] — required-setting precondition
//! - [`manifest`] — optional `roost.yaml`

pub mod config;
pub mod deploy_file;
pub mod error;
pub mod launcher;
pub mod manifest;
pub mod platform;
pub mod settings;

pub use config::InstallConfig;
pub use deploy_file::{DeployFile, DeployKind, RemoveOutcome};
pub use error::{ConfigurationError, CoreError};
pub use launcher::LauncherStyle;
pub use manifest::ProjectManifest;
pub use platform::Platform;
pub use settings::{check_required_setting, SettingSource};
