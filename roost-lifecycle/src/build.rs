//! The external build step run before any file is copied.

use std::path::PathBuf;
use std::process::Command;

use roost_core::InstallConfig;

use crate::error::LifecycleError;

/// Produces the release executable the install set copies from.
pub trait BuildStep {
    /// Run to completion; any failure is fatal to the deploy.
    fn run(&self) -> Result<(), LifecycleError>;
}

/// `cargo build --release --manifest-path <Cargo.toml> [--features ..]`.
#[derive(Debug, Clone)]
pub struct CargoBuild {
    pub manifest_path: PathBuf,
    pub features: Vec<String>,
}

impl CargoBuild {
    pub fn from_config(config: &InstallConfig) -> Self {
        Self {
            manifest_path: config.cargo_manifest(),
            features: config.manifest.features.clone(),
        }
    }

    /// Arguments passed to `cargo`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--release".to_string(),
            "--manifest-path".to_string(),
            self.manifest_path.display().to_string(),
        ];
        if !self.features.is_empty() {
            args.push("--features".to_string());
            args.push(self.features.join(","));
        }
        args
    }

    fn command_line(&self) -> String {
        format!("cargo {}", self.args().join(" "))
    }
}

impl BuildStep for CargoBuild {
    fn run(&self) -> Result<(), LifecycleError> {
        tracing::info!("building: {}", self.command_line());
        // Output is inherited so cargo's progress and diagnostics reach the user verbatim.
        let status = Command::new("cargo")
            .args(self.args())
            .status()
            .map_err(|e| LifecycleError::BuildFailure {
                command: self.command_line(),
                details: format!("could not be started: {e}"),
            })?;

        if status.success() {
            return Ok(());
        }
        Err(LifecycleError::BuildFailure {
            command: self.command_line(),
            details: match status.code() {
                Some(code) => format!("exited with code {code}"),
                None => "was terminated by a signal".to_string(),
            },
        })
    }
}
