//! Optional per-project `roost.yaml`.
//!
//! ```yaml
//! name: remote-control          # defaults to the Cargo package name
//! required_setting: REMOTE_CONTROL_KEY
//! features: [no_term]
//! env_file: .env
//! config_file: config.toml
//! ```
//!
//! Every key is optional; an absent file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

pub const MANIFEST_FILE: &str = "roost.yaml";
pub const CARGO_MANIFEST_FILE: &str = "Cargo.toml";
pub const DEFAULT_REQUIRED_SETTING: &str = "REMOTE_CONTROL_KEY";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Deployment settings for the managed program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectManifest {
    /// Cargo package name; also the executable and install directory name.
    pub name: Option<String>,
    /// Setting that must be present in the environment or the env file.
    pub required_setting: String,
    /// Cargo features passed to the release build.
    pub features: Vec<String>,
    /// Env/secret file, relative to the project directory.
    pub env_file: PathBuf,
    /// Server configuration file, relative to the project directory.
    pub config_file: PathBuf,
}

impl Default for ProjectManifest {
    fn default() -> Self {
        Self {
            name: None,
            required_setting: DEFAULT_REQUIRED_SETTING.to_owned(),
            features: vec!["no_term".to_owned()],
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl ProjectManifest {
    /// Load `<project_dir>/roost.yaml`, falling back to defaults when absent.
    pub fn load_at(project_dir: &Path) -> Result<Self, CoreError> {
        let path = project_dir.join(MANIFEST_FILE);
        if !path.exists() {
            tracing::debug!("no manifest at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| CoreError::Manifest { path, source })
    }

    /// The `name` key, if set to something non-blank.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// The program name: the manifest's `name`, else the project directory's name.
    ///
    /// [`crate::InstallConfig::resolve_at`] fills `name` from `Cargo.toml`
    /// before this runs, so the directory name is only a last resort.
    pub fn program_name(&self, project_dir: &Path) -> String {
        if let Some(name) = self.declared_name() {
            return name.to_owned();
        }
        project_dir
            .file_name()
            .unwrap_or_else(|| project_dir.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

#[derive(Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    name: String,
}

/// `[package].name` from `<project_dir>/Cargo.toml`.
///
/// `None` when the file is absent or has no `[package]` table (a virtual
/// workspace manifest).
pub fn cargo_package_name(project_dir: &Path) -> Result<Option<String>, CoreError> {
    let path = project_dir.join(CARGO_MANIFEST_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let parsed: CargoToml =
        toml::from_str(&contents).map_err(|source| CoreError::CargoManifest { path, source })?;
    Ok(parsed.package.map(|p| p.name))
}
