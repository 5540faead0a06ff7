//! Process-wide install configuration.
//!
//! [`InstallConfig`] is resolved once from the platform, the project
//! directory, the user's home and the project manifest, then passed by
//! reference to everything that touches the install.
//!
//! # API pattern
//!
//! - `resolve_at(platform, project_dir, home)` — explicit home; used in tests
//! - `resolve(project_dir)` — current platform + `dirs::home_dir()`

use std::path::{Path, PathBuf};

use crate::deploy_file::DeployFile;
use crate::error::CoreError;
use crate::launcher::LauncherStyle;
use crate::manifest::{cargo_package_name, ProjectManifest};
use crate::platform::Platform;

/// File name of the launcher helper kept in the install root on cron platforms.
pub const SHELL_LAUNCHER: &str = "launch.sh";

/// Everything the lifecycle needs to know about one install.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub platform: Platform,
    /// Cargo package name of the managed program.
    pub name: String,
    /// Executable file name (`<name>` or `<name>.exe`).
    pub exe_name: String,
    /// Directory holding `Cargo.toml`, the env file and `target/`.
    pub project_dir: PathBuf,
    pub install_root: PathBuf,
    /// Windows Startup folder; `None` on cron platforms.
    pub startup_dir: Option<PathBuf>,
    pub manifest: ProjectManifest,
    /// Ordered list of files that make up one install.
    pub install_set: Vec<DeployFile>,
}

impl InstallConfig {
    /// Resolve the configuration with an explicit platform and home directory.
    ///
    /// Program name precedence: `roost.yaml` `name`, then the Cargo package
    /// name, then the project directory name.
    pub fn resolve_at(
        platform: Platform,
        project_dir: &Path,
        home: &Path,
    ) -> Result<Self, CoreError> {
        let mut manifest = ProjectManifest::load_at(project_dir)?;
        if manifest.declared_name().is_none() {
            manifest.name = cargo_package_name(project_dir)?;
        }
        Ok(Self::from_manifest(platform, project_dir, home, manifest))
    }

    /// Resolve for the running platform and the current user's home.
    pub fn resolve(project_dir: &Path) -> Result<Self, CoreError> {
        let platform = Platform::current()?;
        let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
        Self::resolve_at(platform, project_dir, &home)
    }

    /// Build from an already-loaded manifest — pure, no I/O.
    pub fn from_manifest(
        platform: Platform,
        project_dir: &Path,
        home: &Path,
        manifest: ProjectManifest,
    ) -> Self {
        let name = manifest.program_name(project_dir);
        let exe_name = platform.exe_name(&name);
        let install_root = platform.install_root_at(home, &name);

        let mut install_set = vec![
            DeployFile::copy(
                Path::new("target").join("release").join(&exe_name),
                &exe_name,
            ),
            DeployFile::copy(&manifest.env_file, file_name_or_self(&manifest.env_file)),
            DeployFile::copy(
                &manifest.config_file,
                file_name_or_self(&manifest.config_file),
            ),
        ];
        if platform.uses_cron() {
            install_set.push(DeployFile::launcher(
                install_root.join(&exe_name),
                SHELL_LAUNCHER,
                LauncherStyle::Shell,
            ));
        }

        Self {
            platform,
            name,
            exe_name,
            project_dir: project_dir.to_path_buf(),
            startup_dir: platform.startup_dir_at(home),
            install_root,
            manifest,
            install_set,
        }
    }

    /// The installed executable.
    pub fn installed_exe(&self) -> PathBuf {
        self.install_root.join(&self.exe_name)
    }

    /// What the startup mechanism should run: the shell helper on cron
    /// platforms, the executable itself on Windows.
    pub fn startup_target(&self) -> PathBuf {
        if self.platform.uses_cron() {
            self.install_root.join(SHELL_LAUNCHER)
        } else {
            self.installed_exe()
        }
    }

    /// `<project_dir>/Cargo.toml`
    pub fn cargo_manifest(&self) -> PathBuf {
        self.project_dir.join(crate::manifest::CARGO_MANIFEST_FILE)
    }

    /// `<project_dir>/<env_file>`
    pub fn env_file_path(&self) -> PathBuf {
        self.project_dir.join(&self.manifest.env_file)
    }

    /// Resolved destination of every file in the install set, in order.
    pub fn destinations(&self) -> Vec<PathBuf> {
        self.install_set
            .iter()
            .map(|f| f.destination_path(&self.install_root))
            .collect()
    }
}

fn file_name_or_self(path: &Path) -> PathBuf {
    path.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| path.to_path_buf())
}
