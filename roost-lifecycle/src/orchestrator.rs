//! Deploy, Uninstall, Kill and Status over one [`InstallConfig`].
//!
//! ```text
//! Absent ──deploy──▶ Installed(Scheduled) ──uninstall──▶ Absent
//!                      ▲          │
//!                      └─deploy───┘   (redeploy replaces files in place)
//! ```
//!
//! Deploy order is fixed: install root → build → kill → files → schedule →
//! launch. Uninstall is best effort and never fails.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;

use roost_core::{InstallConfig, Platform, RemoveOutcome};
use roost_platform::{
    process_controller_for, scheduler_for, KillOutcome, ProcessController, StartupScheduler,
    UnscheduleOutcome,
};

use crate::build::{BuildStep, CargoBuild};
use crate::error::{io_err, LifecycleError};
use crate::launch::{DetachedLauncher, Launcher};

/// Knobs for [`Lifecycle::deploy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Start the program once the files are in place.
    pub launch: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self { launch: true }
    }
}

/// What a successful deploy changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub exe: PathBuf,
    pub killed_previous: bool,
    pub newly_scheduled: bool,
    /// Pid of the launched process; `None` when launching was skipped.
    pub launched_pid: Option<u32>,
}

impl DeployReport {
    /// One-line summary, e.g. `remote started & old process was killed`.
    pub fn summary(&self, exe_name: &str) -> String {
        let mut msg = if self.launched_pid.is_some() {
            format!("{exe_name} started")
        } else {
            format!("{exe_name} installed")
        };
        if self.killed_previous {
            msg.push_str(" & old process was killed");
        }
        if self.newly_scheduled {
            msg.push_str(" & scheduled to run at startup");
        }
        msg
    }
}

/// What a best-effort uninstall found and removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    pub killed: bool,
    pub removed: Vec<PathBuf>,
    pub removed_root: bool,
    pub unscheduled: bool,
}

impl UninstallReport {
    /// Whether there was anything to uninstall at all.
    pub fn was_installed(&self) -> bool {
        self.killed || !self.removed.is_empty() || self.removed_root || self.unscheduled
    }
}

/// Presence of one install-set destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: PathBuf,
    pub present: bool,
}

/// Read-only snapshot of the install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStatus {
    pub platform: Platform,
    pub install_root: PathBuf,
    pub files: Vec<FileStatus>,
    pub scheduled: bool,
    pub startup_entry: String,
    pub running: bool,
    /// Modification time of the installed executable.
    pub installed_at: Option<SystemTime>,
}

impl InstallStatus {
    pub fn is_installed(&self) -> bool {
        self.files.iter().all(|f| f.present)
    }
}

/// The lifecycle orchestrator.
pub struct Lifecycle<'a> {
    config: &'a InstallConfig,
    build: Box<dyn BuildStep>,
    process: Box<dyn ProcessController>,
    scheduler: Box<dyn StartupScheduler>,
    launcher: Box<dyn Launcher>,
}

impl<'a> Lifecycle<'a> {
    /// Wire the real backends for `config.platform`.
    pub fn native(config: &'a InstallConfig) -> Result<Self, LifecycleError> {
        Ok(Self::new(
            config,
            Box::new(CargoBuild::from_config(config)),
            process_controller_for(config.platform),
            scheduler_for(config)?,
            Box::new(DetachedLauncher),
        ))
    }

    pub fn new(
        config: &'a InstallConfig,
        build: Box<dyn BuildStep>,
        process: Box<dyn ProcessController>,
        scheduler: Box<dyn StartupScheduler>,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        Self {
            config,
            build,
            process,
            scheduler,
            launcher,
        }
    }

    // -----------------------------------------------------------------------
    // Deploy
    // -----------------------------------------------------------------------

    /// Build, replace the installed files, schedule, and (re)start the program.
    pub fn deploy(&self, options: DeployOptions) -> Result<DeployReport, LifecycleError> {
        let cfg = self.config;

        std::fs::create_dir_all(&cfg.install_root).map_err(|e| io_err(&cfg.install_root, e))?;

        self.build.run()?;

        let killed_previous = match self.process.kill(&cfg.exe_name)? {
            KillOutcome::Killed => true,
            KillOutcome::NotRunning => false,
        };

        let total = cfg.install_set.len();
        for (deployed, file) in cfg.install_set.iter().enumerate() {
            file.deploy(&cfg.project_dir, &cfg.install_root)
                .map_err(|source| LifecycleError::PartialDeploy {
                    deployed,
                    total,
                    source,
                })?;
        }
        tracing::info!("deployed {total} files to {}", cfg.install_root.display());

        let newly_scheduled = if self.scheduler.is_scheduled()? {
            false
        } else {
            self.scheduler.schedule()?;
            true
        };

        let exe = cfg.installed_exe();
        let launched_pid = if options.launch {
            Some(self.launcher.launch(&exe, &cfg.install_root)?)
        } else {
            None
        };

        Ok(DeployReport {
            exe,
            killed_previous,
            newly_scheduled,
            launched_pid,
        })
    }

    // -----------------------------------------------------------------------
    // Uninstall
    // -----------------------------------------------------------------------

    /// Stop the program and remove everything deploy created. Never fails;
    /// per-step problems are logged and skipped.
    pub fn uninstall(&self) -> UninstallReport {
        let cfg = self.config;
        let mut report = UninstallReport::default();

        match self.process.kill(&cfg.exe_name) {
            Ok(KillOutcome::Killed) => report.killed = true,
            Ok(KillOutcome::NotRunning) => {}
            Err(err) => tracing::warn!("could not stop {}: {err}", cfg.exe_name),
        }

        for file in &cfg.install_set {
            match file.remove(&cfg.install_root) {
                Ok(RemoveOutcome::Removed) => {
                    report.removed.push(file.destination_path(&cfg.install_root))
                }
                Ok(RemoveOutcome::AlreadyAbsent) => {}
                Err(err) => tracing::warn!("skipping: {err}"),
            }
        }

        // Stray files the user put in the install root keep it alive.
        match std::fs::remove_dir(&cfg.install_root) {
            Ok(()) => report.removed_root = true,
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::debug!(
                "leaving {} in place: {err}",
                cfg.install_root.display()
            ),
        }

        match self.scheduler.unschedule() {
            Ok(UnscheduleOutcome::Unscheduled) => report.unscheduled = true,
            Ok(UnscheduleOutcome::WasNotScheduled) => {}
            Err(err) => tracing::warn!("could not remove startup entry: {err}"),
        }

        report
    }

    // -----------------------------------------------------------------------
    // Kill / Status
    // -----------------------------------------------------------------------

    /// Terminate the running program, if any.
    pub fn kill(&self) -> Result<KillOutcome, LifecycleError> {
        Ok(self.process.kill(&self.config.exe_name)?)
    }

    /// Snapshot of files, schedule and process state. Mutates nothing.
    pub fn status(&self) -> Result<InstallStatus, LifecycleError> {
        let cfg = self.config;
        let files = cfg
            .install_set
            .iter()
            .map(|f| FileStatus {
                path: f.destination_path(&cfg.install_root),
                present: f.is_deployed(&cfg.install_root),
            })
            .collect();
        let installed_at = std::fs::metadata(cfg.installed_exe())
            .and_then(|m| m.modified())
            .ok();

        Ok(InstallStatus {
            platform: cfg.platform,
            install_root: cfg.install_root.clone(),
            files,
            scheduled: self.scheduler.is_scheduled()?,
            startup_entry: self.scheduler.describe(),
            running: self.process.is_running(&cfg.exe_name)?,
            installed_at,
        })
    }
}
