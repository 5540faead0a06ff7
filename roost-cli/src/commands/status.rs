//! `roost --status` — install, schedule and process state as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use roost_core::InstallConfig;
use roost_lifecycle::{InstallStatus, Lifecycle};

#[derive(Serialize)]
struct StatusJson {
    name: String,
    platform: String,
    install_root: String,
    installed: bool,
    installed_at: Option<String>,
    scheduled: bool,
    startup_entry: String,
    running: bool,
    files: Vec<FileJson>,
}

#[derive(Serialize)]
struct FileJson {
    path: String,
    present: bool,
}

pub fn run(config: &InstallConfig) -> Result<()> {
    let lifecycle = Lifecycle::native(config).context("failed to set up platform backends")?;
    let status = lifecycle
        .status()
        .context("failed to query install status")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&to_json(config, status))
            .context("failed to render status JSON")?
    );
    Ok(())
}

fn to_json(config: &InstallConfig, status: InstallStatus) -> StatusJson {
    StatusJson {
        name: config.name.clone(),
        platform: status.platform.to_string(),
        install_root: status.install_root.display().to_string(),
        installed: status.is_installed(),
        installed_at: status
            .installed_at
            .map(|t| DateTime::<Local>::from(t).to_rfc3339()),
        scheduled: status.scheduled,
        startup_entry: status.startup_entry,
        running: status.running,
        files: status
            .files
            .into_iter()
            .map(|f| FileJson {
                path: f.path.display().to_string(),
                present: f.present,
            })
            .collect(),
    }
}
