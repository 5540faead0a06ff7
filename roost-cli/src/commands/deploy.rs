//! `roost` / `roost --install-only` — build, install, schedule, start.

use anyhow::{Context, Result};
use colored::Colorize;

use roost_core::InstallConfig;
use roost_lifecycle::{DeployOptions, Lifecycle};

pub fn run(config: &InstallConfig, launch: bool) -> Result<()> {
    let lifecycle = Lifecycle::native(config).context("failed to set up platform backends")?;
    let report = lifecycle
        .deploy(DeployOptions { launch })
        .with_context(|| format!("failed to deploy {}", config.name))?;

    println!("{} {}", "✓".green(), report.summary(&config.exe_name));
    println!("  Installed to: {}", config.install_root.display());
    if let Some(pid) = report.launched_pid {
        println!("  pid: {pid}");
    }
    Ok(())
}
