//! `roost --uninstall` — always succeeds once the backends are wired.

use anyhow::{Context, Result};

use roost_core::InstallConfig;
use roost_lifecycle::Lifecycle;

pub fn run(config: &InstallConfig) -> Result<()> {
    let lifecycle = Lifecycle::native(config).context("failed to set up platform backends")?;
    let report = lifecycle.uninstall();

    if !report.was_installed() {
        println!("{} is not installed", config.name);
        return Ok(());
    }

    println!("uninstalled {}", config.name);
    for path in &report.removed {
        println!("  removed {}", path.display());
    }
    if report.unscheduled {
        println!("  removed startup entry");
    }
    if !report.removed_root && config.install_root.exists() {
        println!(
            "  left {} in place (it contains other files)",
            config.install_root.display()
        );
    }
    Ok(())
}
