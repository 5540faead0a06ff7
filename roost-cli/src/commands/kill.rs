//! `roost --kill`

use anyhow::{Context, Result};

use roost_core::InstallConfig;
use roost_lifecycle::Lifecycle;
use roost_platform::KillOutcome;

pub fn run(config: &InstallConfig) -> Result<()> {
    let lifecycle = Lifecycle::native(config).context("failed to set up platform backends")?;
    match lifecycle
        .kill()
        .with_context(|| format!("failed to kill {}", config.exe_name))?
    {
        KillOutcome::Killed => println!("killed {}", config.exe_name),
        KillOutcome::NotRunning => println!("{} is not running", config.exe_name),
    }
    Ok(())
}
