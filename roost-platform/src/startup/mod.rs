//! Run-at-startup scheduling behind one capability set.
//!
//! | platform       | backend                          | "scheduled" means                      |
//! |----------------|----------------------------------|----------------------------------------|
//! | Windows        | [`DropInScheduler`]              | `<Startup>/<name>.cmd` exists          |
//! | macOS, Linux   | [`CronScheduler`]                | `@reboot <launcher>` in `crontab -l`   |
//!
//! The backend is chosen once in [`scheduler_for`]; nothing downstream
//! branches on platform again.

mod cron;
mod drop_in;

pub use cron::{CronScheduler, CronTable, CrontabStore, RebootEntry, SystemCrontab};
pub use drop_in::DropInScheduler;

use roost_core::InstallConfig;

use crate::error::PlatformError;

/// Result of [`StartupScheduler::unschedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnscheduleOutcome {
    Unscheduled,
    WasNotScheduled,
}

/// Enable/disable automatic launch at machine startup.
///
/// `schedule` does not check for an existing entry; callers consult
/// `is_scheduled` first to avoid duplicates.
pub trait StartupScheduler {
    fn is_scheduled(&self) -> Result<bool, PlatformError>;

    fn schedule(&self) -> Result<(), PlatformError>;

    fn unschedule(&self) -> Result<UnscheduleOutcome, PlatformError>;

    /// Human-readable location of the startup entry (file path or cron line).
    fn describe(&self) -> String;
}

/// Select the scheduler backend for `config.platform`.
pub fn scheduler_for(config: &InstallConfig) -> Result<Box<dyn StartupScheduler>, PlatformError> {
    if config.platform.uses_cron() {
        return Ok(Box::new(CronScheduler::new(
            RebootEntry::for_target(&config.startup_target()),
            SystemCrontab,
        )));
    }

    let startup_dir = config.startup_dir.as_ref().ok_or_else(|| {
        PlatformError::Scheduler(format!("no startup folder known for {}", config.platform))
    })?;
    Ok(Box::new(DropInScheduler::new(
        startup_dir.join(format!("{}.cmd", config.name)),
        config.startup_target(),
    )))
}
