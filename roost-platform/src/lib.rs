//! Platform-divergent plumbing: process control and run-at-startup scheduling.
//!
//! Both capabilities are traits whose backend is picked once from
//! [`roost_core::Platform`] via [`process_controller_for`] and [`scheduler_for`].

pub mod command;
mod error;
pub mod process;
pub mod startup;

pub use error::PlatformError;
pub use process::{process_controller_for, KillOutcome, ProcessController};
pub use startup::{scheduler_for, StartupScheduler, UnscheduleOutcome};
