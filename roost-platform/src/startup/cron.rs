//! `@reboot` entries in the current user's cron table.
//!
//! Table edits are done on a [`CronTable`] value and written back whole;
//! [`CrontabStore`] is the only part that talks to `crontab(1)`.

use std::path::Path;

use roost_core::launcher::sh_quote;

use super::{StartupScheduler, UnscheduleOutcome};
use crate::command::{run_tool, run_tool_with_stdin};
use crate::error::PlatformError;

const REBOOT: &str = "@reboot";

/// The `@reboot <command>` line that launches the install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebootEntry {
    command: String,
}

impl RebootEntry {
    /// Entry running `target`, quoted when the path contains whitespace.
    pub fn for_target(target: &Path) -> Self {
        let raw = target.display().to_string();
        let command = if raw.chars().any(char::is_whitespace) {
            sh_quote(&raw)
        } else {
            raw
        };
        Self { command }
    }

    pub fn line(&self) -> String {
        format!("{REBOOT} {}", self.command)
    }

    /// Whether `line` is an `@reboot` entry running this command.
    pub fn matches(&self, line: &str) -> bool {
        let line = line.trim();
        if line.starts_with('#') {
            return false;
        }
        match line.split_once(char::is_whitespace) {
            Some((schedule, command)) => schedule == REBOOT && command.trim() == self.command,
            None => false,
        }
    }
}

/// In-memory cron table, one string per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CronTable {
    lines: Vec<String>,
}

impl CronTable {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    pub fn count(&self, entry: &RebootEntry) -> usize {
        self.lines.iter().filter(|l| entry.matches(l)).count()
    }

    pub fn contains(&self, entry: &RebootEntry) -> bool {
        self.count(entry) > 0
    }

    /// Append `entry`, dropping trailing blank lines first.
    pub fn push(&mut self, entry: &RebootEntry) {
        while self.lines.last().is_some_and(|l| l.trim().is_empty()) {
            self.lines.pop();
        }
        self.lines.push(entry.line());
    }

    /// Drop every line matching `entry`; returns how many were removed.
    pub fn remove(&mut self, entry: &RebootEntry) -> usize {
        let before = self.lines.len();
        self.lines.retain(|l| !entry.matches(l));
        before - self.lines.len()
    }

    /// Table text as `crontab -` expects it (newline terminated).
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Read/replace the user's whole cron table.
pub trait CrontabStore {
    fn read(&self) -> Result<String, PlatformError>;
    fn write(&self, table: &str) -> Result<(), PlatformError>;
}

/// The real table, via `crontab -l` and `crontab -`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCrontab;

impl CrontabStore for SystemCrontab {
    fn read(&self) -> Result<String, PlatformError> {
        let out = run_tool("crontab", &["-l"])?;
        if out.success() {
            return Ok(out.stdout);
        }
        // Users without a table get "no crontab for <user>" and exit 1.
        if out.stderr.to_ascii_lowercase().contains("no crontab") {
            return Ok(String::new());
        }
        Err(PlatformError::Scheduler(format!(
            "crontab -l failed ({})",
            out.details()
        )))
    }

    fn write(&self, table: &str) -> Result<(), PlatformError> {
        let out = run_tool_with_stdin("crontab", &["-"], table)?;
        if out.success() {
            return Ok(());
        }
        Err(PlatformError::Scheduler(format!(
            "crontab - failed ({})",
            out.details()
        )))
    }
}

/// Schedules by keeping one `@reboot` entry in the cron table.
#[derive(Debug, Clone)]
pub struct CronScheduler<S = SystemCrontab> {
    entry: RebootEntry,
    store: S,
}

impl<S: CrontabStore> CronScheduler<S> {
    pub fn new(entry: RebootEntry, store: S) -> Self {
        Self { entry, store }
    }

    fn table(&self) -> Result<CronTable, PlatformError> {
        Ok(CronTable::parse(&self.store.read()?))
    }
}

impl<S: CrontabStore> StartupScheduler for CronScheduler<S> {
    fn is_scheduled(&self) -> Result<bool, PlatformError> {
        Ok(self.table()?.contains(&self.entry))
    }

    fn schedule(&self) -> Result<(), PlatformError> {
        let mut table = self.table()?;
        table.push(&self.entry);
        self.store.write(&table.render())?;
        tracing::info!("added cron entry: {}", self.entry.line());
        Ok(())
    }

    fn unschedule(&self) -> Result<UnscheduleOutcome, PlatformError> {
        let mut table = self.table()?;
        if table.remove(&self.entry) == 0 {
            return Ok(UnscheduleOutcome::WasNotScheduled);
        }
        self.store.write(&table.render())?;
        tracing::info!("removed cron entry: {}", self.entry.line());
        Ok(UnscheduleOutcome::Unscheduled)
    }

    fn describe(&self) -> String {
        format!("crontab: {}", self.entry.line())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct MemoryCrontab {
        table: RefCell<String>,
        writes: RefCell<usize>,
    }

    impl CrontabStore for &MemoryCrontab {
        fn read(&self) -> Result<String, PlatformError> {
            Ok(self.table.borrow().clone())
        }

        fn write(&self, table: &str) -> Result<(), PlatformError> {
            *self.table.borrow_mut() = table.to_string();
            *self.writes.borrow_mut() += 1;
            Ok(())
        }
    }

    fn entry() -> RebootEntry {
        RebootEntry::for_target(Path::new("/home/t/.local/share/remote/launch.sh"))
    }

    #[test]
    fn entry_quotes_paths_with_spaces() {
        let e = RebootEntry::for_target(Path::new(
            "/Users/t/Library/Application Support/remote/launch.sh",
        ));
        assert_eq!(
            e.line(),
            "@reboot '/Users/t/Library/Application Support/remote/launch.sh'"
        );
        assert!(e.matches("  @reboot   '/Users/t/Library/Application Support/remote/launch.sh'  "));
    }

    #[test]
    fn commented_and_other_entries_do_not_match() {
        let e = entry();
        assert!(!e.matches("# @reboot /home/t/.local/share/remote/launch.sh"));
        assert!(!e.matches("@daily /home/t/.local/share/remote/launch.sh"));
        assert!(!e.matches("@reboot /home/t/.local/share/other/launch.sh"));
        assert!(!e.matches("@reboot"));
    }

    #[test]
    fn table_edits_preserve_unrelated_lines() {
        let mut table = CronTable::parse("MAILTO=\"\"\n0 * * * * backup\n\n");
        table.push(&entry());
        assert_eq!(
            table.render(),
            "MAILTO=\"\"\n0 * * * * backup\n@reboot /home/t/.local/share/remote/launch.sh\n"
        );
        assert_eq!(table.remove(&entry()), 1);
        assert_eq!(table.render(), "MAILTO=\"\"\n0 * * * * backup\n");
    }

    #[test]
    fn schedule_then_unschedule_round_trips() {
        let store = MemoryCrontab::default();
        *store.table.borrow_mut() = "0 * * * * backup\n".to_string();
        let s = CronScheduler::new(entry(), &store);

        assert!(!s.is_scheduled().expect("query"));
        s.schedule().expect("schedule");
        assert!(s.is_scheduled().expect("query"));
        assert_eq!(CronTable::parse(&store.table.borrow()).count(&entry()), 1);

        assert_eq!(s.unschedule().expect("unschedule"), UnscheduleOutcome::Unscheduled);
        assert_eq!(*store.table.borrow(), "0 * * * * backup\n");
    }

    #[test]
    fn unschedule_without_entry_leaves_table_untouched() {
        let store = MemoryCrontab::default();
        let s = CronScheduler::new(entry(), &store);
        assert_eq!(
            s.unschedule().expect("unschedule"),
            UnscheduleOutcome::WasNotScheduled
        );
        assert_eq!(*store.writes.borrow(), 0);
    }
}
