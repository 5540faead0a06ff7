//! roost — deploy a cargo-built background program, run it at startup, remove it.
//!
//! # Usage
//!
//! ```text
//! roost [--project-dir DIR]                 build, install, schedule and start
//! roost [--project-dir DIR] --install-only  same, without starting
//! roost [--project-dir DIR] -k|--kill       stop the running program
//! roost [--project-dir DIR] --uninstall     stop, remove files and startup entry
//! roost [--project-dir DIR] -l|--location   print the install directory
//! roost [--project-dir DIR] --status        print install state as JSON
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use colored::Colorize;

use roost_core::{check_required_setting, InstallConfig};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "roost",
    version,
    about = "Build a background program, install it, and run it at startup",
    long_about = None,
)]
#[command(group(
    ArgGroup::new("action")
        .multiple(false)
        .args(["kill", "location", "uninstall", "status", "install_only"]),
))]
struct Cli {
    /// Kill the running program (if there is one) then exit.
    #[arg(short, long)]
    kill: bool,

    /// Print the install directory then exit.
    #[arg(short, long)]
    location: bool,

    /// Stop the program and remove its files and startup entry.
    #[arg(long)]
    uninstall: bool,

    /// Print install, schedule and process state as JSON.
    #[arg(long)]
    status: bool,

    /// Install the files without starting the program.
    #[arg(long)]
    install_only: bool,

    /// Directory holding the program's Cargo.toml, .env and config.toml.
    #[arg(long, value_name = "DIR", default_value = ".")]
    project_dir: PathBuf,
}

/// The single operation an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Deploy { launch: bool },
    Kill,
    Location,
    Uninstall,
    Status,
}

impl Action {
    /// Read-only actions skip the required-setting check.
    fn requires_setting(self) -> bool {
        !matches!(self, Action::Location | Action::Status)
    }
}

impl Cli {
    fn action(&self) -> Action {
        if self.kill {
            Action::Kill
        } else if self.location {
            Action::Location
        } else if self.uninstall {
            Action::Uninstall
        } else if self.status {
            Action::Status
        } else {
            Action::Deploy {
                launch: !self.install_only,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "[error]".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let action = cli.action();
    let project_dir = cli
        .project_dir
        .canonicalize()
        .with_context(|| format!("cannot resolve project dir '{}'", cli.project_dir.display()))?;
    let config = InstallConfig::resolve(&project_dir)
        .context("failed to resolve install configuration")?;
    tracing::debug!(?action, root = %config.install_root.display(), "resolved");

    if action.requires_setting() {
        let source =
            check_required_setting(&config.manifest.required_setting, &config.env_file_path())?;
        tracing::debug!(?source, "required setting present");
    }

    match action {
        Action::Deploy { launch } => commands::deploy::run(&config, launch),
        Action::Kill => commands::kill::run(&config),
        Action::Location => {
            println!("{}", config.install_root.display());
            Ok(())
        }
        Action::Uninstall => commands::uninstall::run(&config),
        Action::Status => commands::status::run(&config),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
