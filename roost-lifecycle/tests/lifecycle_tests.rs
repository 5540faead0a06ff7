//! Orchestrator behaviour with in-memory process, scheduler, build and
//! launcher collaborators; files go to a throwaway home.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use assert_fs::prelude::*;
use roost_core::{InstallConfig, Platform};
use roost_lifecycle::{
    BuildStep, DeployOptions, Launcher, Lifecycle, LifecycleError,
};
use roost_platform::{
    KillOutcome, PlatformError, ProcessController, StartupScheduler, UnscheduleOutcome,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct World {
    running: Cell<bool>,
    schedule_entries: Cell<u32>,
    build_fails: Cell<bool>,
    kill_fails: Cell<bool>,
    launches: RefCell<Vec<PathBuf>>,
    events: RefCell<Vec<&'static str>>,
}

impl World {
    fn log(&self, event: &'static str) {
        self.events.borrow_mut().push(event);
    }
}

struct FakeBuild(Rc<World>);

impl BuildStep for FakeBuild {
    fn run(&self) -> Result<(), LifecycleError> {
        self.0.log("build");
        if self.0.build_fails.get() {
            return Err(LifecycleError::BuildFailure {
                command: "cargo build --release".to_string(),
                details: "exited with code 101".to_string(),
            });
        }
        Ok(())
    }
}

struct FakeProcess(Rc<World>);

impl ProcessController for FakeProcess {
    fn is_running(&self, _name: &str) -> Result<bool, PlatformError> {
        Ok(self.0.running.get())
    }

    fn kill(&self, name: &str) -> Result<KillOutcome, PlatformError> {
        self.0.log("kill");
        if self.0.kill_fails.get() {
            return Err(PlatformError::KillFailure {
                name: name.to_string(),
                details: "Access is denied.".to_string(),
            });
        }
        if self.0.running.replace(false) {
            Ok(KillOutcome::Killed)
        } else {
            Ok(KillOutcome::NotRunning)
        }
    }
}

struct FakeScheduler(Rc<World>);

impl StartupScheduler for FakeScheduler {
    fn is_scheduled(&self) -> Result<bool, PlatformError> {
        Ok(self.0.schedule_entries.get() > 0)
    }

    fn schedule(&self) -> Result<(), PlatformError> {
        self.0.log("schedule");
        self.0.schedule_entries.set(self.0.schedule_entries.get() + 1);
        Ok(())
    }

    fn unschedule(&self) -> Result<UnscheduleOutcome, PlatformError> {
        if self.0.schedule_entries.replace(0) == 0 {
            Ok(UnscheduleOutcome::WasNotScheduled)
        } else {
            Ok(UnscheduleOutcome::Unscheduled)
        }
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

struct FakeLauncher(Rc<World>);

impl Launcher for FakeLauncher {
    fn launch(&self, exe: &Path, _work_dir: &Path) -> Result<u32, LifecycleError> {
        self.0.log("launch");
        self.0.launches.borrow_mut().push(exe.to_path_buf());
        self.0.running.set(true);
        Ok(4242)
    }
}

struct Fixture {
    home: assert_fs::TempDir,
    project: assert_fs::TempDir,
    config: InstallConfig,
    world: Rc<World>,
}

impl Fixture {
    fn new() -> Self {
        let home = assert_fs::TempDir::new().expect("home");
        let project = assert_fs::TempDir::new().expect("project");
        project.child("roost.yaml").write_str("name: remote\n").expect("manifest");
        project
            .child("target/release/remote")
            .write_binary(b"fake binary")
            .expect("exe");
        project
            .child(".env")
            .write_str("REMOTE_CONTROL_KEY=k\n")
            .expect(".env");
        project
            .child("config.toml")
            .write_str("port = 7070\n")
            .expect("config");

        let config = InstallConfig::resolve_at(Platform::Linux, project.path(), home.path())
            .expect("resolve");
        Self {
            home,
            project,
            config,
            world: Rc::new(World::default()),
        }
    }

    fn lifecycle(&self) -> Lifecycle<'_> {
        Lifecycle::new(
            &self.config,
            Box::new(FakeBuild(self.world.clone())),
            Box::new(FakeProcess(self.world.clone())),
            Box::new(FakeScheduler(self.world.clone())),
            Box::new(FakeLauncher(self.world.clone())),
        )
    }
}

// ---------------------------------------------------------------------------
// 1. Deploy
// ---------------------------------------------------------------------------

#[test]
fn deploy_then_uninstall_round_trip() {
    let fx = Fixture::new();
    let lifecycle = fx.lifecycle();

    let report = lifecycle.deploy(DeployOptions::default()).expect("deploy");
    assert!(report.newly_scheduled);
    assert!(!report.killed_previous);
    assert_eq!(report.launched_pid, Some(4242));
    for dest in fx.config.destinations() {
        assert!(dest.is_file(), "missing {}", dest.display());
    }
    assert_eq!(fx.world.schedule_entries.get(), 1);

    let removed = lifecycle.uninstall();
    assert!(removed.was_installed());
    assert!(removed.killed);
    assert!(removed.unscheduled);
    assert!(removed.removed_root);
    for dest in fx.config.destinations() {
        assert!(!dest.exists(), "left behind {}", dest.display());
    }
    assert!(!fx.config.install_root.exists());
    assert_eq!(fx.world.schedule_entries.get(), 0);
}

#[test]
fn deploy_runs_steps_in_order() {
    let fx = Fixture::new();
    fx.lifecycle().deploy(DeployOptions::default()).expect("deploy");
    assert_eq!(
        *fx.world.events.borrow(),
        vec!["build", "kill", "schedule", "launch"]
    );
    assert_eq!(fx.world.launches.borrow()[0], fx.config.installed_exe());
}

#[test]
fn redeploy_kills_old_process_and_schedules_once() {
    let fx = Fixture::new();
    let lifecycle = fx.lifecycle();

    lifecycle.deploy(DeployOptions::default()).expect("first deploy");
    let second = lifecycle.deploy(DeployOptions::default()).expect("second deploy");

    assert!(second.killed_previous);
    assert!(!second.newly_scheduled);
    assert_eq!(fx.world.schedule_entries.get(), 1);
}

#[test]
fn redeploy_overwrites_installed_files() {
    let fx = Fixture::new();
    let lifecycle = fx.lifecycle();
    lifecycle.deploy(DeployOptions::default()).expect("first deploy");

    fx.project
        .child("config.toml")
        .write_str("port = 8080\n")
        .expect("update config");
    lifecycle.deploy(DeployOptions::default()).expect("second deploy");

    let installed = std::fs::read_to_string(fx.config.install_root.join("config.toml"))
        .expect("read installed config");
    assert_eq!(installed, "port = 8080\n");
}

#[test]
fn install_only_skips_launch() {
    let fx = Fixture::new();
    let report = fx
        .lifecycle()
        .deploy(DeployOptions { launch: false })
        .expect("deploy");
    assert_eq!(report.launched_pid, None);
    assert!(fx.world.launches.borrow().is_empty());
    assert!(fx.config.installed_exe().is_file());
}

#[test]
fn build_failure_copies_nothing() {
    let fx = Fixture::new();
    fx.world.build_fails.set(true);

    let err = fx.lifecycle().deploy(DeployOptions::default()).unwrap_err();
    assert!(matches!(err, LifecycleError::BuildFailure { .. }), "got: {err}");
    assert!(err.to_string().contains("101"));
    for dest in fx.config.destinations() {
        assert!(!dest.exists(), "copied {}", dest.display());
    }
    assert_eq!(*fx.world.events.borrow(), vec!["build"]);
}

#[test]
fn kill_failure_aborts_before_any_copy() {
    let fx = Fixture::new();
    fx.world.kill_fails.set(true);

    let err = fx.lifecycle().deploy(DeployOptions::default()).unwrap_err();
    assert!(
        matches!(err, LifecycleError::Platform(PlatformError::KillFailure { .. })),
        "got: {err}"
    );
    assert!(!fx.config.installed_exe().exists());
}

#[test]
fn missing_source_aborts_remaining_files() {
    let fx = Fixture::new();
    std::fs::remove_file(fx.project.path().join("config.toml")).expect("remove config");

    let err = fx.lifecycle().deploy(DeployOptions::default()).unwrap_err();
    match err {
        LifecycleError::PartialDeploy {
            deployed, total, ..
        } => {
            assert_eq!(deployed, 2);
            assert_eq!(total, 4);
        }
        other => panic!("expected PartialDeploy, got: {other}"),
    }
    assert!(fx.config.installed_exe().is_file());
    assert!(!fx.config.install_root.join("launch.sh").exists());
    assert_eq!(fx.world.schedule_entries.get(), 0);
    assert!(fx.world.launches.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// 2. Uninstall
// ---------------------------------------------------------------------------

#[test]
fn uninstall_when_never_installed_is_quiet() {
    let fx = Fixture::new();
    let report = fx.lifecycle().uninstall();

    assert!(!report.was_installed());
    assert!(!fx.config.install_root.exists());
    let home_entries = std::fs::read_dir(fx.home.path()).expect("read home").count();
    assert_eq!(home_entries, 0, "uninstall must not create anything");
}

#[test]
fn uninstall_keeps_going_when_kill_fails() {
    let fx = Fixture::new();
    let lifecycle = fx.lifecycle();
    lifecycle.deploy(DeployOptions::default()).expect("deploy");
    fx.world.kill_fails.set(true);

    let report = lifecycle.uninstall();
    assert!(!report.killed);
    assert_eq!(report.removed.len(), fx.config.install_set.len());
    assert!(report.unscheduled);
}

#[test]
fn uninstall_leaves_root_holding_stray_files() {
    let fx = Fixture::new();
    let lifecycle = fx.lifecycle();
    lifecycle.deploy(DeployOptions::default()).expect("deploy");
    std::fs::write(fx.config.install_root.join("notes.txt"), b"mine").expect("stray");

    let report = lifecycle.uninstall();
    assert!(report.was_installed());
    assert!(!report.removed_root);
    assert!(fx.config.install_root.join("notes.txt").is_file());
    assert!(!fx.config.installed_exe().exists());
}

// ---------------------------------------------------------------------------
// 3. Kill / Status
// ---------------------------------------------------------------------------

#[test]
fn kill_reports_not_running() {
    let fx = Fixture::new();
    assert_eq!(fx.lifecycle().kill().expect("kill"), KillOutcome::NotRunning);
}

#[test]
fn kill_stops_a_running_instance() {
    let fx = Fixture::new();
    fx.world.running.set(true);
    let lifecycle = fx.lifecycle();
    assert_eq!(lifecycle.kill().expect("kill"), KillOutcome::Killed);
    assert_eq!(lifecycle.kill().expect("kill"), KillOutcome::NotRunning);
}

#[test]
fn status_tracks_deploy_and_uninstall() {
    let fx = Fixture::new();
    let lifecycle = fx.lifecycle();

    let before = lifecycle.status().expect("status");
    assert!(!before.is_installed());
    assert!(!before.scheduled);
    assert!(before.installed_at.is_none());

    lifecycle.deploy(DeployOptions::default()).expect("deploy");
    let after = lifecycle.status().expect("status");
    assert!(after.is_installed());
    assert!(after.scheduled);
    assert!(after.running);
    assert!(after.installed_at.is_some());
    assert_eq!(after.platform, Platform::Linux);
}
