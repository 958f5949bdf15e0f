// Handles all interactions with the service manager: D-Bus calls and `systemctl status`.

use std::io;
use std::process::{Command, Stdio};

use log::{debug, info};
use zbus::blocking::Connection;
use zbus::proxy;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use super::model::{UnitFile, UnitFileChange, UnitStatus};
use crate::config::{JobMode, Scope};
use crate::error::{Error, Result};

/// Completion value systemd reports for a job that finished successfully.
pub const JOB_DONE: &str = "done";

/// A queued job that resolves exactly once to its completion value.
pub trait Job {
    /// Blocks until the job is removed from the manager's queue.
    fn wait(self) -> zbus::Result<String>;
}

/// Everything the dashboard needs from the service manager.
pub trait ServiceManager {
    type Job: Job;

    fn list_unit_files(&self) -> zbus::Result<Vec<UnitFile>>;
    fn list_units(&self) -> zbus::Result<Vec<UnitStatus>>;
    fn reload_or_restart_unit(&self, name: &str, mode: JobMode) -> zbus::Result<Self::Job>;
    fn stop_unit(&self, name: &str, mode: JobMode) -> zbus::Result<Self::Job>;
    fn enable_unit_files(
        &self,
        names: &[&str],
        runtime: bool,
        force: bool,
    ) -> zbus::Result<Vec<UnitFileChange>>;
    fn disable_unit_files(&self, names: &[&str], runtime: bool)
    -> zbus::Result<Vec<UnitFileChange>>;
    fn reload(&self) -> zbus::Result<()>;

    /// Free-form status text for a unit. Best effort: only captured stdout is returned.
    fn status_text(&self, name: &str) -> io::Result<String>;
}

type RawUnit = (
    String,
    String,
    String,
    String,
    String,
    String,
    OwnedObjectPath,
    u32,
    String,
    OwnedObjectPath,
);

#[proxy(
    interface = "org.freedesktop.systemd1.Manager",
    default_service = "org.freedesktop.systemd1",
    default_path = "/org/freedesktop/systemd1",
    gen_async = false,
    blocking_name = "ManagerProxy"
)]
trait Manager {
    fn subscribe(&self) -> zbus::Result<()>;

    fn list_unit_files(&self) -> zbus::Result<Vec<(String, String)>>;

    fn list_units(&self) -> zbus::Result<Vec<RawUnit>>;

    fn reload_or_restart_unit(&self, name: &str, mode: &str) -> zbus::Result<OwnedObjectPath>;

    fn stop_unit(&self, name: &str, mode: &str) -> zbus::Result<OwnedObjectPath>;

    fn enable_unit_files(
        &self,
        files: &[&str],
        runtime: bool,
        force: bool,
    ) -> zbus::Result<(bool, Vec<(String, String, String)>)>;

    fn disable_unit_files(
        &self,
        files: &[&str],
        runtime: bool,
    ) -> zbus::Result<Vec<(String, String, String)>>;

    fn reload(&self) -> zbus::Result<()>;

    #[zbus(signal)]
    fn job_removed(
        &self,
        id: u32,
        job: ObjectPath<'_>,
        unit: &str,
        result: &str,
    ) -> zbus::Result<()>;
}

/// Service manager reached over the system or session bus.
pub struct SystemdManager {
    proxy: ManagerProxy<'static>,
    scope: Scope,
}

impl SystemdManager {
    pub fn connect(scope: Scope) -> Result<Self> {
        let connection = match scope {
            Scope::System => Connection::system(),
            Scope::User => Connection::session(),
        }
        .map_err(Error::Connect)?;
        let proxy = ManagerProxy::new(&connection).map_err(Error::Connect)?;
        // JobRemoved is only broadcast to subscribed clients.
        proxy.subscribe().map_err(Error::Connect)?;
        info!("connected to {} service manager", scope);
        Ok(Self { proxy, scope })
    }

    fn queue(
        &self,
        name: &str,
        call: impl FnOnce(&ManagerProxy<'static>) -> zbus::Result<OwnedObjectPath>,
    ) -> zbus::Result<DbusJob> {
        // Listen before queueing so the completion signal cannot slip past.
        let signals = self.proxy.receive_job_removed()?;
        let path = call(&self.proxy)?;
        debug!("queued job {} for {}", path.as_str(), name);
        Ok(DbusJob { path, signals })
    }
}

fn changes(raw: Vec<(String, String, String)>) -> Vec<UnitFileChange> {
    raw.into_iter()
        .map(|(kind, file, destination)| UnitFileChange {
            kind,
            file,
            destination,
        })
        .collect()
}

impl ServiceManager for SystemdManager {
    type Job = DbusJob;

    fn list_unit_files(&self) -> zbus::Result<Vec<UnitFile>> {
        Ok(self
            .proxy
            .list_unit_files()?
            .into_iter()
            .map(|(path, state)| UnitFile {
                enabled_state: state.as_str().into(),
                path,
            })
            .collect())
    }

    fn list_units(&self) -> zbus::Result<Vec<UnitStatus>> {
        Ok(self
            .proxy
            .list_units()?
            .into_iter()
            .map(|(name, description, _load, active, ..)| UnitStatus {
                name,
                active_state: active.as_str().into(),
                description,
            })
            .collect())
    }

    fn reload_or_restart_unit(&self, name: &str, mode: JobMode) -> zbus::Result<DbusJob> {
        self.queue(name, |proxy| {
            proxy.reload_or_restart_unit(name, mode.as_str())
        })
    }

    fn stop_unit(&self, name: &str, mode: JobMode) -> zbus::Result<DbusJob> {
        self.queue(name, |proxy| proxy.stop_unit(name, mode.as_str()))
    }

    fn enable_unit_files(
        &self,
        names: &[&str],
        runtime: bool,
        force: bool,
    ) -> zbus::Result<Vec<UnitFileChange>> {
        let (_carries_install_info, raw) = self.proxy.enable_unit_files(names, runtime, force)?;
        Ok(changes(raw))
    }

    fn disable_unit_files(
        &self,
        names: &[&str],
        runtime: bool,
    ) -> zbus::Result<Vec<UnitFileChange>> {
        Ok(changes(self.proxy.disable_unit_files(names, runtime)?))
    }

    fn reload(&self) -> zbus::Result<()> {
        self.proxy.reload()
    }

    fn status_text(&self, name: &str) -> io::Result<String> {
        systemctl_status(self.scope, name)
    }
}

/// A job queued over D-Bus, resolved by the matching `JobRemoved` signal.
pub struct DbusJob {
    path: OwnedObjectPath,
    signals: JobRemovedIterator,
}

impl Job for DbusJob {
    fn wait(self) -> zbus::Result<String> {
        for signal in self.signals {
            let args = signal.args()?;
            if args.job().as_str() == self.path.as_str() {
                return Ok(args.result().to_string());
            }
        }
        Err(zbus::Error::Failure(format!(
            "signal stream closed before job {} completed",
            self.path.as_str()
        )))
    }
}

/// Runs `systemctl status` for a unit and returns its stdout.
/// `systemctl status` exits non-zero for inactive units, so the exit status is ignored.
pub fn systemctl_status(scope: Scope, name: &str) -> io::Result<String> {
    let mut command = Command::new("systemctl");
    if scope == Scope::User {
        command.arg("--user");
    }
    let output = command
        .arg("status")
        .arg("--no-pager")
        .arg(name)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
