// In-memory service manager used by the unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;

use super::model::{UnitFile, UnitFileChange, UnitStatus};
use super::systemd::{JOB_DONE, Job, ServiceManager};
use crate::config::JobMode;

pub struct FakeJob(zbus::Result<String>);

impl Job for FakeJob {
    fn wait(self) -> zbus::Result<String> {
        self.0
    }
}

#[derive(Default)]
pub struct FakeManager {
    files: RefCell<Vec<UnitFile>>,
    statuses: RefCell<Vec<UnitStatus>>,
    job_result: RefCell<Option<String>>,
    failing: RefCell<HashSet<String>>,
    status_text: RefCell<Option<String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeManager {
    pub fn with_units(files: &[(&str, &str)]) -> Self {
        let manager = Self::default();
        *manager.files.borrow_mut() = files
            .iter()
            .map(|(path, state)| UnitFile {
                path: path.to_string(),
                enabled_state: (*state).into(),
            })
            .collect();
        manager
    }

    pub fn add_status(&self, name: &str, active: &str, description: &str) {
        self.statuses.borrow_mut().push(UnitStatus {
            name: name.to_string(),
            active_state: active.into(),
            description: description.to_string(),
        });
    }

    pub fn set_active(&self, name: &str, active: &str) {
        for status in self.statuses.borrow_mut().iter_mut() {
            if status.name == name {
                status.active_state = active.into();
            }
        }
    }

    pub fn set_job_result(&self, result: &str) {
        *self.job_result.borrow_mut() = Some(result.to_string());
    }

    pub fn set_status_text(&self, text: &str) {
        *self.status_text.borrow_mut() = Some(text.to_string());
    }

    /// Makes the named operation fail (`wait` fails the job's completion instead).
    pub fn fail_on(&self, op: &str) {
        self.failing.borrow_mut().insert(op.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, op: &str, call: String) -> zbus::Result<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(op) {
            return Err(zbus::Error::Failure(format!("{} refused", op)));
        }
        Ok(())
    }

    fn job(&self) -> FakeJob {
        if self.failing.borrow().contains("wait") {
            return FakeJob(Err(zbus::Error::Failure("signal stream closed".to_string())));
        }
        FakeJob(Ok(self
            .job_result
            .borrow()
            .clone()
            .unwrap_or_else(|| JOB_DONE.to_string())))
    }
}

impl ServiceManager for FakeManager {
    type Job = FakeJob;

    fn list_unit_files(&self) -> zbus::Result<Vec<UnitFile>> {
        self.record("list-unit-files", "list-unit-files".to_string())?;
        Ok(self.files.borrow().clone())
    }

    fn list_units(&self) -> zbus::Result<Vec<UnitStatus>> {
        self.record("list-units", "list-units".to_string())?;
        Ok(self.statuses.borrow().clone())
    }

    fn reload_or_restart_unit(&self, name: &str, mode: JobMode) -> zbus::Result<FakeJob> {
        self.record(
            "reload-or-restart",
            format!("reload-or-restart {} {}", name, mode.as_str()),
        )?;
        Ok(self.job())
    }

    fn stop_unit(&self, name: &str, mode: JobMode) -> zbus::Result<FakeJob> {
        self.record("stop", format!("stop {} {}", name, mode.as_str()))?;
        Ok(self.job())
    }

    fn enable_unit_files(
        &self,
        names: &[&str],
        runtime: bool,
        force: bool,
    ) -> zbus::Result<Vec<UnitFileChange>> {
        self.record(
            "enable",
            format!("enable {} runtime={} force={}", names.join(" "), runtime, force),
        )?;
        Ok(names
            .iter()
            .map(|name| UnitFileChange {
                kind: "symlink".to_string(),
                file: format!("/etc/systemd/system/multi-user.target.wants/{}", name),
                destination: format!("/etc/systemd/system/{}", name),
            })
            .collect())
    }

    fn disable_unit_files(
        &self,
        names: &[&str],
        runtime: bool,
    ) -> zbus::Result<Vec<UnitFileChange>> {
        self.record(
            "disable",
            format!("disable {} runtime={}", names.join(" "), runtime),
        )?;
        Ok(Vec::new())
    }

    fn reload(&self) -> zbus::Result<()> {
        self.record("reload", "reload".to_string())
    }

    fn status_text(&self, name: &str) -> io::Result<String> {
        self.calls.borrow_mut().push(format!("status {}", name));
        if self.failing.borrow().contains("status") {
            return Err(io::Error::new(io::ErrorKind::NotFound, "systemctl missing"));
        }
        Ok(self.status_text.borrow().clone().unwrap_or_default())
    }
}
