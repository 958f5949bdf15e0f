// Lifecycle commands issued against the selected unit.

use std::fmt;

use log::{info, warn};

use super::catalog::load_catalog;
use super::model::{UnitFileChange, UnitRecord};
use super::systemd::{JOB_DONE, Job, ServiceManager};
use crate::config::JobMode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    ReloadOrRestart,
    Stop,
    Enable,
    Disable,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReloadOrRestart => "reload-or-restart",
            Self::Stop => "stop",
            Self::Enable => "enable",
            Self::Disable => "disable",
        })
    }
}

/// Runs `action` on `unit` to completion and returns the rebuilt catalog.
///
/// Every failure is returned as-is; the catalog is only reloaded once the
/// action has fully succeeded.
pub fn dispatch<M: ServiceManager>(
    manager: &M,
    action: ServiceAction,
    unit: &str,
    mode: JobMode,
) -> Result<Vec<UnitRecord>> {
    info!("{} {}", action, unit);
    let outcome = match action {
        ServiceAction::ReloadOrRestart => {
            run_job(unit, manager.reload_or_restart_unit(unit, mode))
        }
        ServiceAction::Stop => run_job(unit, manager.stop_unit(unit, mode)),
        ServiceAction::Enable => manager
            .enable_unit_files(&[unit], false, true)
            .map_err(|source| rejected(unit, source))
            .and_then(|changes| {
                log_changes(unit, &changes);
                reload_config(manager)
            }),
        ServiceAction::Disable => manager
            .disable_unit_files(&[unit], false)
            .map_err(|source| rejected(unit, source))
            .and_then(|changes| {
                log_changes(unit, &changes);
                reload_config(manager)
            }),
    };

    if let Err(err) = &outcome {
        warn!("{} {} failed: {}", action, unit, err);
    }
    outcome?;
    load_catalog(manager)
}

fn run_job<J: Job>(unit: &str, queued: zbus::Result<J>) -> Result<()> {
    let job = queued.map_err(|source| rejected(unit, source))?;
    let result = job.wait().map_err(|source| rejected(unit, source))?;
    if result != JOB_DONE {
        return Err(Error::JobFailed {
            unit: unit.to_string(),
            result,
        });
    }
    Ok(())
}

fn log_changes(unit: &str, changes: &[UnitFileChange]) {
    if changes.is_empty() {
        info!("{}: unit files already in requested state", unit);
    }
    for change in changes {
        info!("{}: {} {} -> {}", unit, change.kind, change.file, change.destination);
    }
}

fn reload_config<M: ServiceManager>(manager: &M) -> Result<()> {
    manager.reload().map_err(Error::ConfigReloadFailed)
}

fn rejected(unit: &str, source: zbus::Error) -> Error {
    Error::JobRejected {
        unit: unit.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::FakeManager;

    #[test]
    fn restart_waits_for_job_then_reloads_catalog() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);

        let catalog = dispatch(
            &manager,
            ServiceAction::ReloadOrRestart,
            "a.service",
            JobMode::Replace,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            manager.calls(),
            vec![
                "reload-or-restart a.service replace",
                "list-unit-files",
                "list-units",
            ]
        );
    }

    #[test]
    fn canceled_stop_is_fatal_without_refresh() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);
        manager.set_job_result("canceled");

        let err = dispatch(&manager, ServiceAction::Stop, "a.service", JobMode::Replace)
            .unwrap_err();

        match err {
            Error::JobFailed { unit, result } => {
                assert_eq!(unit, "a.service");
                assert_eq!(result, "canceled");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(manager.calls(), vec!["stop a.service replace"]);
    }

    #[test]
    fn enable_reloads_manager_config() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "disabled")]);

        dispatch(&manager, ServiceAction::Enable, "a.service", JobMode::Replace).unwrap();

        assert_eq!(
            manager.calls(),
            vec![
                "enable a.service runtime=false force=true",
                "reload",
                "list-unit-files",
                "list-units",
            ]
        );
    }

    #[test]
    fn disable_reload_failure_is_reported() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);
        manager.fail_on("reload");

        let err = dispatch(&manager, ServiceAction::Disable, "a.service", JobMode::Replace)
            .unwrap_err();

        assert!(matches!(err, Error::ConfigReloadFailed(_)));
        assert_eq!(manager.calls(), vec!["disable a.service runtime=false", "reload"]);
    }

    #[test]
    fn rejected_stop_is_fatal_without_refresh() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);
        manager.fail_on("stop");

        let err = dispatch(&manager, ServiceAction::Stop, "a.service", JobMode::Replace)
            .unwrap_err();

        match err {
            Error::JobRejected { unit, .. } => assert_eq!(unit, "a.service"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(manager.calls(), vec!["stop a.service replace"]);
    }

    #[test]
    fn lost_job_completion_is_fatal_without_refresh() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);
        manager.fail_on("wait");

        let err = dispatch(
            &manager,
            ServiceAction::ReloadOrRestart,
            "a.service",
            JobMode::Replace,
        )
        .unwrap_err();

        assert!(matches!(err, Error::JobRejected { .. }));
        assert_eq!(manager.calls(), vec!["reload-or-restart a.service replace"]);
    }

    #[test]
    fn enable_reload_failure_is_reported() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "disabled")]);
        manager.fail_on("reload");

        let err = dispatch(&manager, ServiceAction::Enable, "a.service", JobMode::Replace)
            .unwrap_err();

        assert!(matches!(err, Error::ConfigReloadFailed(_)));
        assert_eq!(
            manager.calls(),
            vec!["enable a.service runtime=false force=true", "reload"]
        );
    }

    #[test]
    fn rejected_call_skips_config_reload() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);
        manager.fail_on("disable");

        let err = dispatch(&manager, ServiceAction::Disable, "a.service", JobMode::Replace)
            .unwrap_err();

        assert!(matches!(err, Error::JobRejected { .. }));
        assert_eq!(manager.calls(), vec!["disable a.service runtime=false"]);
    }

    #[test]
    fn refresh_failure_surfaces_as_source_unavailable() {
        let manager = FakeManager::with_units(&[("/etc/systemd/system/a.service", "enabled")]);
        manager.fail_on("list-units");

        let err = dispatch(
            &manager,
            ServiceAction::ReloadOrRestart,
            "a.service",
            JobMode::Fail,
        )
        .unwrap_err();

        assert!(matches!(err, Error::SourceUnavailable(_)));
    }
}
