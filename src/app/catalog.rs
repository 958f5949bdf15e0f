// Joins the unit-file listing with the live unit listing.

use std::collections::HashMap;

use log::debug;

use super::model::{SERVICE_SUFFIX, UnitFile, UnitRecord, UnitStatus, unit_name};
use super::systemd::ServiceManager;
use crate::error::{Error, Result};

/// Builds the sorted service catalog.
///
/// Every `.service` entry in `files` yields exactly one record. Status fields
/// are attached from the first entry in `statuses` with the same name and
/// stay empty when there is none.
pub fn build_catalog(files: &[UnitFile], statuses: &[UnitStatus]) -> Vec<UnitRecord> {
    let mut by_name: HashMap<&str, &UnitStatus> = HashMap::with_capacity(statuses.len());
    for status in statuses {
        by_name.entry(status.name.as_str()).or_insert(status);
    }

    let mut records: Vec<UnitRecord> = files
        .iter()
        .filter(|file| file.path.ends_with(SERVICE_SUFFIX))
        .map(|file| {
            let name = unit_name(&file.path);
            let status = by_name.get(name);
            UnitRecord {
                name: name.to_string(),
                source_path: file.path.clone(),
                enabled_state: file.enabled_state.clone(),
                active_state: status.map(|s| s.active_state.clone()).unwrap_or_default(),
                description: status.map(|s| s.description.clone()).unwrap_or_default(),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.source_path.cmp(&b.source_path))
    });
    records
}

/// Fetches both listings from the manager and builds a fresh catalog.
pub fn load_catalog<M: ServiceManager>(manager: &M) -> Result<Vec<UnitRecord>> {
    let files = manager.list_unit_files().map_err(Error::SourceUnavailable)?;
    let statuses = manager.list_units().map_err(Error::SourceUnavailable)?;
    let catalog = build_catalog(&files, &statuses);
    debug!(
        "catalog rebuilt: {} unit files, {} loaded units, {} services",
        files.len(),
        statuses.len(),
        catalog.len()
    );
    Ok(catalog)
}
