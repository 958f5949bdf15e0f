// Defines the core data structures for the application.

use std::fmt;

/// Suffix of the unit files this dashboard cares about.
pub const SERVICE_SUFFIX: &str = ".service";

/// Enablement of a unit file, as reported by `ListUnitFiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnabledState {
    #[default]
    Unknown,
    Enabled,
    Disabled,
    Static,
    Masked,
    Other(String),
}

impl EnabledState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Static => "static",
            Self::Masked => "masked",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for EnabledState {
    fn from(raw: &str) -> Self {
        match raw {
            "" => Self::Unknown,
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "static" => Self::Static,
            "masked" => Self::Masked,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EnabledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime state of a loaded unit, as reported by `ListUnits`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveState {
    /// No live status was found for the unit.
    #[default]
    Unknown,
    Active,
    Inactive,
    Failed,
    Activating,
    Deactivating,
    Reloading,
    Other(String),
}

impl ActiveState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Failed => "failed",
            Self::Activating => "activating",
            Self::Deactivating => "deactivating",
            Self::Reloading => "reloading",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for ActiveState {
    fn from(raw: &str) -> Self {
        match raw {
            "" => Self::Unknown,
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "failed" => Self::Failed,
            "activating" => Self::Activating,
            "deactivating" => Self::Deactivating,
            "reloading" => Self::Reloading,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the unit-file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFile {
    pub path: String,
    pub enabled_state: EnabledState,
}

/// One entry of the loaded-unit listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    pub name: String,
    pub active_state: ActiveState,
    pub description: String,
}

/// A single change reported back by enable/disable: (type, file, destination).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFileChange {
    pub kind: String,
    pub file: String,
    pub destination: String,
}

/// A service unit file merged with its live status, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub name: String,
    pub source_path: String,
    pub enabled_state: EnabledState,
    pub active_state: ActiveState,
    pub description: String,
}

/// Strips the directory prefix from a unit file path.
pub fn unit_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
