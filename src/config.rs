// Runtime configuration, read once at startup from `SDTUI_*` environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use log::LevelFilter;

pub const ENV_SCOPE: &str = "SDTUI_SCOPE";
pub const ENV_JOB_MODE: &str = "SDTUI_JOB_MODE";
pub const ENV_LOG: &str = "SDTUI_LOG";
pub const ENV_LOG_FILE: &str = "SDTUI_LOG_FILE";

/// Which service manager instance to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    System,
    User,
}

impl FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            other => bail!("unknown scope '{}' (expected 'system' or 'user')", other),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::User => f.write_str("user"),
        }
    }
}

/// How the manager should queue a start/stop job relative to pending ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobMode {
    #[default]
    Replace,
    Fail,
    Isolate,
    IgnoreDependencies,
    IgnoreRequirements,
}

impl JobMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Fail => "fail",
            Self::Isolate => "isolate",
            Self::IgnoreDependencies => "ignore-dependencies",
            Self::IgnoreRequirements => "ignore-requirements",
        }
    }
}

impl FromStr for JobMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "replace" => Ok(Self::Replace),
            "fail" => Ok(Self::Fail),
            "isolate" => Ok(Self::Isolate),
            "ignore-dependencies" => Ok(Self::IgnoreDependencies),
            "ignore-requirements" => Ok(Self::IgnoreRequirements),
            other => bail!("unknown job mode '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub scope: Scope,
    pub job_mode: JobMode,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let scope = match var(ENV_SCOPE) {
            Some(raw) => raw.trim().parse().with_context(|| format!("invalid {}", ENV_SCOPE))?,
            None => Scope::default(),
        };
        let job_mode = match var(ENV_JOB_MODE) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {}", ENV_JOB_MODE))?,
            None => JobMode::default(),
        };
        let log_level = match var(ENV_LOG) {
            Some(raw) => LevelFilter::from_str(raw.trim())
                .with_context(|| format!("invalid {} level '{}'", ENV_LOG, raw.trim()))?,
            None => LevelFilter::Info,
        };
        let log_file = var(ENV_LOG_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(default_log_file);

        Ok(Self {
            scope,
            job_mode,
            log_level,
            log_file,
        })
    }
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sdtui")
        .join("sdtui.log")
}
