// File logging. The terminal belongs to the UI, so nothing is written to stderr.

use std::fs;

use anyhow::{Context, Result};

use crate::config::Config;

pub fn init(config: &Config) -> Result<()> {
    if let Some(dir) = config.log_file.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = fern::log_file(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.log_level)
        .chain(file)
        .apply()
        .context("Failed to install logger")?;
    Ok(())
}
