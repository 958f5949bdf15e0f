use std::io;

use anyhow::{Context, Result};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use sdtui::app::systemd::SystemdManager;
use sdtui::{App, Config, logging};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    log::info!("starting sdtui ({} scope)", config.scope);

    // Listing failures surface here, before the terminal is taken over.
    let manager = SystemdManager::connect(config.scope)?;
    let mut app = App::new(manager, config.job_mode).context("Failed to load service units")?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let result = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(mut terminal) => app.run(&mut terminal).map_err(anyhow::Error::from),
        Err(err) => Err(err).context("create terminal"),
    };

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show)
        .context("leave alternate screen")?;

    if let Err(err) = &result {
        log::error!("fatal: {:#}", err);
    }
    result
}
