// The central application controller and event loop.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::{info, warn};
use ratatui::{Terminal, backend::Backend};

pub mod actions;
pub mod catalog;
pub mod filter;
pub mod model;
pub mod systemd;
pub mod table;
pub mod ui;

#[cfg(test)]
mod testing;

use crate::config::JobMode;
use crate::error::Result;
use actions::ServiceAction;
use model::{UnitRecord, unit_name};
use systemd::ServiceManager;
use table::TableView;

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    FilterEditing,
    StatusOverlay,
}

pub struct App<M> {
    manager: M,
    job_mode: JobMode,
    catalog: Vec<UnitRecord>,
    filter_text: String,
    input: String,
    table: TableView,
    mode: Mode,
    status_text: String,
    status_scroll: u16,
    should_quit: bool,
}

impl<M: ServiceManager> App<M> {
    /// Loads the initial catalog. A listing failure here aborts startup.
    pub fn new(manager: M, job_mode: JobMode) -> Result<Self> {
        let catalog = catalog::load_catalog(&manager)?;
        info!("loaded {} services", catalog.len());

        let mut app = Self {
            manager,
            job_mode,
            catalog,
            filter_text: String::new(),
            input: String::new(),
            table: TableView::default(),
            mode: Mode::Browsing,
            status_text: String::new(),
            status_scroll: 0,
            should_quit: false,
        };
        app.redraw_table();
        Ok(app)
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| ui::render(f, self))?;

            if let Event::Key(key) = event::read()? {
                self.handle_key(key)?;
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Routes one key press according to the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match self.mode {
            Mode::Browsing => self.handle_browsing_key(key.code)?,
            Mode::FilterEditing => self.handle_filter_key(key.code),
            Mode::StatusOverlay => self.handle_overlay_key(key.code),
        }
        Ok(())
    }

    fn handle_browsing_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => {
                self.input = self.filter_text.clone();
                self.mode = Mode::FilterEditing;
            }
            KeyCode::Char('r') | KeyCode::Char('s') => {
                self.perform_action(ServiceAction::ReloadOrRestart)?
            }
            KeyCode::Char('S') => self.perform_action(ServiceAction::Stop)?,
            KeyCode::Char('e') => self.perform_action(ServiceAction::Enable)?,
            KeyCode::Char('d') => self.perform_action(ServiceAction::Disable)?,
            KeyCode::Char(' ') => self.show_status(),

            KeyCode::Char('j') | KeyCode::Down => self.table.next(),
            KeyCode::Char('k') | KeyCode::Up => self.table.previous(),
            KeyCode::Char('g') | KeyCode::Home => self.table.first(),
            KeyCode::Char('G') | KeyCode::End => self.table.last(),
            KeyCode::PageDown => self.table.page_down(PAGE),
            KeyCode::PageUp => self.table.page_up(PAGE),
            _ => {}
        }
        Ok(())
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                self.filter_text = std::mem::take(&mut self.input);
                self.redraw_table();
                self.mode = Mode::Browsing;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ') => {
                self.status_text.clear();
                self.status_scroll = 0;
                self.mode = Mode::Browsing;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.status_scroll = self.status_scroll.saturating_add(1)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.status_scroll = self.status_scroll.saturating_sub(1)
            }
            _ => {}
        }
    }

    /// Name of the unit in the highlighted row, re-derived from its path.
    fn selected_unit(&self) -> Option<String> {
        self.table
            .selected_path()
            .map(|path| unit_name(path).to_string())
    }

    fn perform_action(&mut self, action: ServiceAction) -> Result<()> {
        let Some(unit) = self.selected_unit() else {
            return Ok(());
        };
        self.catalog = actions::dispatch(&self.manager, action, &unit, self.job_mode)?;
        self.redraw_table();
        Ok(())
    }

    fn show_status(&mut self) {
        let Some(unit) = self.selected_unit() else {
            return;
        };
        self.status_text = match self.manager.status_text(&unit) {
            Ok(text) => text,
            Err(err) => {
                warn!("status of {} unavailable: {}", unit, err);
                String::new()
            }
        };
        self.status_scroll = 0;
        self.mode = Mode::StatusOverlay;
    }

    fn redraw_table(&mut self) {
        let visible = filter::apply(&self.catalog, &self.filter_text);
        self.table.render(&visible);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn catalog(&self) -> &[UnitRecord] {
        &self.catalog
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
