// Tabular projection of the filtered catalog plus its selection state.

use ratatui::widgets::TableState;

use super::model::UnitRecord;

pub const HEADER: [&str; 4] = ["Enabled", "Active", "Path", "Description"];
/// Index of the column holding the unit file path.
pub const PATH_COLUMN: usize = 2;

/// Display model: the header is implicit and never selectable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    pub rows: Vec<[String; 4]>,
}

impl TableModel {
    pub fn from_records(records: &[&UnitRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                [
                    record.enabled_state.to_string(),
                    record.active_state.to_string(),
                    record.source_path.clone(),
                    record.description.clone(),
                ]
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TableView {
    model: TableModel,
    state: TableState,
}

impl TableView {
    /// Replaces the rows and scrolls back to the first data row.
    pub fn render(&mut self, records: &[&UnitRecord]) {
        self.model = TableModel::from_records(records);
        let first = if self.model.is_empty() { None } else { Some(0) };
        self.state = TableState::default().with_selected(first);
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    pub fn state_mut(&mut self) -> &mut TableState {
        &mut self.state
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Path column of the highlighted row.
    pub fn selected_path(&self) -> Option<&str> {
        let row = self.model.rows.get(self.state.selected()?)?;
        Some(row[PATH_COLUMN].as_str())
    }

    pub fn next(&mut self) {
        self.move_by(1);
    }

    pub fn previous(&mut self) {
        self.move_by(-1);
    }

    pub fn page_down(&mut self, page: usize) {
        self.move_by(page.max(1) as isize);
    }

    pub fn page_up(&mut self, page: usize) {
        self.move_by(-(page.max(1) as isize));
    }

    pub fn first(&mut self) {
        if !self.model.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.model.is_empty() {
            self.state.select(Some(self.model.len() - 1));
        }
    }

    fn move_by(&mut self, delta: isize) {
        if self.model.is_empty() {
            return;
        }
        let last = self.model.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(last);
        self.state.select(Some(target));
    }
}
