// Handles the rendering of widgets to the terminal frame.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, Wrap},
};

use super::table::{HEADER, TableView};
use super::{App, Mode};

pub const HELP_TEXT: &str = "(q) Exit (r) Reload/Restart (s) Start (S) Stop (e) Enable (d) Disable (/) Filter (space) Status";
pub const FILTER_LABEL: &str = "Filter by: ";

/// Main render function called every frame.
pub fn render<M>(f: &mut Frame, app: &mut App<M>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    render_unit_table(f, chunks[0], &mut app.table);

    match app.mode {
        Mode::FilterEditing => render_filter_input(f, chunks[1], &app.input),
        _ => render_help(f, chunks[1]),
    }

    if app.mode == Mode::StatusOverlay {
        render_status(f, &app.status_text, app.status_scroll);
    }
}

fn render_unit_table(f: &mut Frame, area: Rect, table: &mut TableView) {
    let header = Row::new(HEADER.iter().map(|title| Cell::from(*title))).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = table
        .model()
        .rows
        .iter()
        .map(|row| {
            let active_color = match row[1].as_str() {
                "active" => Color::Green,
                "failed" => Color::Red,
                "activating" | "deactivating" | "reloading" => Color::Yellow,
                _ => Color::Gray,
            };
            Row::new(vec![
                Cell::from(row[0].clone()),
                Cell::from(row[1].clone()).style(Style::default().fg(active_color)),
                Cell::from(row[2].clone()),
                Cell::from(row[3].clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Fill(10),
        Constraint::Fill(6),
    ];

    let unit_table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray))
                .padding(Padding::horizontal(1))
                .title(" sdtui "),
        )
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );

    f.render_stateful_widget(unit_table, area, table.state_mut());
}

fn render_help(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(HELP_TEXT).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_filter_input(f: &mut Frame, area: Rect, input: &str) {
    let line = Line::from(vec![
        Span::styled(FILTER_LABEL, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(input),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + (FILTER_LABEL.len() + input.chars().count()) as u16;
    f.set_cursor_position(Position::new(
        cursor_x.min(area.right().saturating_sub(1)),
        area.y,
    ));
}

fn render_status(f: &mut Frame, text: &str, scroll: u16) {
    let area = centered_rect(78, 78, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Service status ");

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
