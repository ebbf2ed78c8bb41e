//! Table of the selected country's rows.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Row, Table, TableState},
};

use crate::app::{App, Screen};

const HEADERS: [&str; 7] = [
  "date",
  "total_cases",
  "new_cases",
  "total_deaths",
  "new_deaths",
  "total_recovered",
  "active_cases",
];

fn cell(v: Option<i64>) -> String { v.map(|n| n.to_string()).unwrap_or_else(|| "-".into()) }

/// Render the table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let border = if app.screen == Screen::Series {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(format!(" Rows ({}) ", app.series.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let rows: Vec<Row> = app
    .series
    .iter()
    .map(|r| {
      Row::new(vec![
        r.date.to_string(),
        cell(r.total_cases),
        cell(r.new_cases),
        cell(r.total_deaths),
        cell(r.new_deaths),
        cell(r.total_recovered),
        cell(r.active_cases),
      ])
    })
    .collect();

  let header = Row::new(HEADERS).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let table = Table::new(rows, [Constraint::Length(12); 7])
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default();
  state.select((!app.series.is_empty()).then_some(app.row_cursor));
  f.render_stateful_widget(table, area, &mut state);
}
