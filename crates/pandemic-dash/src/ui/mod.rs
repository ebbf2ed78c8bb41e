//! TUI rendering; orchestrates all panes.

pub mod country_list;
pub mod series_chart;
pub mod series_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let country = app
    .selected
    .as_ref()
    .map(|c| format!("  · {}", c.name))
    .unwrap_or_default();
  let left = Span::styled(
    format!(" pandemic{country}"),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::DarkGray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
    .split(area);

  country_list::draw(f, cols[0], app);

  if app.selected.is_none() {
    draw_empty_detail(f, cols[1]);
    return;
  }

  let right = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(cols[1]);
  series_chart::draw(f, right[0], app);
  series_table::draw(f, right[1], app);
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Series ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Select a country and press Enter.")
      .style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    Screen::CountryList if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc cancel  Enter select",
    ),
    Screen::CountryList => (
      "NORMAL",
      "↑↓/jk navigate  / search  Enter open  q quit",
    ),
    Screen::Series => (
      "SERIES",
      "↑↓/jk row  g/G first/last  x delete  r reload  Esc back  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
