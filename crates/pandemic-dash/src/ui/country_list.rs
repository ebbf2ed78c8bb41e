//! Country list pane on the left.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Screen};

/// Render the country list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_countries();
  let total = app.countries.len();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Countries ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Countries ({}) ", total)
  };

  let border = if app.screen == Screen::CountryList {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|country| {
      let continent = country.continent.as_deref().unwrap_or("");
      ListItem::new(Line::from(vec![
        Span::raw(country.name.clone()),
        Span::styled(format!("  {continent}"), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Filter bar on the last inner line.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select(if filtered.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
