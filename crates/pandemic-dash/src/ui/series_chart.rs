//! Line chart of the cumulative metrics of the selected country.

use chrono::NaiveDate;
use pandemic_core::record::SeriesRow;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  symbols::Marker,
  text::Span,
  widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::app::App;

/// A charted metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
  TotalCases,
  TotalDeaths,
  TotalRecovered,
  ActiveCases,
}

impl Metric {
  pub const ALL: [Metric; 4] = [
    Metric::TotalCases,
    Metric::TotalDeaths,
    Metric::TotalRecovered,
    Metric::ActiveCases,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Metric::TotalCases => "total_cases",
      Metric::TotalDeaths => "total_deaths",
      Metric::TotalRecovered => "total_recovered",
      Metric::ActiveCases => "active_cases",
    }
  }

  fn color(self) -> Color {
    match self {
      Metric::TotalCases => Color::Yellow,
      Metric::TotalDeaths => Color::Red,
      Metric::TotalRecovered => Color::Green,
      Metric::ActiveCases => Color::Cyan,
    }
  }

  fn value(self, row: &SeriesRow) -> Option<i64> {
    match self {
      Metric::TotalCases => row.total_cases,
      Metric::TotalDeaths => row.total_deaths,
      Metric::TotalRecovered => row.total_recovered,
      Metric::ActiveCases => row.active_cases,
    }
  }
}

/// `(days since first row, value)` points for `metric`; rows without a
/// value are skipped.
pub fn points(rows: &[SeriesRow], metric: Metric) -> Vec<(f64, f64)> {
  let Some(origin) = rows.first().map(|r| r.date) else {
    return Vec::new();
  };
  rows
    .iter()
    .filter_map(|r| {
      let v = metric.value(r)?;
      Some(((r.date - origin).num_days() as f64, v as f64))
    })
    .collect()
}

/// Upper y bound covering every plotted point, never below 1.
pub fn y_max(datasets: &[Vec<(f64, f64)>]) -> f64 {
  datasets
    .iter()
    .flatten()
    .map(|(_, y)| *y)
    .fold(1.0, f64::max)
}

/// Render the chart into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Cumulative ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let (Some(first), Some(last)) = (app.series.first(), app.series.last()) else {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("No data.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let series: Vec<Vec<(f64, f64)>> = Metric::ALL
    .iter()
    .map(|m| points(&app.series, *m))
    .collect();
  let top = y_max(&series);
  let span_days = (last.date - first.date).num_days().max(1) as f64;

  let datasets: Vec<Dataset> = Metric::ALL
    .iter()
    .zip(&series)
    .map(|(m, data)| {
      Dataset::default()
        .name(m.label())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(m.color()))
        .data(data)
    })
    .collect();

  let chart = Chart::new(datasets)
    .block(block)
    .x_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, span_days])
        .labels(vec![date_label(first.date), date_label(last.date)]),
    )
    .y_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, top])
        .labels(vec![Span::raw("0"), Span::raw(format!("{top:.0}"))]),
    );
  f.render_widget(chart, area);
}

fn date_label(date: NaiveDate) -> Span<'static> { Span::raw(date.format("%Y-%m-%d").to_string()) }
