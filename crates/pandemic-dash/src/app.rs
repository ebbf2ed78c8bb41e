//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use pandemic_core::{country::Country, record::SeriesRow};

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the country list; right pane shows the last opened series.
  CountryList,
  /// Focus on the series table of the selected country.
  Series,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All countries returned by the API on startup.
  pub countries: Vec<Country>,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* country list.
  pub list_cursor: usize,

  /// Country whose series is shown in the right pane.
  pub selected: Option<Country>,

  /// Series rows of `selected`, ascending by date.
  pub series: Vec<SeriesRow>,

  /// Highlighted row in the series table.
  pub row_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty country list.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::CountryList,
      countries: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      selected: None,
      series: Vec::new(),
      row_cursor: 0,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all countries from the API and populate `self.countries`.
  pub async fn load_countries(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading countries…".into();
    match self.client.list_countries().await {
      Ok(countries) => {
        self.countries = countries;
        self.list_cursor = 0;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  async fn load_series(&mut self, id_country: i64) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    match self.client.get_series(id_country).await {
      Ok(series) => {
        self.series = series;
        self.row_cursor = self.row_cursor.min(self.series.len().saturating_sub(1));
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Countries whose name matches the current filter query.
  pub fn filtered_countries(&self) -> Vec<&Country> {
    if self.filter.is_empty() {
      return self.countries.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .countries
      .iter()
      .filter(|c| matcher.fuzzy_match(&c.name, &self.filter).is_some())
      .collect()
  }

  /// The country under the list cursor in the filtered view, if any.
  pub fn cursor_country(&self) -> Option<&Country> {
    self.filtered_countries().get(self.list_cursor).copied()
  }

  /// The series row under the table cursor, if any.
  pub fn cursor_row(&self) -> Option<&SeriesRow> { self.series.get(self.row_cursor) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      return self.handle_filter_key(key).await;
    }

    match self.screen {
      Screen::CountryList => self.handle_list_key(key).await,
      Screen::Series => self.handle_series_key(key).await,
    }
  }

  async fn handle_filter_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        // A single match opens straight away.
        let only = match self.filtered_countries().as_slice() {
          [c] => Some((*c).clone()),
          _ => None,
        };
        if let Some(country) = only {
          self.open_series(country).await?;
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_countries().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(country) = self.cursor_country().cloned() {
          self.open_series(country).await?;
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_series_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::CountryList;
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.row_cursor + 1 < self.series.len() {
          self.row_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.row_cursor = self.row_cursor.saturating_sub(1);
      }
      KeyCode::Home | KeyCode::Char('g') => self.row_cursor = 0,
      KeyCode::End | KeyCode::Char('G') => {
        self.row_cursor = self.series.len().saturating_sub(1);
      }

      KeyCode::Char('x') => self.delete_highlighted().await?,
      KeyCode::Char('r') => {
        if let Some(id) = self.selected.as_ref().map(|c| c.id_country) {
          self.load_series(id).await?;
        }
      }

      _ => {}
    }
    Ok(true)
  }

  /// Select `country` and load its series.
  async fn open_series(&mut self, country: Country) -> anyhow::Result<()> {
    self.row_cursor = 0;
    self.load_series(country.id_country).await?;
    self.selected = Some(country);
    self.screen = Screen::Series;
    Ok(())
  }

  /// Delete the highlighted `(id_country, date)` row and reload the series.
  async fn delete_highlighted(&mut self) -> anyhow::Result<()> {
    let Some((id, date)) = self.cursor_row().map(|r| (r.id_country, r.date)) else {
      return Ok(());
    };
    let deleted = self.client.delete_entry(id, date).await?;
    self.load_series(id).await?;
    self.status_msg = if deleted {
      format!("Deleted {date}")
    } else {
      format!("No entry for {date}")
    };
    Ok(())
  }
}
