//! `pandemic-dash`: terminal dashboard for the pandemic metrics API.
//!
//! ```
//! pandemic-dash --url http://localhost:5000
//! PANDEMIC_URL=http://metrics:5000 pandemic-dash
//! pandemic-dash --config dash.toml
//! ```

mod app;
mod client;
mod ui;

use std::{
  io::{self, Stdout},
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:5000";

/// Input poll interval; bounds how long a redraw can lag a key press.
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "pandemic-dash", about = "Terminal dashboard for pandemic metrics")]
struct Args {
  /// TOML file with a `url` key.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the API server.
  #[arg(long, env = "PANDEMIC_URL")]
  url: Option<String>,
}

#[derive(Deserialize, Default, Debug, PartialEq)]
struct DashConfig {
  url: Option<String>,
}

impl DashConfig {
  fn read(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// Flag or env first, then the config file, then [`DEFAULT_URL`].
fn resolve_url(flag: Option<String>, file: DashConfig) -> String {
  flag
    .or(file.url)
    .filter(|u| !u.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_URL.to_owned())
}

// ─── Terminal ─────────────────────────────────────────────────────────────────

/// Raw-mode alternate screen, restored when dropped.
struct Tui {
  terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
  fn enter() -> Result<Self> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("creating terminal")?;
    Ok(Self { terminal })
  }

  async fn run(&mut self, app: &mut App) -> Result<()> {
    loop {
      self
        .terminal
        .draw(|f| ui::draw(f, app))
        .context("drawing frame")?;

      let polled = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
        if event::poll(TICK)? {
          event::read().map(Some)
        } else {
          Ok(None)
        }
      })?;
      let Some(Event::Key(key)) = polled else {
        continue;
      };

      match app.handle_key(key).await {
        Ok(true) => {}
        Ok(false) => return Ok(()),
        // Keep the dashboard up; the error shows in the status bar.
        Err(e) => app.status_msg = format!("Error: {e}"),
      }
    }
  }
}

impl Drop for Tui {
  fn drop(&mut self) {
    disable_raw_mode().ok();
    execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
    self.terminal.show_cursor().ok();
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let file = match &args.config {
    Some(path) => DashConfig::read(path)?,
    None => DashConfig::default(),
  };
  let base_url = resolve_url(args.url, file);

  let mut app = App::new(ApiClient::new(ApiConfig { base_url })?);
  let mut tui = Tui::enter()?;
  app.load_countries().await?;
  tui.run(&mut app).await
}
