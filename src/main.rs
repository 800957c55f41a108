// src/main.rs

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use emoletr_tui::app::{App, InputMode};
use emoletr_tui::config::Settings;
use emoletr_tui::core::api::{AnalysisApi, HttpAnalysisApi};
use emoletr_tui::core::health::spawn_startup_probe;
use emoletr_tui::core::preferences::{PreferenceStore, LOCALE_KEY, THEME_KEY};
use emoletr_tui::event::{self as app_event, EventReceiver};
use emoletr_tui::{logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let log_path = logging::initialize_logging()?;
    info!(log = %log_path.display(), "EmoLetr client starting.");

    let settings = Settings::from_env();
    let preferences = PreferenceStore::open_default().wrap_err("cannot open preferences")?;

    if let Some(theme) = preferences.get::<serde_json::Value>(THEME_KEY) {
        info!(%theme, "Saved theme.");
    }
    let saved_locale = preferences.get::<String>(LOCALE_KEY);
    let locale = settings.resolve_locale(saved_locale.as_deref());

    let api: Arc<dyn AnalysisApi> = Arc::new(HttpAnalysisApi::new(&settings)?);
    let (tx, mut rx) = app_event::channel();
    let mut app = App::new(settings, Arc::clone(&api), tx.clone(), preferences, locale);

    // Startup probe runs in the background; the UI is usable right away.
    spawn_startup_probe(api, tx);

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let outcome = run(&mut terminal, &mut app, &mut rx).await;

    // --- Restore Terminal ---
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    info!("EmoLetr client stopped.");
    outcome
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut EventReceiver,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app)?;
        }

        while let Ok(app_event) = rx.try_recv() {
            app.apply(app_event);
        }

        app.on_tick(Instant::now());
    }
    Ok(())
}

/// Reads one terminal event and routes key presses by prompt.
fn handle_events(app: &mut App) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.input_mode {
                InputMode::Text => handle_text_input(app, key),
                InputMode::File => handle_file_input(app, key),
            }
        }
    }
    Ok(())
}

fn handle_text_input(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Char('e') if ctrl => {
            if let Some(path) = app.export_results(Utc::now()) {
                info!(path = %path.display(), "Export written.");
            }
        }
        KeyCode::Char('n') if ctrl => app.reset(),
        KeyCode::Char(c) if !ctrl => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            // The task is detached: submissions are never cancelled.
            let _ = app.submit_text();
        }
        KeyCode::Tab => app.open_file_prompt(),
        KeyCode::F(2) => app.toggle_locale(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}

fn handle_file_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_file_prompt(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.file_input.push(c),
        KeyCode::Backspace => {
            app.file_input.pop();
        }
        KeyCode::Enter => {
            if app.submit_file().is_none() {
                debug!("File prompt produced no request.");
            }
        }
        _ => {}
    }
}
