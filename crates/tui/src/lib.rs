mod app;
mod async_ops;
mod config;
mod markdown;
mod reveal;
mod theme;
mod ui;
mod views;

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;

use app::App;
use async_ops::AsyncCommand;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the configured backend URL for this run.
    pub server_url: Option<String>,
}

/// Launch the TUI.
pub fn run(options: RunOptions) -> Result<()> {
    let mut config = config::load_config();
    if let Some(url) = options.server_url {
        config.server.url = url;
    }

    let mut app = App::new(config);
    // Startup fetches; results land one at a time through the event loop.
    app.dispatch(AsyncCommand::CheckHealth);
    app.dispatch(AsyncCommand::FetchServiceStatus);
    app.refresh_history();

    // Terminal setup — show UI immediately
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    loop {
        // ── Handle pending async command ─────────────────────────────
        if let Some(cmd) = app.next_command() {
            let result = rt.block_on(async_ops::execute(cmd, &app.config));
            app.apply_command_result(result);
        }

        // ── Local timers: streaming reveal + highlight pulse ─────────
        app.tick(Instant::now());

        terminal.draw(|frame| ui::render(frame, app))?;

        // Short poll keeps the reveal advancing between key events.
        if event::poll(Duration::from_millis(15))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key) {
                    break;
                }
            }
        }
    }
    Ok(())
}
