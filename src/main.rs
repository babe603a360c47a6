//! newsdesk — a terminal dashboard for the news agent backend.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  Envelope  ┌──────────┐  draw()  ┌──────────┐
//! │ task.rs  │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (router) │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲                    ▲      │
//!      │ api::Backend       │      │ view/*
//! ┌──────────┐        ┌──────────┐ └─► news / prompt / sources
//! │  api/    │        │ input.rs │
//! └──────────┘        └──────────┘
//! ```
//!
//! * **`api/`** — the [`Backend`](api::Backend) trait, wire types and the
//!   HTTP implementation.
//! * **`task`** — runs backend calls on the tokio runtime and posts results
//!   back, tagged with the owning view's scope and reload sequence.
//! * **`view/`** — per-view state and how responses fold into it.
//! * **`app`** — the tab router: which view is mounted, plus response routing.
//! * **`ui`** — pure rendering.
//! * **`input`** — maps key events to `App` actions.
//! * **`main`** — wires everything together: config, logging, runtime,
//!   terminal and the event loop.

mod api;
mod app;
mod config;
mod input;
mod logging;
mod task;
mod ui;
mod view;

#[cfg(test)]
mod testing;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use api::HttpBackend;
use app::App;
use config::Cli;
use task::Dispatcher;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Owns raw mode and the alternate screen; restores both on drop, including
/// during unwinding.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        error!(%info, "panic");
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // A missing .env is fine; flags and the real environment still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let subscriber = logging::get_subscriber(&cli.log_path(), &cli.log_level)?;
    logging::init_subscriber(subscriber)?;

    // -- backend and runtime ---------------------------------------------------
    // Validate the origin before the terminal is touched.
    let backend =
        HttpBackend::new(&cli.backend, cli.timeout())?.with_scrape_timeout(cli.scrape_timeout());
    info!(
        backend = backend.base(),
        timeout = ?cli.timeout(),
        scrape_timeout = ?cli.scrape_timeout(),
        "starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("newsdesk-io")
        .build()
        .context("failed to start tokio runtime")?;
    let (dispatcher, mut rx) = Dispatcher::new(Arc::new(backend), runtime.handle().clone());

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(dispatcher, cli.tab);

    // -- main event loop -----------------------------------------------------
    // ~10 fps. Each iteration:
    //   1. Apply every response that arrived since the last tick.
    //   2. Render.
    //   3. Wait up to one tick for a key.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(envelope) = rx.try_recv() {
            app.handle(envelope);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("shutting down");
    // Drop the app first so its scope aborts anything still in flight.
    drop(app);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}
