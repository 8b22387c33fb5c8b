//! planet-wishlist — an infinite-scroll planet browser with a persistent
//! wishlist, for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!                           ▲      ▲
//!       handle_key_event()  │      │ watch::Receiver
//!                      ┌──────────┐ ┌─────────────────┐
//!                      │ input.rs │ │ wishlist store  │
//!                      └──────────┘ └─────────────────┘
//! ```
//!
//! * **`source/`** — the `PlanetSource` trait, record types, and the SWAPI
//!   HTTP client.
//! * **`list`** — the infinite-scroll controller and virtual window.
//! * **`wishlist/`** — the persisted favorites store and the paginated view.
//! * **`detail`** — single-planet view with the favorite toggle.
//! * **`storage`** — the on-disk key/value store behind the wishlist.
//! * **`fetch`** — spawns network calls and routes results back.
//! * **`app`** — owns all screen state.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod detail;
mod error;
mod fetch;
mod input;
mod list;
mod logging;
mod source;
mod storage;
mod ui;
mod wishlist;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Args;
use source::SwapiClient;
use storage::FileStorage;
use wishlist::WishlistStore;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
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

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        tracing::error!("panic: {info}");
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    logging::configure_logging(&args.log_file())?;
    install_panic_hook();

    let data_dir = args.data_dir();
    tracing::info!(api = %args.api_url, data_dir = %data_dir.display(), "starting");

    // -- runtime for network calls -------------------------------------------
    let runtime = tokio::runtime::Runtime::new()?;
    let client = SwapiClient::new(&args.api_url, args.timeout())?;
    let (fetcher, mut rx) = fetch::channel(Arc::new(client), runtime.handle().clone());

    // -- wishlist --------------------------------------------------------------
    let mut store = WishlistStore::new(FileStorage::new(&data_dir));
    store.hydrate();

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(fetcher, store);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain finished fetches.
    //   2. Refresh the wishlist view if the favorites changed.
    //   3. Render, then let the list decide whether it needs another page.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.handle_fetch(msg);
        }

        app.sync_wishlist();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;
        app.on_render();

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!(favorites = app.store.len(), "exiting");
    // `guard` is dropped here, restoring the terminal.  Dropping the runtime
    // abandons any fetch still in flight.
    drop(guard);
    runtime.shutdown_background();
    Ok(())
}
