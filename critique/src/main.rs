//! critique: code review companion for an editor host.
//!
//! The editor extension spawns this binary and talks to it over
//! newline-delimited JSON on stdin/stdout; the TUI draws on stderr.
//!
//! # Startup sequence
//!
//! 1. File logging under `.critique/`, before anything can log.
//! 2. Config and theme. Read-only, safe before terminal init.
//! 3. Session, review client and review worker.
//! 4. `install_panic_hook()` then `register_sigterm()`.
//! 5. `init_tui()` enters the alternate screen and enables raw mode.
//! 6. Event task and stdio transport, then the `READY` announcement.
//!
//! The event loop never uses `?`. A draw error is carried out of the loop so
//! `restore_tui()` always runs first.

mod app;
mod config;
mod event;
mod highlight;
mod host;
mod logging;
mod review;
mod theme;
mod tui;
mod ui;

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use critique_core::bridge::HostBridge;
use critique_core::catalog::ModelCatalog;
use critique_core::session::ReviewSession;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::AppState;
use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, KeyAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_path = logging::init_logging(Path::new(".critique"))?;

    let config = config::Config::load();
    let theme = theme::Theme::from_name(&config.theme);

    let HostBridge {
        inbound_tx,
        mut inbound_rx,
        outbox,
        outbound_rx,
    } = HostBridge::new();

    let mut session = ReviewSession::new(ModelCatalog::builtin(), outbox);
    if let Some(model) = config.default_model.as_deref() {
        if let Err(e) = session.set_model(model) {
            warn!(error = %e, "ignoring default_model from config");
        }
    }
    session.set_authenticated(config.has_credentials());
    info!(
        session = %session.id(),
        endpoint = %config.endpoint,
        model = %session.model().id,
        log = %log_path.display(),
        "critique starting"
    );

    let handler = event::EventHandler::new();
    let mut rx = handler.rx;

    let service = review::client::HttpReviewService::new(
        config.endpoint.clone(),
        config.api_key.clone(),
        config.timeout(),
    )
    .context("building review client")?;
    let (review_tx, review_rx) = mpsc::unbounded_channel();
    review::worker::spawn_review_worker(Arc::new(service), review_rx, handler.tx.clone());

    let mut state = AppState::new(session, review_tx);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();
    let mut terminal = tui::init_tui().context("initialising terminal")?;

    event::spawn_event_task(handler.tx.clone());
    host::spawn_stdio_transport(inbound_tx, outbound_rx);
    if !state.session.announce() {
        warn!("host link closed before READY could be sent");
    }

    let mut result: anyhow::Result<()> = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is seen even when no other event arrives.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            maybe_msg = inbound_rx.recv(), if !state.host_closed => match maybe_msg {
                Some(msg) => state.handle_host_message(msg),
                None => {
                    state.host_closed = true;
                    state.notice = Some("editor closed the connection".to_owned());
                }
            },
            maybe_event = rx.recv() => match maybe_event {
                Some(AppEvent::Render) => {
                    if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                        result = Err(anyhow::Error::new(e).context("drawing frame"));
                        break 'event_loop;
                    }
                }
                Some(AppEvent::Key(key)) => {
                    if handle_key(key, &mut state) == KeyAction::Quit {
                        break 'event_loop;
                    }
                }
                Some(AppEvent::Tick) => state.tick(),
                // ratatui picks up the new size from `frame.area()` on the next draw.
                Some(AppEvent::Resize(_, _)) => {}
                Some(AppEvent::ReviewSettled { token, outcome }) => {
                    state.settle_review(token, outcome);
                }
                Some(AppEvent::Quit) | None => break 'event_loop,
            },
        }
        if term_flag.load(Ordering::Relaxed) {
            info!("SIGTERM received");
            break 'event_loop;
        }
    }

    tui::restore_tui().context("restoring terminal")?;
    info!(session = %state.session.id(), "critique exiting");
    result
}
