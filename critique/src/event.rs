//! Event bus for critique.
//!
//! Terminal input, timer ticks and review outcomes are normalised into a
//! single `AppEvent` enum and sent over a tokio unbounded MPSC channel. Host
//! messages keep their own queue (see `host.rs`); the main loop selects over
//! both, so every session mutation happens on one logical thread.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms, about 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) advances the busy spinner.

use critique_core::error::ServiceError;
use critique_core::types::RequestToken;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    Key(KeyEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Logic tick.
    Tick,
    /// Render tick; triggers a `terminal.draw()` call.
    Render,
    /// Outcome of a review request, tagged with the request's token.
    ReviewSettled {
        token: RequestToken,
        outcome: Result<Value, ServiceError>,
    },
    /// Quit signal.
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned and distributed to background tasks;
/// the receiver (`rx`) is owned by the main event loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background task that turns terminal input and timers into events.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream, and
/// the `Press` filter stops Windows from delivering every key twice. Send
/// errors mean the loop has gone away; the task then stops.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick_tick => tx.send(AppEvent::Tick),
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    Some(Ok(_)) => Ok(()),
                    Some(Err(_)) | None => {
                        let _ = tx.send(AppEvent::Quit);
                        break;
                    }
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
