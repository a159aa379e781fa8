//! Central application state for critique.
//!
//! `AppState` wraps the [`ReviewSession`] together with the purely visual
//! state (focus, scroll offsets, cached highlight and diff rows, the last
//! notice). Session mutations go through the session's own operations; this
//! module only decides which operation a user action maps to and refreshes
//! the render caches afterwards. No ratatui rendering logic lives here.

use critique_core::bridge::HostMessage;
use critique_core::error::ServiceError;
use critique_core::session::{ReviewSession, Settlement};
use critique_core::types::{ApplyScope, ApplyStatus, RequestToken, ReviewRequest};
use ratatui::text::Span;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::highlight::{highlight_code, improved_code_diff, DiffRow};

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel receives scroll keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel: the source text received from the host.
    #[default]
    Code,
    /// Right panel: scores, comments, issues and the improved-code diff.
    Review,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Code => PanelFocus::Review,
            PanelFocus::Review => PanelFocus::Code,
        }
    }
}

/// Frames of the busy spinner shown while a review is outstanding.
pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct AppState {
    pub session: ReviewSession,
    pub mode: Mode,
    pub focus: PanelFocus,

    pub code_scroll: u16,
    pub review_scroll: u16,
    pub help_scroll: u16,

    /// Inner panel heights cached after each render, for page scrolling.
    pub code_viewport_height: u16,
    pub review_viewport_height: u16,

    /// Highlighted source lines, rebuilt when a new payload arrives.
    pub code_lines: Vec<Vec<Span<'static>>>,
    /// Diff from the reviewed code to the improved code, rebuilt per result.
    pub diff_rows: Vec<DiffRow>,

    /// Last user-facing message (rejections, apply outcomes, model changes).
    pub notice: Option<String>,
    /// Set once the host has closed stdin.
    pub host_closed: bool,
    pub spinner_frame: usize,

    /// Code the current result was produced for; the diff is taken against it.
    reviewed_code: Option<String>,
    review_tx: UnboundedSender<ReviewRequest>,
}

impl AppState {
    pub fn new(session: ReviewSession, review_tx: UnboundedSender<ReviewRequest>) -> Self {
        Self {
            session,
            mode: Mode::default(),
            focus: PanelFocus::default(),
            code_scroll: 0,
            review_scroll: 0,
            help_scroll: 0,
            code_viewport_height: 0,
            review_viewport_height: 0,
            code_lines: Vec::new(),
            diff_rows: Vec::new(),
            notice: None,
            host_closed: false,
            spinner_frame: 0,
            reviewed_code: None,
            review_tx,
        }
    }

    // ------------------------------------------------------------------
    // Session-facing actions
    // ------------------------------------------------------------------

    /// Applies one inbound host message and refreshes the caches it affects.
    pub fn handle_host_message(&mut self, msg: HostMessage) {
        let is_new_code = matches!(msg, HostMessage::NewCode(_));
        let is_apply_result = matches!(msg, HostMessage::ApplyResult { .. });
        self.session.handle_host_message(msg);

        if is_new_code {
            self.code_lines = self
                .session
                .source()
                .map(|s| highlight_code(&s.code, &s.language_id, &s.file_path))
                .unwrap_or_default();
            self.diff_rows.clear();
            self.reviewed_code = None;
            self.code_scroll = 0;
            self.review_scroll = 0;
            self.notice = None;
        }
        if is_apply_result {
            self.notice = self.session.apply_status().map(describe_apply);
        }
    }

    /// Submits the current code for review and hands the request to the worker.
    pub fn submit_review(&mut self) {
        match self.session.submit_review() {
            Ok(request) => {
                self.reviewed_code = Some(request.code.clone());
                self.notice = None;
                let token = request.token;
                if self.review_tx.send(request).is_err() {
                    warn!(%token, "review worker is gone");
                    self.settle_review(
                        token,
                        Err(ServiceError::Transport("review worker stopped".to_owned())),
                    );
                }
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Lands a review outcome delivered by the worker.
    pub fn settle_review(&mut self, token: RequestToken, outcome: Result<Value, ServiceError>) {
        match self.session.settle(token, outcome) {
            Settlement::Stored => {
                self.diff_rows = match (self.session.result(), &self.reviewed_code) {
                    (Some(result), Some(old)) => result
                        .improved_code()
                        .map(|new| improved_code_diff(old, new))
                        .unwrap_or_default(),
                    _ => Vec::new(),
                };
                self.review_scroll = 0;
            }
            Settlement::Stale => {
                self.notice = Some("discarded a review of code that has since changed".to_owned());
            }
            Settlement::Failed => self.diff_rows.clear(),
            Settlement::Ignored => {}
        }
    }

    /// Moves the model selection through the catalog.
    pub fn cycle_model(&mut self, step: isize) {
        let entry = self.session.cycle_model(step);
        self.notice = Some(format!("model: {} ({})", entry.label, entry.provider));
    }

    /// Asks the host to write the improved code into the editor.
    pub fn request_apply(&mut self, scope: ApplyScope) {
        self.notice = Some(match self.session.request_apply(scope) {
            Ok(()) => match scope {
                ApplyScope::Selection => "applying to selection…".to_owned(),
                ApplyScope::File => "applying to file…".to_owned(),
            },
            Err(e) => e.to_string(),
        });
    }

    pub fn tick(&mut self) {
        if self.session.facts().is_busy {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    fn focused_scroll(&mut self) -> &mut u16 {
        match self.focus {
            PanelFocus::Code => &mut self.code_scroll,
            PanelFocus::Review => &mut self.review_scroll,
        }
    }

    fn focused_viewport(&self) -> u16 {
        match self.focus {
            PanelFocus::Code => self.code_viewport_height,
            PanelFocus::Review => self.review_viewport_height,
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_sub(lines);
    }

    pub fn scroll_top(&mut self) {
        *self.focused_scroll() = 0;
    }

    /// Scrolls to the end; the renderer clamps to the last visible line.
    pub fn scroll_bottom(&mut self) {
        *self.focused_scroll() = u16::MAX;
    }

    /// Uses the viewport height cached by the previous render; at least one line.
    pub fn half_page_down(&mut self) {
        let half = (self.focused_viewport() / 2).max(1);
        self.scroll_down(half);
    }

    pub fn half_page_up(&mut self) {
        let half = (self.focused_viewport() / 2).max(1);
        self.scroll_up(half);
    }
}

fn describe_apply(status: &ApplyStatus) -> String {
    match status {
        ApplyStatus::Pending(_) => "waiting for the editor…".to_owned(),
        ApplyStatus::Applied(ApplyScope::Selection) => "applied to selection".to_owned(),
        ApplyStatus::Applied(ApplyScope::File) => "applied to file".to_owned(),
        ApplyStatus::Rejected(Some(msg)) => format!("editor rejected the change: {msg}"),
        ApplyStatus::Rejected(None) => "editor rejected the change".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use critique_core::bridge::{HostBridge, SessionMessage};
    use critique_core::catalog::ModelCatalog;
    use critique_core::state::ReviewUiState;
    use critique_core::types::{SourceMode, SourcePayload};
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;

    fn new_code(code: &str) -> HostMessage {
        HostMessage::NewCode(SourcePayload {
            code: code.to_owned(),
            file_path: "main.py".to_owned(),
            language_id: "python".to_owned(),
            mode: SourceMode::Document,
        })
    }

    fn app() -> (AppState, HostBridge, mpsc::UnboundedReceiver<ReviewRequest>) {
        let bridge = HostBridge::new();
        let mut session = ReviewSession::new(ModelCatalog::builtin(), bridge.outbox.clone());
        session.set_authenticated(true);
        let (tx, rx) = mpsc::unbounded_channel();
        (AppState::new(session, tx), bridge, rx)
    }

    #[test]
    fn new_code_rebuilds_code_lines_and_resets_scroll() {
        let (mut app, _bridge, _rx) = app();
        app.code_scroll = 7;
        app.handle_host_message(new_code("a = 1\nb = 2\n"));
        assert_eq!(app.code_lines.len(), 2);
        assert_eq!(app.code_scroll, 0);
        assert_eq!(app.session.state(), ReviewUiState::Ready);
    }

    #[test]
    fn submit_dispatches_and_settle_builds_diff() {
        let (mut app, _bridge, mut rx) = app();
        app.handle_host_message(new_code("a = 1\n"));
        app.submit_review();
        let request = rx.try_recv().unwrap();
        assert_eq!(request.code, "a = 1\n");
        assert_eq!(app.session.state(), ReviewUiState::Analyzing);

        app.settle_review(request.token, Ok(json!({"improved_code": "a = 2\n"})));
        assert_eq!(app.session.state(), ReviewUiState::Done);
        assert_eq!(app.diff_rows.len(), 2);
    }

    #[test]
    fn rejected_submit_sets_notice() {
        let (mut app, _bridge, mut rx) = app();
        app.submit_review();
        assert_eq!(app.notice.as_deref(), Some("cannot submit: no code to review"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stopped_worker_settles_as_failure() {
        let (mut app, _bridge, rx) = app();
        drop(rx);
        app.handle_host_message(new_code("a = 1\n"));
        app.submit_review();
        assert_eq!(app.session.state(), ReviewUiState::Error);
    }

    #[test]
    fn apply_round_trip_reports_host_answer() {
        let (mut app, mut bridge, mut rx) = app();
        app.handle_host_message(new_code("a = 1\n"));
        app.submit_review();
        let request = rx.try_recv().unwrap();
        app.settle_review(request.token, Ok(json!({"improved_code": "a = 2\n"})));

        app.request_apply(ApplyScope::Selection);
        assert!(matches!(
            bridge.outbound_rx.try_recv(),
            Ok(SessionMessage::ApplyText { scope: ApplyScope::Selection, .. })
        ));
        app.handle_host_message(HostMessage::ApplyResult {
            success: false,
            message: Some("file is read-only".to_owned()),
        });
        assert_eq!(
            app.notice.as_deref(),
            Some("editor rejected the change: file is read-only")
        );
        assert_eq!(app.session.state(), ReviewUiState::Done);
    }

    #[test]
    fn scrolling_follows_focus() {
        let (mut app, _bridge, _rx) = app();
        app.review_viewport_height = 10;
        app.scroll_down(3);
        assert_eq!(app.code_scroll, 3);
        app.focus = app.focus.toggle();
        app.half_page_down();
        assert_eq!(app.review_scroll, 5);
        app.scroll_up(9);
        assert_eq!(app.review_scroll, 0);
        assert_eq!(app.code_scroll, 3);
    }
}
