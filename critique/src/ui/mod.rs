//! UI rendering for critique.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic and the status bar live in
//! `layout.rs`; each panel has its own module.

mod code_view;
mod layout;
mod review_view;
pub mod help;
pub mod keybindings;

use ratatui::Frame;
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: code panel, review panel, status bar, optional help.
///
/// Viewport heights are written back into `state` before the panels draw so
/// that page scrolling on the next keypress uses the current size.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [code, review, status_bar] = compute_layout(frame.area(), state.focus);
    frame.render_widget(Block::new().style(Style::default().bg(theme.background)), frame.area());

    state.code_viewport_height = inner_rect(code).height;
    state.review_viewport_height = inner_rect(review).height;

    if code.width > 0 {
        code_view::render_code(frame, code, state, theme);
    }
    if review.width > 0 {
        review_view::render_review(frame, review, state, theme);
    }
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
