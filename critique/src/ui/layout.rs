//! Two-panel layout and status bar for critique.
//!
//! Pure layout arithmetic plus the status bar renderer. Called inside
//! `terminal.draw()` on every frame, so every frame gets a fresh layout that
//! reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 80` columns the code and review panels split the width evenly.
//! Below that only the focused panel is shown and the other collapses to zero.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes the two panel borders share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, PanelFocus, SPINNER};
use crate::theme::Theme;

/// Returns `[code, review, status_bar]` rects for the current frame.
pub fn compute_layout(area: Rect, focus: PanelFocus) -> [Rect; 3] {
    let [main_area, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let constraints = if area.width >= 80 {
        [Constraint::Percentage(50), Constraint::Percentage(50)]
    } else {
        match focus {
            PanelFocus::Code => [Constraint::Fill(1), Constraint::Length(0)],
            PanelFocus::Review => [Constraint::Length(0), Constraint::Fill(1)],
        }
    };
    let horizontal = Layout::horizontal(constraints).spacing(Spacing::Overlap(1));

    let [code, review] = main_area.layout(&horizontal);
    [code, review, status_bar]
}

/// Inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered panel block; thick border in the active colour when focused.
///
/// `MergeStrategy::Fuzzy` because `Exact` produces broken junctions when
/// `Thick` and `Plain` borders meet.
pub fn panel_block<'a>(title: Line<'a>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Clamps a stored scroll offset so the last page stays filled.
pub fn clamp_scroll(scroll: u16, total: usize, viewport: u16) -> u16 {
    let max = total.saturating_sub(viewport as usize);
    (scroll as usize).min(max) as u16
}

/// Renders the 1-row status bar: state badge, model, file, then the notice or hint.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let ui_state = state.session.state();
    let badge = if ui_state == critique_core::state::ReviewUiState::Analyzing {
        format!(" {} {} ", SPINNER[state.spinner_frame], ui_state.label())
    } else {
        format!(" {} ", ui_state.label())
    };

    let model = state.session.model();
    let mut spans = vec![
        Span::styled(
            badge,
            Style::default()
                .fg(theme.state_color(ui_state))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", model.label)),
    ];

    if let Some(source) = state.session.source() {
        let name = if source.file_path.is_empty() { "untitled" } else { &source.file_path };
        spans.push(Span::styled(format!("│ {name} "), Style::default().fg(theme.muted)));
    }
    if state.host_closed {
        spans.push(Span::styled(
            "│ editor disconnected ",
            Style::default().fg(theme.status_alert),
        ));
    }

    let tail = state.notice.as_deref().unwrap_or(ui_state.hint());
    spans.push(Span::raw(format!("│ {tail}")));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
