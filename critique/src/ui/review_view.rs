//! Review panel renderer.
//!
//! The panel body is built as a flat list of lines (pre-wrapped to the panel
//! width) so scrolling can be clamped exactly, then windowed like the code panel.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};
use similar::ChangeTag;

use critique_core::score::grade;
use critique_core::state::ReviewUiState;
use critique_core::types::{Category, ReviewResult};

use crate::app::{AppState, PanelFocus, SPINNER};
use crate::highlight::{has_changes, DiffRow};
use crate::theme::Theme;
use crate::ui::layout::{clamp_scroll, inner_rect, panel_block};

const NO_COMMENT: &str = "no comment";

pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let block = panel_block(Line::from(" Review "), state.focus == PanelFocus::Review, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let lines = review_lines(state, theme, inner.width);
    state.review_scroll = clamp_scroll(state.review_scroll, lines.len(), inner.height);
    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(state.review_scroll as usize)
        .take(inner.height as usize)
        .map(ListItem::new)
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// Builds the panel body for the current session state.
pub fn review_lines(state: &AppState, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let width = (width as usize).max(20);
    let muted = Style::default().fg(theme.muted);
    let ui_state = state.session.state();

    let mut lines = Vec::new();
    match ui_state {
        ReviewUiState::Done => {
            if let Some(result) = state.session.result() {
                result_lines(&mut lines, result, &state.diff_rows, theme, width);
            }
        }
        ReviewUiState::Analyzing => {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", SPINNER[state.spinner_frame]),
                    Style::default().fg(theme.status_wait),
                ),
                Span::raw(format!("Reviewing with {}…", state.session.model().label)),
            ]));
        }
        ReviewUiState::Error => {
            lines.push(Line::styled(
                " Review failed",
                Style::default().fg(theme.status_alert).add_modifier(Modifier::BOLD),
            ));
            let message = state.session.error_message().unwrap_or("unknown error");
            for row in wrap(message, width - 2) {
                lines.push(Line::raw(format!("  {row}")));
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled(format!(" {}", ui_state.hint()), muted));
        }
        ReviewUiState::Unauth | ReviewUiState::Empty | ReviewUiState::Ready => {
            lines.push(Line::styled(format!(" {}", ui_state.hint()), muted));
        }
    }
    lines
}

fn result_lines(
    lines: &mut Vec<Line<'static>>,
    result: &ReviewResult,
    diff_rows: &[DiffRow],
    theme: &Theme,
    width: usize,
) {
    let muted = Style::default().fg(theme.muted);
    let heading = Style::default().add_modifier(Modifier::BOLD);

    let overall = grade(result.overall_score);
    lines.push(Line::from(vec![
        Span::styled(" Overall ", heading),
        Span::styled(
            format!("{:>3}  {}", result.overall_score, overall.label()),
            Style::default()
                .fg(theme.grade_color(overall.color_token()))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::raw(""));

    for category in Category::ALL {
        let score = result.category_scores.get(category);
        let g = grade(score);
        lines.push(Line::from(vec![
            Span::raw(format!(" {:<16}", category.title())),
            Span::styled(
                format!("{score:>3}  {}", g.label()),
                Style::default().fg(theme.grade_color(g.color_token())),
            ),
        ]));
    }

    if let Some(summary) = result.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::styled(" Summary", heading));
        for row in wrap(summary, width - 2) {
            lines.push(Line::raw(format!("  {row}")));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(" Comments", heading));
    for category in Category::ALL {
        lines.push(Line::styled(format!("  {}", category.title()), Style::default().add_modifier(Modifier::ITALIC)));
        let text = result.comment(category);
        if text.trim().is_empty() {
            lines.push(Line::styled(format!("    {NO_COMMENT}"), muted));
        } else {
            for row in wrap(text, width - 4) {
                lines.push(Line::raw(format!("    {row}")));
            }
        }
    }

    if !result.issues.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(format!(" Issues ({})", result.issues.len()), heading));
        for issue in &result.issues {
            let location = issue.line.map(|n| format!("L{n} ")).unwrap_or_default();
            let badge = format!("  [{}] ", issue.severity.label());
            let indent = badge.chars().count();
            let mut rows = wrap(&format!("{location}{}", issue.message), width.saturating_sub(indent).max(10)).into_iter();
            lines.push(Line::from(vec![
                Span::styled(badge, Style::default().fg(theme.severity_color(issue.severity))),
                Span::raw(rows.next().unwrap_or_default()),
            ]));
            for row in rows {
                lines.push(Line::raw(format!("{:indent$}{row}", "")));
            }
        }
    }

    if result.improved_code().is_some() {
        lines.push(Line::raw(""));
        if has_changes(diff_rows) {
            lines.push(Line::styled(" Improved code  (a: selection, A: file)", heading));
            lines.extend(diff_rows.iter().map(|row| diff_line(row, theme)));
        } else {
            lines.push(Line::styled(" Improved code is identical to the reviewed code", muted));
        }
    }
}

fn diff_line(row: &DiffRow, theme: &Theme) -> Line<'static> {
    let (marker, color) = match row.tag {
        ChangeTag::Insert => ("+ ", theme.diff_added),
        ChangeTag::Delete => ("- ", theme.diff_removed),
        ChangeTag::Equal => ("  ", theme.diff_context),
    };
    let base = Style::default().fg(color);
    let mut spans = vec![Span::styled(format!(" {marker}"), base)];
    spans.extend(row.segments.iter().map(|(emphasized, text)| {
        let style = if *emphasized { base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED) } else { base };
        Span::styled(text.clone(), style)
    }));
    Line::from(spans)
}

/// Greedy word wrap on character counts. Explicit newlines are kept.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                rows.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use critique_core::bridge::{HostBridge, HostMessage};
    use critique_core::catalog::ModelCatalog;
    use critique_core::session::ReviewSession;
    use critique_core::types::{SourceMode, SourcePayload};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn done_app(raw: serde_json::Value) -> AppState {
        let bridge = HostBridge::new();
        let mut session = ReviewSession::new(ModelCatalog::builtin(), bridge.outbox.clone());
        session.set_authenticated(true);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = AppState::new(session, tx);
        app.handle_host_message(HostMessage::NewCode(SourcePayload {
            code: "x = 1\n".to_owned(),
            file_path: "a.py".to_owned(),
            language_id: "python".to_owned(),
            mode: SourceMode::Document,
        }));
        app.submit_review();
        let request = rx.try_recv().unwrap();
        app.settle_review(request.token, Ok(raw));
        app
    }

    #[test]
    fn wrap_breaks_on_words_and_keeps_newlines() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn missing_comments_show_placeholder() {
        let app = done_app(json!({
            "quality_score": 150,
            "scores_by_category": {"bug": -5},
            "comments_by_category": {"style": "Use snake_case."}
        }));
        let text = text_of(&review_lines(&app, &Theme::dark(), 60));
        assert!(text[0].contains("100") && text[0].contains("Excellent"));
        assert!(text.iter().any(|l| l.contains("Bug") && l.contains("  0  Poor")));
        assert!(text.iter().any(|l| l.trim() == "Use snake_case."));
        assert_eq!(text.iter().filter(|l| l.trim() == NO_COMMENT).count(), 3);
    }

    #[test]
    fn improved_code_renders_as_diff() {
        let app = done_app(json!({"improved_code": "x = 2\n"}));
        let text = text_of(&review_lines(&app, &Theme::dark(), 60));
        assert!(text.iter().any(|l| l.starts_with(" - x = 1")));
        assert!(text.iter().any(|l| l.starts_with(" + x = 2")));
    }

    #[test]
    fn idle_states_show_hint() {
        let bridge = HostBridge::new();
        let session = ReviewSession::new(ModelCatalog::builtin(), bridge.outbox.clone());
        let (tx, _rx) = mpsc::unbounded_channel();
        let app = AppState::new(session, tx);
        let text = text_of(&review_lines(&app, &Theme::dark(), 60));
        assert_eq!(text, vec![format!(" {}", ReviewUiState::Unauth.hint())]);
    }
}
