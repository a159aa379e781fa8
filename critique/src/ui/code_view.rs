//! Code panel renderer.
//!
//! Virtual scrolling over the cached highlighted lines: only the visible
//! window is materialized into `ListItem`s per frame.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use critique_core::types::SourceMode;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{clamp_scroll, inner_rect, panel_block};

pub fn render_code(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let title = match state.session.source() {
        Some(source) => {
            let scope = match source.mode {
                SourceMode::Selection => "selection",
                SourceMode::Document => "file",
            };
            let lang = if source.language_id.is_empty() { "text" } else { &source.language_id };
            format!(" Code · {lang} · {scope} ")
        }
        None => " Code ".to_owned(),
    };
    let block = panel_block(Line::from(title), state.focus == PanelFocus::Code, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if state.code_lines.is_empty() {
        let msg = Line::styled("  Waiting for code from the editor…", Style::default().fg(theme.muted));
        frame.render_widget(List::new(vec![ListItem::new(msg)]), inner);
        return;
    }

    let total = state.code_lines.len();
    state.code_scroll = clamp_scroll(state.code_scroll, total, inner.height);
    let start = state.code_scroll as usize;
    let end = (start + inner.height as usize).min(total);
    let gutter = total.to_string().len();

    let items: Vec<ListItem> = state.code_lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, spans)| {
            let number = Span::styled(
                format!("{:>gutter$} ", start + offset + 1),
                Style::default().fg(theme.muted),
            );
            let mut line = Vec::with_capacity(spans.len() + 1);
            line.push(number);
            line.extend(spans.iter().cloned());
            ListItem::new(Line::from(line))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}
