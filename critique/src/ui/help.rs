//! Help overlay renderer.
//!
//! Draws a centred modal over the panels. `Clear` erases the area first, inside
//! the same `terminal.draw()` closure as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped below 40 columns, where the centred area would be too small to read.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let section = |title: &'static str| {
        Line::styled(title, Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD))
    };
    Text::from(vec![
        section("Review"),
        Line::from("  s             Submit the current code for review"),
        Line::from("  m / M         Next / previous review model"),
        Line::from("  a             Apply improved code to the selection"),
        Line::from("  A             Apply improved code to the whole file"),
        Line::from(""),
        section("Navigation"),
        Line::from("  Tab           Switch focus between code and review"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half a page down / up"),
        Line::from(""),
        section("General"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Esc       Quit"),
        Line::from(""),
        section("Grades"),
        Line::from("  90+ Excellent · 75+ Good · 60+ Fair · 40+ Needs work · below Poor"),
    ])
}
