//! Color theme system for critique.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface critique renders. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, so it works on any terminal including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.
//!
//! Grade colours are looked up by `ColorToken` so the score policy in
//! `critique-core` never needs to know about terminal colours.

use critique_core::score::ColorToken;
use critique_core::state::ReviewUiState;
use critique_core::types::IssueSeverity;
use ratatui::style::Color;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Grades, by colour token
    pub grade_green: Color,
    pub grade_teal: Color,
    pub grade_yellow: Color,
    pub grade_orange: Color,
    pub grade_red: Color,

    // Improved-code diff
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,

    // Issue severity badges
    pub badge_critical: Color,
    pub badge_major: Color,
    pub badge_minor: Color,
    pub badge_info: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// State badge when the user can act (READY, DONE).
    pub status_ok: Color,
    /// State badge while waiting (ANALYZING, NO CODE).
    pub status_wait: Color,
    /// State badge for ERROR and SIGN IN.
    pub status_alert: Color,

    // General
    /// Secondary text: placeholders, line numbers, hints.
    pub muted: Color,
    pub background: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            grade_green: Color::Green,
            grade_teal: Color::Cyan,
            grade_yellow: Color::Yellow,
            grade_orange: Color::LightRed,
            grade_red: Color::Red,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,

            badge_critical: Color::Red,
            badge_major: Color::Yellow,
            badge_minor: Color::Blue,
            badge_info: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_ok: Color::Green,
            status_wait: Color::Cyan,
            status_alert: Color::Red,

            muted: Color::DarkGray,
            background: Color::Reset,
        }
    }

    /// Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let peach = Color::Rgb(250, 179, 135);    // #fab387
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            grade_green: green,
            grade_teal: teal,
            grade_yellow: yellow,
            grade_orange: peach,
            grade_red: red,

            diff_added: green,
            diff_removed: red,
            diff_context: text,

            badge_critical: red,
            badge_major: peach,
            badge_minor: blue,
            badge_info: overlay1,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_ok: green,
            status_wait: lavender,
            status_alert: red,

            muted: overlay1,
            background: base,
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark()`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    pub fn grade_color(&self, token: ColorToken) -> Color {
        match token {
            ColorToken::Green => self.grade_green,
            ColorToken::Teal => self.grade_teal,
            ColorToken::Yellow => self.grade_yellow,
            ColorToken::Orange => self.grade_orange,
            ColorToken::Red => self.grade_red,
        }
    }

    pub fn state_color(&self, state: ReviewUiState) -> Color {
        match state {
            ReviewUiState::Ready | ReviewUiState::Done => self.status_ok,
            ReviewUiState::Analyzing | ReviewUiState::Empty => self.status_wait,
            ReviewUiState::Error | ReviewUiState::Unauth => self.status_alert,
        }
    }

    pub fn severity_color(&self, severity: IssueSeverity) -> Color {
        match severity {
            IssueSeverity::Critical => self.badge_critical,
            IssueSeverity::Major => self.badge_major,
            IssueSeverity::Minor => self.badge_minor,
            IssueSeverity::Info => self.badge_info,
        }
    }
}
