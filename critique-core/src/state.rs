//! Review UI state, derived from session facts on every read.
//!
//! There is no stored state and no transition table: the UI state is a pure
//! function of the current [`SessionFacts`]. Fact combinations that look
//! contradictory (busy and errored at once) are resolved by rule order in
//! [`derive_state`], not forbidden.

/// Minimal projection of the session consumed by [`derive_state`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFacts {
    pub is_authenticated: bool,
    pub has_code: bool,
    pub is_busy: bool,
    pub has_result: bool,
    pub is_error: bool,
}

/// What the display should show for the session right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewUiState {
    Unauth,
    Empty,
    Ready,
    Analyzing,
    Done,
    Error,
}

impl ReviewUiState {
    pub fn label(self) -> &'static str {
        match self {
            ReviewUiState::Unauth => "SIGN IN",
            ReviewUiState::Empty => "NO CODE",
            ReviewUiState::Ready => "READY",
            ReviewUiState::Analyzing => "ANALYZING",
            ReviewUiState::Done => "DONE",
            ReviewUiState::Error => "ERROR",
        }
    }

    /// One-line hint telling the user what they can do next.
    pub fn hint(self) -> &'static str {
        match self {
            ReviewUiState::Unauth => "set api_key in config.toml or sign in from the editor",
            ReviewUiState::Empty => "send code from the editor to start",
            ReviewUiState::Ready => "press s to review",
            ReviewUiState::Analyzing => "waiting for the review service",
            ReviewUiState::Done => "a / A apply the improved code",
            ReviewUiState::Error => "review failed, press s to retry",
        }
    }
}

/// Derives the UI state. First matching rule wins; the order is load-bearing.
pub fn derive_state(facts: SessionFacts) -> ReviewUiState {
    if !facts.is_authenticated {
        ReviewUiState::Unauth
    } else if facts.is_busy {
        ReviewUiState::Analyzing
    } else if facts.is_error {
        ReviewUiState::Error
    } else if facts.has_result {
        ReviewUiState::Done
    } else if facts.has_code {
        ReviewUiState::Ready
    } else {
        ReviewUiState::Empty
    }
}
