use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Where the host took the source text from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// The user's current editor selection.
    Selection,
    /// The whole active document.
    #[default]
    Document,
}

/// Source text delivered by the host in a `NEW_CODE` notification.
///
/// Replaced wholesale by the next notification; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePayload {
    pub code: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub language_id: String,
    #[serde(default)]
    pub mode: SourceMode,
}

impl SourcePayload {
    /// True when the payload carries something worth reviewing.
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

/// Target of an apply-to-editor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyScope {
    /// Replace the host's current selection.
    Selection,
    /// Replace the whole document.
    File,
}

/// The four scored review categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bug,
    Maintainability,
    Style,
    Security,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Bug,
        Category::Maintainability,
        Category::Style,
        Category::Security,
    ];

    /// Key used by the review service for this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::Maintainability => "maintainability",
            Category::Style => "style",
            Category::Security => "security",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Bug => "Bugs",
            Category::Maintainability => "Maintainability",
            Category::Style => "Style",
            Category::Security => "Security",
        }
    }
}

/// Per-category scores, each already clamped to `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub bug: u8,
    pub maintainability: u8,
    pub style: u8,
    pub security: u8,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Bug => self.bug,
            Category::Maintainability => self.maintainability,
            Category::Style => self.style,
            Category::Security => self.security,
        }
    }

    pub fn set(&mut self, category: Category, score: u8) {
        match category {
            Category::Bug => self.bug = score,
            Category::Maintainability => self.maintainability = score,
            Category::Style => self.style = score,
            Category::Security => self.security = score,
        }
    }
}

/// Reviewer comment for one category. Empty `text` means "no comment".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryComment {
    pub category: Category,
    pub text: String,
}

/// Severity attached to an individual issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Major,
    Minor,
    #[default]
    Info,
}

impl IssueSeverity {
    /// Parses a service-supplied severity; unknown values become `Info`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" | "blocker" => IssueSeverity::Critical,
            "major" | "high" | "error" => IssueSeverity::Major,
            "minor" | "medium" | "warning" => IssueSeverity::Minor,
            _ => IssueSeverity::Info,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueSeverity::Critical => "critical",
            IssueSeverity::Major => "major",
            IssueSeverity::Minor => "minor",
            IssueSeverity::Info => "info",
        }
    }
}

/// A single finding reported by the review service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub line: Option<u32>,
    pub message: String,
}

/// Canonical, render-safe review result.
///
/// Only ever produced by [`crate::normalize::normalize`], which always yields a
/// complete value. The session stores it behind an `Arc` and replaces it whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewResult {
    pub overall_score: u8,
    pub category_scores: CategoryScores,
    pub summary: Option<String>,
    pub category_comments: Vec<CategoryComment>,
    pub issues: Vec<Issue>,
    pub improved_code: Option<String>,
    pub raw: serde_json::Value,
}

impl ReviewResult {
    /// Improved code, if the service returned any non-blank text.
    pub fn improved_code(&self) -> Option<&str> {
        self.improved_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }

    pub fn comment(&self, category: Category) -> &str {
        self.category_comments
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }
}

/// Shared handle to an immutable result snapshot.
pub type SharedResult = Arc<ReviewResult>;

/// Opaque identifier of one submitted review request.
///
/// Tokens are drawn from a per-session counter that only ever increases, so a
/// larger token always denotes a later request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A review request built at submission time and handed to the review worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub token: RequestToken,
    pub code: String,
    pub model_id: String,
}

/// Pass-through status of the last apply-to-editor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    /// `APPLY_TEXT` sent; the host has not answered yet.
    Pending(ApplyScope),
    /// Host reported the text was written.
    Applied(ApplyScope),
    /// Host reported a failure, with its message when it gave one.
    Rejected(Option<String>),
}
