//! Syntax highlighting for the code panel and line diffs for improved code.
//!
//! Both are computed once when the underlying data changes (new payload, new
//! result) and cached in `AppState`, never on the render path.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Editor language ids whose syntect name differs from the id.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("typescript", "js"),
    ("typescriptreact", "js"),
    ("javascriptreact", "js"),
    ("shellscript", "sh"),
    ("csharp", "cs"),
    ("objective-c", "m"),
    ("plaintext", "txt"),
];

/// Picks a syntax from the host's language id, then the file extension.
fn find_syntax(language_id: &str, file_path: &str) -> &'static SyntaxReference {
    let by_language = if language_id.is_empty() {
        None
    } else {
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(id, _)| *id == language_id)
            .map(|(_, token)| *token)
            .unwrap_or(language_id);
        PS.find_syntax_by_token(token)
    };
    by_language
        .or_else(|| {
            file_path
                .rsplit_once('.')
                .and_then(|(_, ext)| PS.find_syntax_by_extension(ext))
        })
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Converts a syntect `(Style, &str)` pair to an owned ratatui `Span`.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::Color as SC;
    use syntect::highlighting::FontStyle;
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 { Some(Color::Rgb(c.r, c.g, c.b)) } else { None }
    };
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Highlights `code` line by line. Each inner `Vec` is one source line.
///
/// Background colours from the syntect theme are dropped so the terminal
/// theme shows through. Lines that fail to highlight are kept as plain text.
pub fn highlight_code(code: &str, language_id: &str, file_path: &str) -> Vec<Vec<Span<'static>>> {
    let syntax = find_syntax(language_id, file_path);
    let theme = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next());
    let Some(theme) = theme else {
        return code.lines().map(|l| vec![Span::raw(l.to_owned())]).collect();
    };

    let mut h = HighlightLines::new(syntax, theme);
    code.split_inclusive('\n')
        .map(|line| {
            let plain = line.trim_end_matches(['\n', '\r']);
            match h.highlight_line(line, &PS) {
                Ok(ranges) => ranges
                    .into_iter()
                    .map(|(style, text)| syntect_to_span(style, text.trim_end_matches(['\n', '\r'])))
                    .filter(|span| !span.content.is_empty())
                    .collect(),
                Err(_) => vec![Span::raw(plain.to_owned())],
            }
        })
        .collect()
}

/// One row of the improved-code diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub tag: ChangeTag,
    /// `(emphasized, text)` segments; emphasized marks words that changed.
    pub segments: Vec<(bool, String)>,
}

/// Line diff from `old` to `new` with word-level emphasis on changed lines.
pub fn improved_code_diff(old: &str, new: &str) -> Vec<DiffRow> {
    let diff = TextDiff::from_lines(old, new);
    let mut rows = Vec::new();
    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            let segments = change
                .iter_strings_lossy()
                .map(|(emphasized, value)| {
                    (emphasized, value.trim_end_matches(['\n', '\r']).to_owned())
                })
                .filter(|(_, text)| !text.is_empty())
                .collect();
            rows.push(DiffRow { tag: change.tag(), segments });
        }
    }
    rows
}

/// True when the diff contains at least one inserted or deleted line.
pub fn has_changes(rows: &[DiffRow]) -> bool {
    rows.iter().any(|r| r.tag != ChangeTag::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_source_line() {
        let lines = highlight_code("fn main() {\n    let x = 1;\n}\n", "rust", "src/main.rs");
        assert_eq!(lines.len(), 3);
        let text: String = lines[1].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "    let x = 1;");
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let lines = highlight_code("just words", "no-such-language", "notes");
        let text: String = lines[0].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "just words");
        assert_eq!(find_syntax("", "a.py").name, "Python");
        assert_eq!(find_syntax("", "README").name, "Plain Text");
    }

    #[test]
    fn diff_marks_changed_lines() {
        let rows = improved_code_diff("a = 1\nb = 2\n", "a = 1\nb = 3\n");
        let tags: Vec<ChangeTag> = rows.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec![ChangeTag::Equal, ChangeTag::Delete, ChangeTag::Insert]);
        assert!(has_changes(&rows));
        assert!(rows[2].segments.iter().any(|(emph, text)| *emph && text.contains('3')));
    }

    #[test]
    fn identical_code_has_no_changes() {
        let rows = improved_code_diff("x\n", "x\n");
        assert!(!has_changes(&rows));
    }
}
