//! Converts loosely-shaped review service responses into a [`ReviewResult`].
//!
//! The service's response shape is not contractually fixed, so every field is
//! looked up through an ordered list of candidate paths and the first usable
//! value wins. Normalization never fails: anything missing or malformed falls
//! back to `0`, an empty string, or an empty list.

use serde_json::{Map, Value};

use crate::types::{
    Category, CategoryComment, CategoryScores, Issue, IssueSeverity, ReviewResult,
};

const SCORE_PATHS: &[&[&str]] = &[
    &["scores_by_category"],
    &["body", "scores_by_category"],
    &["review_details", "scores_by_category"],
];

const OVERALL_PATHS: &[&[&str]] = &[&["quality_score"]];

const COMMENT_PATHS: &[&[&str]] = &[
    &["comments_by_category"],
    &["review_details", "comments_by_category"],
    &["body", "comments_by_category"],
    &["category_comments"],
];

const SUMMARY_PATHS: &[&[&str]] = &[&["summary"], &["review_summary"]];

const ISSUE_PATHS: &[&[&str]] = &[
    &["issues"],
    &["review_details", "issues"],
    &["body", "issues"],
];

const IMPROVED_CODE_PATHS: &[&[&str]] = &[
    &["improved_code"],
    &["body", "improved_code"],
    &["review_details", "improved_code"],
    &["improvedCode"],
];

/// Normalizes an arbitrary service response. Total: never panics, never errors.
pub fn normalize(raw: &Value) -> ReviewResult {
    let doc = unwrap_embedded(raw);

    let mut category_scores = CategoryScores::default();
    if let Some(scores) = first_object(&doc, SCORE_PATHS) {
        for category in Category::ALL {
            category_scores.set(category, score_of(scores.get(category.key())));
        }
    }

    let overall_score = OVERALL_PATHS
        .iter()
        .find_map(|path| lookup(&doc, path))
        .map(|v| score_of(Some(v)))
        .unwrap_or(0);

    let comments = first_object(&doc, COMMENT_PATHS);
    let category_comments = Category::ALL
        .iter()
        .map(|&category| CategoryComment {
            category,
            text: comments
                .and_then(|c| c.get(category.key()))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_owned())
                .unwrap_or_default(),
        })
        .collect();

    let summary = SUMMARY_PATHS
        .iter()
        .find_map(|path| lookup(&doc, path).filter(|v| !v.is_null()))
        .map(readable);

    let issues = ISSUE_PATHS
        .iter()
        .find_map(|path| lookup(&doc, path).and_then(Value::as_array))
        .map(|items| items.iter().filter_map(issue_of).collect())
        .unwrap_or_default();

    let improved_code = IMPROVED_CODE_PATHS.iter().find_map(|path| {
        lookup(&doc, path)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_owned)
    });

    ReviewResult {
        overall_score,
        category_scores,
        summary,
        category_comments,
        issues,
        improved_code,
        raw: raw.clone(),
    }
}

/// Parses JSON that arrives as text: a top-level string, or a string `body`.
fn unwrap_embedded(raw: &Value) -> Value {
    let mut doc = match raw {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| raw.clone()),
        other => other.clone(),
    };
    if let Some(obj) = doc.as_object_mut() {
        let parsed = obj
            .get("body")
            .and_then(Value::as_str)
            .and_then(|text| serde_json::from_str::<Value>(text).ok());
        if let Some(body) = parsed {
            obj.insert("body".to_owned(), body);
        }
    }
    doc
}

fn lookup<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| node.as_object()?.get(*key))
}

fn first_object<'a>(doc: &'a Value, paths: &[&[&str]]) -> Option<&'a Map<String, Value>> {
    paths
        .iter()
        .find_map(|path| lookup(doc, path).and_then(Value::as_object))
}

/// Coerces a score to `0..=100`, rounding half away from zero.
fn score_of(value: Option<&Value>) -> u8 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => n.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

fn readable(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn issue_of(value: &Value) -> Option<Issue> {
    match value {
        Value::String(message) if !message.trim().is_empty() => Some(Issue {
            severity: IssueSeverity::Info,
            line: None,
            message: message.trim().to_owned(),
        }),
        Value::Object(obj) => {
            let message = ["message", "description", "text"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())?;
            let severity = obj
                .get("severity")
                .and_then(Value::as_str)
                .map(IssueSeverity::parse)
                .unwrap_or_default();
            let line = obj
                .get("line")
                .and_then(Value::as_u64)
                .filter(|&l| l > 0)
                .and_then(|l| u32::try_from(l).ok());
            Some(Issue {
                severity,
                line,
                message: message.to_owned(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn scores(bug: u8, maintainability: u8, style: u8, security: u8) -> CategoryScores {
        CategoryScores { bug, maintainability, style, security }
    }

    #[test]
    fn garbage_inputs_yield_complete_defaults() {
        let inputs = [
            json!(null),
            json!({}),
            json!([]),
            json!([1, 2, {"scores_by_category": {"bug": 80}}]),
            json!("not json at all"),
            json!(42),
            json!({"scores_by_category": "high", "quality_score": {"nested": true}}),
            json!({"a": {"b": {"c": {"d": [null, {"e": []}]}}}}),
            json!({"body": "{broken json"}),
        ];
        for raw in inputs {
            let result = normalize(&raw);
            assert_eq!(result.overall_score, 0, "input {raw}");
            assert_eq!(result.category_scores, CategoryScores::default(), "input {raw}");
            assert_eq!(result.category_comments.len(), 4);
            assert!(result.category_comments.iter().all(|c| c.text.is_empty()));
            assert!(result.issues.is_empty());
            assert_eq!(result.improved_code, None);
            assert_eq!(result.raw, raw);
        }
    }

    #[test]
    fn clamps_out_of_range_scores() {
        let raw = json!({"quality_score": 150, "scores_by_category": {"bug": -5}});
        let result = normalize(&raw);
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.category_scores, scores(0, 0, 0, 0));
    }

    #[test]
    fn in_range_scores_are_unchanged() {
        let raw = json!({
            "scores_by_category": {"bug": 100, "maintainability": 0, "style": 50, "security": 75}
        });
        assert_eq!(normalize(&raw).category_scores, scores(100, 0, 50, 75));
    }

    #[test]
    fn coerces_and_rounds() {
        let raw = json!({
            "quality_score": "72.5",
            "scores_by_category": {"bug": 49.4, "maintainability": "88", "style": true, "security": "NaN"}
        });
        let result = normalize(&raw);
        assert_eq!(result.overall_score, 73);
        assert_eq!(result.category_scores, scores(49, 88, 0, 0));
    }

    #[test]
    fn top_level_scores_win_over_nested_alternates() {
        let raw = json!({
            "scores_by_category": {"bug": 10},
            "body": {"scores_by_category": {"bug": 20}},
            "review_details": {"scores_by_category": {"bug": 30}}
        });
        assert_eq!(normalize(&raw).category_scores.bug, 10);

        let raw = json!({
            "review_details": {"scores_by_category": {"bug": 30}},
            "body": {"scores_by_category": {"bug": 20}}
        });
        assert_eq!(normalize(&raw).category_scores.bug, 20);

        let raw = json!({"review_details": {"scores_by_category": {"bug": 30}}});
        assert_eq!(normalize(&raw).category_scores.bug, 30);
    }

    #[test]
    fn non_object_candidate_is_skipped() {
        let raw = json!({
            "scores_by_category": [1, 2],
            "review_details": {"scores_by_category": {"security": 64}}
        });
        assert_eq!(normalize(&raw).category_scores.security, 64);
    }

    #[test]
    fn parses_string_body_envelope() {
        let body = json!({
            "scores_by_category": {"style": 91},
            "improved_code": "fn main() {}\n"
        })
        .to_string();
        let raw = json!({"statusCode": 200, "body": body});
        let result = normalize(&raw);
        assert_eq!(result.category_scores.style, 91);
        assert_eq!(result.improved_code.as_deref(), Some("fn main() {}\n"));
    }

    #[test]
    fn comments_fill_every_category() {
        let raw = json!({
            "review_details": {
                "comments_by_category": {"bug": "Off-by-one in loop", "style": 3}
            }
        });
        let result = normalize(&raw);
        assert_eq!(result.comment(Category::Bug), "Off-by-one in loop");
        assert_eq!(result.comment(Category::Style), "");
        assert_eq!(result.comment(Category::Security), "");
        let order: Vec<Category> = result.category_comments.iter().map(|c| c.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn summary_falls_back_and_serializes_non_strings() {
        let raw = json!({"review_summary": "Looks fine"});
        assert_eq!(normalize(&raw).summary.as_deref(), Some("Looks fine"));

        let raw = json!({"summary": {"verdict": "ok"}});
        let summary = normalize(&raw).summary.unwrap();
        assert!(summary.contains("\"verdict\""));
        assert!(summary.contains("\"ok\""));

        let raw = json!({"summary": null, "review_summary": 7});
        assert_eq!(normalize(&raw).summary.as_deref(), Some("7"));
    }

    #[test]
    fn issues_accept_strings_and_objects() {
        let raw = json!({
            "issues": [
                "Unused variable",
                {"severity": "HIGH", "line": 12, "description": "SQL built by concatenation"},
                {"severity": "weird", "message": "  "},
                {"line": -3, "message": "Negative line dropped"},
                17
            ]
        });
        let issues = normalize(&raw).issues;
        assert_eq!(
            issues,
            vec![
                Issue { severity: IssueSeverity::Info, line: None, message: "Unused variable".into() },
                Issue {
                    severity: IssueSeverity::Major,
                    line: Some(12),
                    message: "SQL built by concatenation".into(),
                },
                Issue {
                    severity: IssueSeverity::Info,
                    line: None,
                    message: "Negative line dropped".into(),
                },
            ]
        );
    }

    #[test]
    fn blank_improved_code_is_ignored() {
        let raw = json!({"improved_code": "   ", "improvedCode": "x = 1"});
        assert_eq!(normalize(&raw).improved_code.as_deref(), Some("x = 1"));
    }
}
