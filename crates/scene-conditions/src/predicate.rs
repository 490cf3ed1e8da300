//! Predicate expressions understood by the algebra.
//!
//! Only two predicate shapes carry meaning here: the catch-all literal and
//! the selected-feature equality test `${id} === "<feature id>"`. Every
//! other predicate is opaque and preserved verbatim.

use std::sync::OnceLock;

use regex_lite::Regex;

/// The catch-all predicate literal.
pub const CATCH_ALL: &str = "true";

fn feature_equals_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*\$\{id\}\s*===\s*("(?:[^"\\]|\\.)*")\s*$"#)
            .expect("feature equality pattern is valid")
    })
}

/// Whether `predicate` always matches.
pub fn is_catch_all(predicate: &str) -> bool {
    predicate.trim() == CATCH_ALL
}

/// Build the equality test selecting exactly `feature_id`.
pub fn feature_equals(feature_id: &str) -> String {
    // JSON string quoting doubles as the expression language's escaping.
    let quoted = serde_json::to_string(feature_id).unwrap_or_else(|_| format!("\"{}\"", feature_id));
    format!("${{id}} === {}", quoted)
}

/// The feature id a selected-feature equality test targets, if `predicate`
/// is one.
pub fn parse_feature_equals(predicate: &str) -> Option<String> {
    let captures = feature_equals_pattern().captures(predicate)?;
    serde_json::from_str(captures.get(1)?.as_str()).ok()
}
