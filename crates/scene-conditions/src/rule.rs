//! A single `(predicate, result)` rule.

use serde::{Deserialize, Serialize};

use crate::predicate;

/// One condition rule. On the wire a rule is a two-element array
/// `["<predicate>", "<result>"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ConditionRule {
    pub predicate: String,
    pub result: String,
}

impl ConditionRule {
    pub fn new(predicate: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            result: result.into(),
        }
    }

    /// The always-matching default rule.
    pub fn catch_all(result: impl Into<String>) -> Self {
        Self::new(predicate::CATCH_ALL, result)
    }

    /// A rule selecting exactly `feature_id`.
    pub fn highlight(feature_id: &str, result: impl Into<String>) -> Self {
        Self::new(predicate::feature_equals(feature_id), result)
    }

    pub fn is_catch_all(&self) -> bool {
        predicate::is_catch_all(&self.predicate)
    }

    /// The feature this rule highlights, if it is a selected-feature test.
    pub fn highlighted_feature(&self) -> Option<String> {
        predicate::parse_feature_equals(&self.predicate)
    }

    pub fn is_feature_highlight(&self) -> bool {
        self.highlighted_feature().is_some()
    }

    pub fn targets(&self, feature_id: &str) -> bool {
        self.highlighted_feature().as_deref() == Some(feature_id)
    }
}

impl From<(String, String)> for ConditionRule {
    fn from((predicate, result): (String, String)) -> Self {
        Self { predicate, result }
    }
}

impl From<ConditionRule> for (String, String) {
    fn from(rule: ConditionRule) -> Self {
        (rule.predicate, rule.result)
    }
}
