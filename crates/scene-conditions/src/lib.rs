//! Condition-list algebra for tileset highlight styling.
//!
//! A condition list is an ordered, first-match-wins sequence of
//! `(predicate, result)` rules whose last rule is the catch-all. Selection
//! highlighting adds or strips exactly one selected-feature rule at the front
//! while leaving every rule inserted by other features untouched.

mod error;
mod predicate;
mod rule;

pub use error::ConditionError;
pub use predicate::{feature_equals, is_catch_all, parse_feature_equals, CATCH_ALL};
pub use rule::ConditionRule;

use serde::{Deserialize, Serialize};

/// Whether any rule already highlights `feature_id`.
pub fn targets_feature(rules: &[ConditionRule], feature_id: &str) -> bool {
    rules.iter().any(|rule| rule.targets(feature_id))
}

/// `rules` without any selected-feature highlight rule, order preserved.
pub fn strip_feature_highlights(rules: &[ConditionRule]) -> Vec<ConditionRule> {
    rules
        .iter()
        .filter(|rule| !rule.is_feature_highlight())
        .cloned()
        .collect()
}

/// A validated condition list: non-empty, catch-all last, at most one
/// selected-feature highlight rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ConditionRule>", into = "Vec<ConditionRule>")]
pub struct ConditionList(Vec<ConditionRule>);

impl ConditionList {
    /// Validate an existing rule sequence.
    pub fn new(rules: Vec<ConditionRule>) -> Result<Self, ConditionError> {
        check(&rules)?;
        Ok(Self(rules))
    }

    /// The single catch-all list.
    pub fn catch_all(result: impl Into<String>) -> Self {
        Self(vec![ConditionRule::catch_all(result)])
    }

    /// Coerce arbitrary rules into a valid list.
    ///
    /// An empty sequence becomes the single catch-all rule; a sequence not
    /// ending in the catch-all gets one appended. Highlight rules past the
    /// first are dropped.
    pub fn normalized(rules: Vec<ConditionRule>, catch_all_result: &str) -> Self {
        let mut seen_highlight = false;
        let mut rules: Vec<ConditionRule> = rules
            .into_iter()
            .filter(|rule| {
                if !rule.is_feature_highlight() {
                    return true;
                }
                !std::mem::replace(&mut seen_highlight, true)
            })
            .collect();
        if !rules.last().is_some_and(ConditionRule::is_catch_all) {
            rules.push(ConditionRule::catch_all(catch_all_result));
        }
        Self(rules)
    }

    /// `[highlight(feature_id), ...rest]`, with any stale highlight in
    /// `rest` stripped and the catch-all guaranteed last.
    pub fn with_highlight(
        feature_id: &str,
        highlight_result: &str,
        rest: &[ConditionRule],
        catch_all_result: &str,
    ) -> Self {
        let mut rules = Vec::with_capacity(rest.len() + 1);
        rules.push(ConditionRule::highlight(feature_id, highlight_result));
        rules.extend(strip_feature_highlights(rest));
        Self::normalized(rules, catch_all_result)
    }

    pub fn rules(&self) -> &[ConditionRule] {
        &self.0
    }

    pub fn into_rules(self) -> Vec<ConditionRule> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a condition list holds at least the catch-all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The feature currently highlighted by this list.
    pub fn highlighted_feature(&self) -> Option<String> {
        self.0.iter().find_map(ConditionRule::highlighted_feature)
    }

    pub fn targets_feature(&self, feature_id: &str) -> bool {
        targets_feature(&self.0, feature_id)
    }

    /// First rule matching a feature.
    ///
    /// Opaque predicates cannot be evaluated here and never match, so the
    /// answer is exact only for lists made of highlight and catch-all rules.
    pub fn first_match(&self, feature_id: &str) -> Option<&ConditionRule> {
        self.0
            .iter()
            .find(|rule| rule.is_catch_all() || rule.targets(feature_id))
    }
}

impl TryFrom<Vec<ConditionRule>> for ConditionList {
    type Error = ConditionError;

    fn try_from(rules: Vec<ConditionRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<ConditionList> for Vec<ConditionRule> {
    fn from(list: ConditionList) -> Self {
        list.0
    }
}

fn check(rules: &[ConditionRule]) -> Result<(), ConditionError> {
    let last = rules.last().ok_or(ConditionError::Empty)?;
    if !last.is_catch_all() {
        return Err(ConditionError::MissingCatchAll(last.predicate.clone()));
    }
    let highlights = rules.iter().filter(|rule| rule.is_feature_highlight()).count();
    if highlights > 1 {
        return Err(ConditionError::MultipleHighlights(highlights));
    }
    Ok(())
}
