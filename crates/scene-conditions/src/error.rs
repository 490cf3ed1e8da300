//! Condition list errors.

/// Reasons a rule sequence is not a valid condition list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("condition list is empty")]
    Empty,

    #[error("last rule must be the catch-all, found predicate `{0}`")]
    MissingCatchAll(String),

    #[error("{0} rules highlight a selected feature; at most one is allowed")]
    MultipleHighlights(usize),
}
