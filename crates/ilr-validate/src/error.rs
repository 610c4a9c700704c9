#![deny(unsafe_code)]

use ilr_model::RuleId;

use crate::engine::Diagnostic;
use crate::rule::Requirement;

/// Raised while assembling a rule set, before any learner is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    #[error("rule {rule_id} requires {requirement}, which the toolbox does not provide")]
    MissingRequirement {
        rule_id: RuleId,
        requirement: Requirement,
    },

    #[error("rule {rule_id} is registered more than once")]
    DuplicateRule { rule_id: RuleId },
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("rule {} failed on learner {}: {}", .0.rule_id, .0.learn_ref_number, .0.message)]
    Defect(Box<Diagnostic>),

    #[error("failed to spawn validation worker: {0}")]
    Worker(String),
}
