#![deny(unsafe_code)]

//! ILR validation.
//!
//! A [`Rule`] inspects one learner and reports into a [`ViolationSink`].
//! Rules are composed into a [`RuleSet`] against a [`Toolbox`] of reference
//! services, which fails fast when a rule needs something the toolbox does
//! not carry. [`BatchValidator`] then runs the set over a batch of learners.

pub mod engine;
pub mod error;
pub mod rule;
pub mod rule_set;
pub mod rules;
pub mod sink;
pub mod toolbox;

pub use engine::{
    BatchOptions, BatchOutcome, BatchValidator, CancellationToken, DefectPolicy, Diagnostic,
};
pub use error::{BatchError, CompositionError};
pub use rule::{EvalContext, Emission, Requirement, Rule, RuleBody, RuleDefinition};
pub use rule_set::RuleSet;
pub use rules::default_rules;
pub use sink::{SharedSink, VecSink, ViolationSink};
pub use toolbox::Toolbox;
