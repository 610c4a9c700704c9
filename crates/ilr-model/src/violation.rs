use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{LearnRefNumber, RuleId};

/// Date format used in violation parameters.
pub const PARAMETER_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A named, already-formatted value carried by a violation for message templating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationParameter {
    pub name: String,
    pub value: String,
}

impl ViolationParameter {
    pub fn new(name: impl Into<String>, value: impl Display) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// Absent values are rendered as an empty string.
    pub fn optional<T: Display>(name: impl Into<String>, value: Option<T>) -> Self {
        Self {
            name: name.into(),
            value: value.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    pub fn date(name: impl Into<String>, value: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            value: value
                .map(|d| d.format(PARAMETER_DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

/// A rule failure for one learner, optionally scoped to one learning delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: RuleId,
    pub learn_ref_number: LearnRefNumber,
    pub aim_seq_number: Option<i64>,
    pub severity: Severity,
    /// Ordered as authored by the rule.
    pub parameters: Vec<ViolationParameter>,
}

impl Violation {
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Totals over a set of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationSummary {
    pub by_rule: BTreeMap<RuleId, RuleTally>,
    pub errors: usize,
    pub warnings: usize,
    pub learners: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleTally {
    pub severity: Severity,
    pub count: usize,
}

impl ViolationSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = Self::default();
        let mut learners = std::collections::BTreeSet::new();
        for violation in violations {
            summary
                .by_rule
                .entry(violation.rule_id.clone())
                .and_modify(|tally| tally.count += 1)
                .or_insert(RuleTally {
                    severity: violation.severity,
                    count: 1,
                });
            match violation.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
            learners.insert(&violation.learn_ref_number);
        }
        summary.learners = learners.len();
        summary
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
