//! Validation report assembled from a batch outcome.

use std::cmp::Reverse;
use std::path::PathBuf;

use ilr_model::{RuleId, Severity, ViolationSummary};
use ilr_validate::BatchOutcome;
use serde::Serialize;

/// Where a run's inputs came from.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    pub batch: PathBuf,
    pub reference_dir: PathBuf,
    pub settings_version: String,
    pub academic_year: i32,
    pub ukprn: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub context: RunContext,
    pub summary: ViolationSummary,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// One line of the per-rule summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub count: usize,
}

impl ValidationReport {
    /// Builds the report, ordering violations by learner, rule and delivery so
    /// output does not depend on the worker count.
    pub fn new(context: RunContext, mut outcome: BatchOutcome) -> Self {
        outcome.violations.sort_by(|a, b| {
            (&a.learn_ref_number, &a.rule_id, a.aim_seq_number).cmp(&(
                &b.learn_ref_number,
                &b.rule_id,
                b.aim_seq_number,
            ))
        });
        outcome.diagnostics.sort_by_key(|d| d.record);
        let summary = outcome.summary();
        Self {
            context,
            summary,
            outcome,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.has_errors()
    }

    /// Errors first, then by descending count, then by rule id.
    pub fn rule_rows(&self) -> Vec<RuleRow> {
        let mut rows: Vec<RuleRow> = self
            .summary
            .by_rule
            .iter()
            .map(|(rule_id, tally)| RuleRow {
                rule_id: rule_id.clone(),
                severity: tally.severity,
                count: tally.count,
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.severity, Reverse(a.count), &a.rule_id).cmp(&(
                b.severity,
                Reverse(b.count),
                &b.rule_id,
            ))
        });
        rows
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
