//! Violation sinks.

use ilr_model::{LearnRefNumber, RuleId, Severity, Violation, ViolationParameter};
use parking_lot::Mutex;

/// Receives the violations a rule reports. Reporting never halts other rules.
pub trait ViolationSink {
    /// Builds the violation, appends it and hands back a copy.
    fn handle(
        &mut self,
        rule_id: &RuleId,
        learn_ref_number: &LearnRefNumber,
        aim_seq_number: Option<i64>,
        severity: Severity,
        parameters: Vec<ViolationParameter>,
    ) -> Violation;
}

fn build(
    rule_id: &RuleId,
    learn_ref_number: &LearnRefNumber,
    aim_seq_number: Option<i64>,
    severity: Severity,
    parameters: Vec<ViolationParameter>,
) -> Violation {
    Violation {
        rule_id: rule_id.clone(),
        learn_ref_number: learn_ref_number.clone(),
        aim_seq_number,
        severity,
        parameters,
    }
}

/// Single-owner sink in discovery order.
#[derive(Debug, Default)]
pub struct VecSink {
    violations: Vec<Violation>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn clear(&mut self) {
        self.violations.clear();
    }

    /// Moves every violation buffered in `other` to the end of this sink.
    pub fn append(&mut self, other: &mut Self) {
        self.violations.append(&mut other.violations);
    }

    /// Moves every buffered violation to the end of `target`.
    pub fn drain_into(&mut self, target: &mut Vec<Violation>) {
        target.append(&mut self.violations);
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl ViolationSink for VecSink {
    fn handle(
        &mut self,
        rule_id: &RuleId,
        learn_ref_number: &LearnRefNumber,
        aim_seq_number: Option<i64>,
        severity: Severity,
        parameters: Vec<ViolationParameter>,
    ) -> Violation {
        let violation = build(
            rule_id,
            learn_ref_number,
            aim_seq_number,
            severity,
            parameters,
        );
        self.violations.push(violation.clone());
        violation
    }
}

/// Append-only sink shared between threads.
///
/// Report through a shared reference: `let mut sink = &shared;`.
#[derive(Debug, Default)]
pub struct SharedSink {
    violations: Mutex<Vec<Violation>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.lock().extend(violations);
    }

    pub fn len(&self) -> usize {
        self.violations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.lock().is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations.into_inner()
    }
}

impl ViolationSink for &SharedSink {
    fn handle(
        &mut self,
        rule_id: &RuleId,
        learn_ref_number: &LearnRefNumber,
        aim_seq_number: Option<i64>,
        severity: Severity,
        parameters: Vec<ViolationParameter>,
    ) -> Violation {
        let violation = build(
            rule_id,
            learn_ref_number,
            aim_seq_number,
            severity,
            parameters,
        );
        self.violations.lock().push(violation.clone());
        violation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(sink: &mut dyn ViolationSink, learner: &str, seq: Option<i64>) -> Violation {
        sink.handle(
            &RuleId::from_static("Test_01"),
            &LearnRefNumber::new(learner).unwrap(),
            seq,
            Severity::Error,
            vec![
                ViolationParameter::new("FundModel", 25),
                ViolationParameter::optional("ProgType", None::<i32>),
            ],
        )
    }

    #[test]
    fn vec_sink_keeps_parameter_order() {
        let mut sink = VecSink::new();
        report(&mut sink, "L1", Some(1));
        let violation = &sink.violations()[0];
        let names: Vec<_> = violation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["FundModel", "ProgType"]);
        assert_eq!(violation.parameter("ProgType"), Some(""));
        assert_eq!(violation.aim_seq_number, Some(1));
    }

    #[test]
    fn handle_returns_the_appended_violation() {
        let mut sink = VecSink::new();
        let returned = report(&mut sink, "L7", Some(3));
        assert_eq!(returned.learn_ref_number.as_str(), "L7");
        assert_eq!(returned.rule_id.as_str(), "Test_01");
        assert_eq!(sink.violations(), [returned]);

        let shared = SharedSink::new();
        let returned = report(&mut &shared, "L8", None);
        assert_eq!(shared.into_violations(), [returned]);
    }

    #[test]
    fn vec_sink_never_deduplicates() {
        let mut sink = VecSink::new();
        report(&mut sink, "L1", None);
        report(&mut sink, "L1", None);
        assert_eq!(sink.len(), 2);
        let mut target = Vec::new();
        sink.drain_into(&mut target);
        assert!(sink.is_empty());
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn shared_sink_collects_across_threads() {
        let shared = SharedSink::new();
        std::thread::scope(|scope| {
            for worker in 0..4 {
                let shared = &shared;
                scope.spawn(move || {
                    let mut sink = shared;
                    for _ in 0..25 {
                        report(&mut sink, &format!("L{worker}"), None);
                    }
                });
            }
        });
        assert_eq!(shared.into_violations().len(), 100);
    }
}
