//! Batch orchestration.
//!
//! [`BatchValidator::run`] evaluates every rule of a [`RuleSet`] against every
//! learner exactly once. Learners are independent: each worker pulls the next
//! learner index from a shared counter, buffers that learner's violations and
//! only publishes them once every rule has run for it. Cancellation is
//! checked between learners, so a cancelled outcome holds complete learners
//! only.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use ilr_derive::{CacheStats, DerivedCache, DerivedData};
use ilr_model::{LearnRefNumber, Learner, RuleId, Violation, ViolationSummary};
use serde::Serialize;
use tracing::{Span, debug, error, info, info_span, warn};

use crate::error::BatchError;
use crate::rule::{EvalContext, Rule};
use crate::rule_set::RuleSet;
use crate::sink::VecSink;

/// What to do when a rule panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectPolicy {
    /// Fail the whole batch with [`BatchError::Defect`].
    #[default]
    Abort,
    /// Drop the failing rule's output for that learner, record a
    /// [`Diagnostic`] and carry on.
    Quarantine,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// `1` evaluates on the calling thread.
    pub workers: usize,
    pub defect_policy: DefectPolicy,
    /// Memoize derived aggregations per learner.
    pub cache: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            defect_policy: DefectPolicy::Abort,
            cache: true,
        }
    }
}

impl BatchOptions {
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    #[must_use]
    pub fn with_defect_policy(mut self, policy: DefectPolicy) -> Self {
        self.defect_policy = policy;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }
}

/// Cooperative cancellation shared with the caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A rule defect: the rule panicked while evaluating a learner.
///
/// Diagnostics describe faults in the rule set, not in the data, and never
/// appear among the violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule_id: RuleId,
    pub learn_ref_number: LearnRefNumber,
    /// Index of the learner within the batch.
    pub record: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Violations of every complete learner. Order is unspecified when more
    /// than one worker ran.
    pub violations: Vec<Violation>,
    pub diagnostics: Vec<Diagnostic>,
    pub records_processed: usize,
    pub records_total: usize,
    pub cancelled: bool,
    pub cache: CacheStats,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn summary(&self) -> ViolationSummary {
        ViolationSummary::from_violations(&self.violations)
    }
}

#[derive(Debug)]
pub struct BatchValidator {
    rules: RuleSet,
    options: BatchOptions,
}

#[derive(Default)]
struct WorkerOutput {
    violations: Vec<Violation>,
    diagnostics: Vec<Diagnostic>,
    processed: usize,
    aborted: Option<Diagnostic>,
}

/// Shared state of one run.
struct RunState<'a> {
    learners: &'a [Learner],
    next: AtomicUsize,
    stop: AtomicBool,
    cancel: &'a CancellationToken,
    cache: Option<DerivedCache>,
}

impl BatchValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            options: BatchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn run(
        &self,
        learners: &[Learner],
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome, BatchError> {
        let workers = self.options.workers.clamp(1, learners.len().max(1));
        let span = info_span!(
            "batch",
            records = learners.len(),
            rules = self.rules.len(),
            workers
        );
        let _guard = span.enter();
        let started = Instant::now();

        info!(
            defect_policy = ?self.options.defect_policy,
            cache = self.options.cache,
            "batch started"
        );

        let state = RunState {
            learners,
            next: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            cancel,
            cache: self.options.cache.then(DerivedCache::new),
        };

        let outputs = if workers == 1 {
            vec![self.work(&state)]
        } else {
            self.work_parallel(&state, workers)?
        };

        let mut violations = Vec::new();
        let mut diagnostics = Vec::new();
        let mut processed = 0;
        let mut aborted = None;
        for output in outputs {
            violations.extend(output.violations);
            diagnostics.extend(output.diagnostics);
            processed += output.processed;
            if aborted.is_none() {
                aborted = output.aborted;
            }
        }

        if let Some(diagnostic) = aborted {
            error!(
                rule_id = %diagnostic.rule_id,
                learn_ref_number = %diagnostic.learn_ref_number,
                message = %diagnostic.message,
                "rule defect aborted batch"
            );
            return Err(BatchError::Defect(Box::new(diagnostic)));
        }

        let outcome = BatchOutcome {
            violations,
            diagnostics,
            records_processed: processed,
            records_total: learners.len(),
            cancelled: cancel.is_cancelled() && processed < learners.len(),
            cache: state.cache.as_ref().map(DerivedCache::stats).unwrap_or_default(),
            elapsed: started.elapsed(),
        };

        info!(
            processed = outcome.records_processed,
            violations = outcome.violations.len(),
            diagnostics = outcome.diagnostics.len(),
            cancelled = outcome.cancelled,
            cache_hits = outcome.cache.hits,
            cache_misses = outcome.cache.misses,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "batch complete"
        );
        Ok(outcome)
    }

    /// Evaluate a single learner without memoization.
    pub fn validate_learner(&self, learner: &Learner) -> Result<Vec<Violation>, BatchError> {
        let state = RunState {
            learners: std::slice::from_ref(learner),
            next: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            cancel: &CancellationToken::new(),
            cache: None,
        };
        let output = self.work(&state);
        match output.aborted {
            Some(diagnostic) => Err(BatchError::Defect(Box::new(diagnostic))),
            None => Ok(output.violations),
        }
    }

    fn work_parallel(
        &self,
        state: &RunState<'_>,
        workers: usize,
    ) -> Result<Vec<WorkerOutput>, BatchError> {
        let span = Span::current();
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for index in 0..workers {
                let handle = std::thread::Builder::new()
                    .name(format!("ilr-validate-{index}"))
                    .spawn_scoped(scope, || {
                        let _entered = span.enter();
                        self.work(state)
                    });
                match handle {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        state.stop.store(true, Ordering::SeqCst);
                        return Err(BatchError::Worker(e.to_string()));
                    }
                }
            }
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .map_err(|payload| BatchError::Worker(panic_message(payload.as_ref())))
                })
                .collect()
        })
    }

    fn work(&self, state: &RunState<'_>) -> WorkerOutput {
        let mut output = WorkerOutput::default();
        let mut record_sink = VecSink::new();
        let mut rule_sink = VecSink::new();

        loop {
            if state.cancel.is_cancelled() || state.stop.load(Ordering::SeqCst) {
                break;
            }
            let index = state.next.fetch_add(1, Ordering::SeqCst);
            let Some(learner) = state.learners.get(index) else {
                break;
            };

            let result = self.evaluate_record(
                index,
                learner,
                state.cache.as_ref(),
                &mut record_sink,
                &mut rule_sink,
                &mut output.diagnostics,
            );
            if let Some(cache) = &state.cache {
                cache.evict_record(index);
            }

            match result {
                Ok(()) => {
                    debug!(
                        learn_ref_number = %learner.learn_ref_number,
                        violations = record_sink.len(),
                        "learner evaluated"
                    );
                    record_sink.drain_into(&mut output.violations);
                    output.processed += 1;
                }
                Err(diagnostic) => {
                    state.stop.store(true, Ordering::SeqCst);
                    output.aborted = Some(diagnostic);
                    break;
                }
            }
        }
        output
    }

    /// Runs every rule for one learner into `record_sink`.
    ///
    /// Each rule reports into `rule_sink` first so a panicking rule's partial
    /// output can be discarded.
    fn evaluate_record(
        &self,
        index: usize,
        learner: &Learner,
        cache: Option<&DerivedCache>,
        record_sink: &mut VecSink,
        rule_sink: &mut VecSink,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), Diagnostic> {
        record_sink.clear();
        let ctx = EvalContext::new(
            self.rules.toolbox(),
            DerivedData::new(learner, index, cache),
        );

        for rule in self.rules.rules() {
            rule_sink.clear();
            let result = catch_unwind(AssertUnwindSafe(|| {
                rule.validate(&ctx, learner, &mut *rule_sink);
            }));
            match result {
                Ok(()) => record_sink.append(rule_sink),
                Err(payload) => {
                    let diagnostic = defect(rule, learner, index, payload.as_ref());
                    match self.options.defect_policy {
                        DefectPolicy::Abort => {
                            record_sink.clear();
                            return Err(diagnostic);
                        }
                        DefectPolicy::Quarantine => {
                            warn!(
                                rule_id = %diagnostic.rule_id,
                                learn_ref_number = %diagnostic.learn_ref_number,
                                message = %diagnostic.message,
                                "rule defect quarantined"
                            );
                            diagnostics.push(diagnostic);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn defect(
    rule: &dyn Rule,
    learner: &Learner,
    index: usize,
    payload: &(dyn Any + Send),
) -> Diagnostic {
    Diagnostic {
        rule_id: rule.id().clone(),
        learn_ref_number: learner.learn_ref_number.clone(),
        record: index,
        message: panic_message(payload),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}
