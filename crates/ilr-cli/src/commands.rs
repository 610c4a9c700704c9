use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use ilr_cli::report::{RunContext, ValidationReport};
use ilr_model::LearnerBatch;
use ilr_reference::ReferenceRegistry;
use ilr_reference::paths::reference_root;
use ilr_validate::rules::definitions;
use ilr_validate::{
    BatchOptions, BatchValidator, CancellationToken, RuleSet, Toolbox, default_rules,
};
use tracing::{info, info_span};

use crate::cli::{ReferenceArgs, ValidateArgs};
use crate::summary::{print_reference, print_rules, print_summary};

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let span = info_span!("validate", batch = %args.batch.display());
    let _guard = span.enter();

    let reference_dir = resolve_reference_dir(args.reference_dir.as_ref());
    let (reference, _) = ReferenceRegistry::verify_and_load(&reference_dir)
        .with_context(|| format!("load reference data from {}", reference_dir.display()))?;

    let batch = LearnerBatch::from_path(&args.batch)
        .with_context(|| format!("read learner batch {}", args.batch.display()))?;
    let ukprn = args.ukprn.or(batch.ukprn);
    info!(learners = batch.len(), ukprn = ?ukprn, "batch loaded");

    let toolbox = Toolbox::from_reference(&reference).with_ukprn(ukprn);
    let rules = RuleSet::compose(Arc::new(toolbox), default_rules())
        .context("compose rule set (a provider UKPRN is required, see --ukprn)")?;

    let options = BatchOptions::default()
        .with_workers(args.workers)
        .with_defect_policy(args.on_defect.into())
        .with_cache(!args.no_cache);
    let validator = BatchValidator::new(rules).with_options(options);
    let outcome = validator
        .run(&batch.learners, &CancellationToken::new())
        .context("validate batch")?;

    let settings = &reference.settings;
    let report = ValidationReport::new(
        RunContext {
            batch: args.batch.clone(),
            reference_dir,
            settings_version: settings.version().to_string(),
            academic_year: settings.academic_year(),
            ukprn,
        },
        outcome,
    );

    if args.json {
        println!("{}", report.to_json().context("serialize report")?);
    } else {
        print_summary(&report, validator.rules());
    }
    Ok(report)
}

pub fn run_rules() -> Result<()> {
    print_rules(&definitions());
    Ok(())
}

pub fn run_reference(args: &ReferenceArgs) -> Result<()> {
    let reference_dir = resolve_reference_dir(args.dir.as_ref());
    let (_, summary) = ReferenceRegistry::verify_and_load(&reference_dir)
        .with_context(|| format!("verify reference data in {}", reference_dir.display()))?;
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
        println!("{json}");
    } else {
        print_reference(&summary);
    }
    Ok(())
}

fn resolve_reference_dir(explicit: Option<&PathBuf>) -> PathBuf {
    explicit.cloned().unwrap_or_else(reference_root)
}
