use ilr_derive::has_marker_type;
use ilr_model::{Learner, LearningDelivery, ViolationParameter};
use ilr_reference::SettingKey;

use super::ACT;
use crate::rule::{EvalContext, Requirement, RuleDefinition, no_deliveries};

const CUTOFF: &str = "LearnStartDate_14.cutoff";

/// LearnStartDate_14: apprenticeships starting on or after the cutoff must
/// record an apprenticeship contract type (ACT) marker. Component aims are
/// dated by the start of their programme (DD04).
pub fn learn_start_date_14() -> RuleDefinition {
    RuleDefinition::delivery("LearnStartDate_14", condition, parameters)
        .with_description("Apprenticeship started after the cutoff has no ACT record")
        .requiring(Requirement::Setting(SettingKey::Date(CUTOFF)))
        .excluding_learner(no_deliveries)
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let Some(cutoff) = ctx.settings().date(CUTOFF) else {
        return false;
    };
    if !ctx.derived().is_apprenticeship(delivery) || has_marker_type(delivery.markers(), ACT) {
        return false;
    }
    let programme_start = ctx
        .derived()
        .earliest_programme_start(delivery)
        .map_or(delivery.learn_start_date, |aim| aim.date);
    programme_start >= cutoff
}

fn parameters(
    _ctx: &EvalContext<'_>,
    _learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::date("LearnStartDate", Some(delivery.learn_start_date)),
        ViolationParameter::optional("ProgType", delivery.prog_type),
        ViolationParameter::new("LearnDelFAMType", ACT),
    ]
}
