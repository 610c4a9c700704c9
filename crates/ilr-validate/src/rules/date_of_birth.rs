use ilr_derive::has_any_marker_code;
use ilr_model::{Learner, LearningDelivery, ViolationParameter};
use ilr_reference::SettingKey;

use super::{FUND_MODEL_16_19, LDM};
use crate::rule::{EvalContext, Requirement, RuleDefinition};

const MIN_AGE: &str = "DateOfBirth_48.min_age";
const EXEMPT_LDM: &str = "DateOfBirth_48.exempt_ldm";

/// DateOfBirth_48: 16-19 funding for a learner at or above the age limit on
/// 31 August of the academic year, unless an exempting LDM code is recorded.
pub fn date_of_birth_48() -> RuleDefinition {
    RuleDefinition::delivery("DateOfBirth_48", condition, parameters)
        .with_description("Learner is too old for 16-19 funding")
        .requiring(Requirement::Setting(SettingKey::Threshold(MIN_AGE)))
        .requiring(Requirement::Setting(SettingKey::CodeSet(EXEMPT_LDM)))
        .excluding_learner(exclude_learner)
        .excluding_delivery(exclude)
}

fn exclude_learner(_ctx: &EvalContext<'_>, learner: &Learner) -> bool {
    learner.date_of_birth.is_none() || !learner.has_deliveries()
}

fn exclude(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    ctx.settings()
        .code_set(EXEMPT_LDM)
        .is_some_and(|codes| has_any_marker_code(delivery.markers(), LDM, codes))
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let Some(min_age) = ctx.settings().threshold(MIN_AGE) else {
        return false;
    };
    delivery.fund_model == Some(FUND_MODEL_16_19)
        && i64::from(ctx.derived().age_at_academic_year_start(ctx.calendar())) >= min_age
}

fn parameters(
    _ctx: &EvalContext<'_>,
    learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::optional("FundModel", delivery.fund_model),
        ViolationParameter::date("DateOfBirth", learner.date_of_birth),
    ]
}
