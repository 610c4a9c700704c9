use ilr_derive::marker_codes;
use ilr_model::{Learner, LearningDelivery, ViolationParameter};
use ilr_reference::SettingKey;

use super::LDM;
use crate::rule::{EvalContext, Requirement, RuleDefinition, no_deliveries};

const VALID_CODES: &str = "LearnDelFAMType_LdmValid.valid_codes";

/// LearnDelFAMType_LdmValid: every LDM code must be on the valid list.
pub fn learn_del_fam_type_ldm_valid() -> RuleDefinition {
    RuleDefinition::delivery("LearnDelFAMType_LdmValid", condition, parameters)
        .with_description("LDM code is not valid")
        .requiring(Requirement::Setting(SettingKey::CodeSet(VALID_CODES)))
        .excluding_learner(no_deliveries)
}

fn first_invalid<'a>(ctx: &EvalContext<'_>, delivery: &'a LearningDelivery) -> Option<&'a str> {
    let valid = ctx.settings().code_set(VALID_CODES)?;
    marker_codes(delivery.markers(), LDM).find(|code| !valid.contains(*code))
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    first_invalid(ctx, delivery).is_some()
}

fn parameters(
    ctx: &EvalContext<'_>,
    _learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::new("LearnDelFAMType", LDM),
        ViolationParameter::optional("LearnDelFAMCode", first_invalid(ctx, delivery)),
    ]
}
