use ilr_model::{Learner, LearningDelivery, ViolationParameter};
use ilr_reference::SettingKey;
use ilr_reference::postcodes::normalize_postcode;

use crate::rule::{EvalContext, Requirement, RuleDefinition, no_deliveries};

const EXEMPT_POSTCODES: &str = "DelLocPostCode_Valid.exempt_postcodes";

/// DelLocPostCode_Valid: the delivery location postcode must exist and be
/// effective on the learning start date.
pub fn del_loc_postcode_valid() -> RuleDefinition {
    RuleDefinition::delivery("DelLocPostCode_Valid", condition, parameters)
        .with_description("Delivery location postcode is not valid on the start date")
        .requiring(Requirement::Postcodes)
        .requiring(Requirement::Setting(SettingKey::CodeSet(EXEMPT_POSTCODES)))
        .excluding_learner(no_deliveries)
        .excluding_delivery(exclude)
}

fn exclude(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let Some(postcode) = delivery.del_loc_postcode.as_deref() else {
        return true;
    };
    let postcode = normalize_postcode(postcode);
    postcode.is_empty()
        || ctx
            .settings()
            .code_set(EXEMPT_POSTCODES)
            .is_some_and(|exempt| exempt.contains(&postcode))
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let (Some(postcodes), Some(postcode)) = (
        ctx.toolbox().postcodes(),
        delivery.del_loc_postcode.as_deref(),
    ) else {
        return false;
    };
    postcodes
        .lookup(postcode)
        .is_none_or(|record| !record.is_effective_on(delivery.learn_start_date))
}

fn parameters(
    _ctx: &EvalContext<'_>,
    _learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::optional("DelLocPostCode", delivery.del_loc_postcode.as_deref()),
        ViolationParameter::date("LearnStartDate", Some(delivery.learn_start_date)),
    ]
}
