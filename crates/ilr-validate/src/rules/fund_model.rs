use ilr_model::{Learner, LearningDelivery, ViolationParameter};

use super::FUND_MODEL_ESF;
use crate::rule::{EvalContext, Requirement, RuleDefinition};

/// FundModel_ContractAge: for ESF funding the learner's age at the contract
/// start must lie within the contract allocation's age limits. Only aims
/// starting while the contract is active are checked.
pub fn fund_model_contract_age() -> RuleDefinition {
    RuleDefinition::delivery("FundModel_ContractAge", condition, parameters)
        .with_description("Learner age at contract start is outside the contract limits")
        .requiring(Requirement::Fcs)
        .excluding_learner(exclude_learner)
        .excluding_delivery(exclude)
}

fn exclude_learner(_ctx: &EvalContext<'_>, learner: &Learner) -> bool {
    learner.date_of_birth.is_none()
}

fn exclude(_ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    delivery.con_ref_number.is_none()
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    if delivery.fund_model != Some(FUND_MODEL_ESF) {
        return false;
    }
    let Some(contract) = ctx
        .toolbox()
        .fcs()
        .zip(delivery.con_ref_number.as_deref())
        .and_then(|(fcs, con_ref)| fcs.contract_allocation(con_ref))
    else {
        return false;
    };
    if !contract.is_active_on(delivery.learn_start_date) {
        return false;
    }
    ctx.derived()
        .age_at_contract_start(contract)
        .is_some_and(|age| !contract.accepts_age(age))
}

fn parameters(
    _ctx: &EvalContext<'_>,
    learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::optional("FundModel", delivery.fund_model),
        ViolationParameter::optional("ConRefNumber", delivery.con_ref_number.as_deref()),
        ViolationParameter::date("DateOfBirth", learner.date_of_birth),
    ]
}
