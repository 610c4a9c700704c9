use ilr_model::{Learner, LearningDelivery, Severity, ViolationParameter};
use ilr_reference::SettingKey;

use super::FUND_MODEL_16_19;
use crate::rule::{EvalContext, Emission, Requirement, RuleDefinition, no_deliveries};

const INELIGIBLE_TYPES: &str = "UKPRN_LegalOrgType.ineligible_types";

/// UKPRN_LegalOrgType: the submitting provider's legal organisation type is
/// not eligible for 16-19 funding. Raised once per learner.
pub fn ukprn_legal_org_type() -> RuleDefinition {
    RuleDefinition::delivery("UKPRN_LegalOrgType", condition, parameters)
        .with_severity(Severity::Warning)
        .with_description("Provider organisation type is not eligible for 16-19 funding")
        .requiring(Requirement::Organisations)
        .requiring(Requirement::ProviderUkprn)
        .requiring(Requirement::Setting(SettingKey::CodeSet(INELIGIBLE_TYPES)))
        .excluding_learner(no_deliveries)
        .with_emission(Emission::FirstItem)
}

fn legal_org_type<'a>(ctx: &EvalContext<'a>) -> Option<&'a str> {
    let toolbox = ctx.toolbox();
    toolbox
        .organisations()
        .zip(toolbox.ukprn())
        .and_then(|(organisations, ukprn)| organisations.legal_org_type(ukprn))
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let Some(ineligible) = ctx.settings().code_set(INELIGIBLE_TYPES) else {
        return false;
    };
    delivery.fund_model == Some(FUND_MODEL_16_19)
        && legal_org_type(ctx).is_some_and(|org_type| ineligible.contains(org_type))
}

fn parameters(
    ctx: &EvalContext<'_>,
    _learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::optional("UKPRN", ctx.toolbox().ukprn()),
        ViolationParameter::optional("LegalOrgType", legal_org_type(ctx)),
        ViolationParameter::optional("FundModel", delivery.fund_model),
    ]
}
