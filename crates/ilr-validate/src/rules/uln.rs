use ilr_derive::derived::TEMPORARY_ULN;
use ilr_model::{Learner, ViolationParameter};

use crate::rule::{EvalContext, RuleDefinition};

/// ULN_03: a registered ULN must pass the DD01 check digit.
pub fn uln_03() -> RuleDefinition {
    RuleDefinition::learner("ULN_03", condition, parameters)
        .with_description("ULN fails the check digit test")
        .excluding_learner(exclude)
}

fn exclude(_ctx: &EvalContext<'_>, learner: &Learner) -> bool {
    learner.uln.is_none_or(|uln| uln == TEMPORARY_ULN)
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner) -> bool {
    ctx.derived().uln_is_valid() == Some(false)
}

fn parameters(_ctx: &EvalContext<'_>, learner: &Learner) -> Vec<ViolationParameter> {
    vec![ViolationParameter::optional("ULN", learner.uln)]
}
