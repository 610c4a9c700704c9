use ilr_model::{Learner, LearningDelivery, ViolationParameter};

use crate::rule::{EvalContext, Requirement, RuleDefinition};

/// ConRefNumber_LatestStart: the latest ESF programme start recorded against
/// a contract (DD22) must not fall after the contract allocation ends.
///
/// Only the delivery selected by DD22 is reported, so a contract yields at
/// most one violation per learner.
pub fn con_ref_number_latest_start() -> RuleDefinition {
    RuleDefinition::delivery("ConRefNumber_LatestStart", condition, parameters)
        .with_description("Latest start on the contract is after the contract end date")
        .requiring(Requirement::Fcs)
        .excluding_delivery(exclude)
}

fn exclude(_ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    delivery
        .con_ref_number
        .as_deref()
        .is_none_or(|con_ref| con_ref.trim().is_empty())
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let Some(latest) = ctx.derived().latest_contract_start(delivery) else {
        return false;
    };
    if latest.aim_seq_number != delivery.aim_seq_number {
        return false;
    }
    let contract = ctx
        .toolbox()
        .fcs()
        .zip(delivery.con_ref_number.as_deref())
        .and_then(|(fcs, con_ref)| fcs.contract_allocation(con_ref));
    contract
        .and_then(|c| c.end_date)
        .is_some_and(|end| latest.date > end)
}

fn parameters(
    _ctx: &EvalContext<'_>,
    _learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::optional("ConRefNumber", delivery.con_ref_number.as_deref()),
        ViolationParameter::date("LearnStartDate", Some(delivery.learn_start_date)),
    ]
}

#[cfg(test)]
mod tests {
    use ilr_derive::derived::ESF_PROGRAMME_AIM;

    use super::*;
    use crate::rules::test_support::{date, delivery, evaluate, learner, toolbox};

    fn esf(seq: i64, start: (i32, u32, u32), con_ref: &str) -> LearningDelivery {
        let mut d = delivery(seq, ESF_PROGRAMME_AIM, date(start.0, start.1, start.2));
        d.con_ref_number = Some(con_ref.to_string());
        d
    }

    #[test]
    fn reports_only_the_latest_start() {
        let mut l = learner("L0001");
        l.learning_deliveries = vec![
            esf(1, (2019, 4, 15), "ESF-2108"),
            esf(2, (2019, 5, 1), "ESF-2108"),
        ];
        let violations = evaluate(&con_ref_number_latest_start(), &toolbox(), &l);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].aim_seq_number, Some(2));
        assert_eq!(violations[0].parameter("ConRefNumber"), Some("ESF-2108"));
    }

    #[test]
    fn start_inside_contract_passes() {
        let mut l = learner("L0001");
        l.learning_deliveries = vec![esf(1, (2019, 3, 31), "ESF-2108")];
        assert!(evaluate(&con_ref_number_latest_start(), &toolbox(), &l).is_empty());
    }

    #[test]
    fn unknown_contract_passes() {
        let mut l = learner("L0001");
        l.learning_deliveries = vec![esf(1, (2020, 1, 1), "ESF-0000")];
        assert!(evaluate(&con_ref_number_latest_start(), &toolbox(), &l).is_empty());
    }
}
