use ilr_derive::months_between;
use ilr_derive::derived::PROGRAMME_AIM_TYPE;
use ilr_model::{Learner, LearningDelivery, ViolationParameter};
use ilr_reference::SettingKey;

use crate::rule::{EvalContext, Requirement, RuleDefinition, no_deliveries};

const MAX_MONTHS: &str = "ProgType_TraineeshipDuration.max_months";

/// ProgType_TraineeshipDuration: a traineeship programme aim (DD29) must not be
/// planned to run for longer than the allowed number of months.
pub fn prog_type_traineeship_duration() -> RuleDefinition {
    RuleDefinition::delivery("ProgType_TraineeshipDuration", condition, parameters)
        .with_description("Traineeship planned duration is too long")
        .requiring(Requirement::Setting(SettingKey::Threshold(MAX_MONTHS)))
        .excluding_learner(no_deliveries)
        .excluding_delivery(exclude)
}

fn exclude(_ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    delivery.learn_planned_end_date.is_none()
}

fn condition(ctx: &EvalContext<'_>, _learner: &Learner, delivery: &LearningDelivery) -> bool {
    let Some(max_months) = ctx.settings().threshold(MAX_MONTHS) else {
        return false;
    };
    ctx.derived().is_traineeship(delivery)
        && delivery.aim_type == Some(PROGRAMME_AIM_TYPE)
        && i64::from(months_between(
            delivery.learn_start_date,
            delivery.learn_planned_end_date,
        )) > max_months
}

fn parameters(
    _ctx: &EvalContext<'_>,
    _learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::optional("ProgType", delivery.prog_type),
        ViolationParameter::date("LearnStartDate", Some(delivery.learn_start_date)),
        ViolationParameter::date("LearnPlanEndDate", delivery.learn_planned_end_date),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ilr_model::Violation;

    use super::*;
    use crate::rules::test_support::{date, delivery, evaluate, learner, toolbox};

    fn run(prog_type: i32, aim_type: i32, planned_end: Option<NaiveDate>) -> Vec<Violation> {
        let mut l = learner("L0001");
        let mut d = delivery(1, "ZPROG001", date(2018, 9, 1));
        d.prog_type = Some(prog_type);
        d.aim_type = Some(aim_type);
        d.learn_planned_end_date = planned_end;
        l.learning_deliveries.push(d);
        evaluate(&prog_type_traineeship_duration(), &toolbox(), &l)
    }

    #[test]
    fn overlong_traineeship_is_reported() {
        let violations = run(24, 1, Some(date(2019, 10, 1)));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].parameter("ProgType"), Some("24"));
        assert_eq!(violations[0].parameter("LearnPlanEndDate"), Some("01/10/2019"));
    }

    #[test]
    fn exactly_the_limit_passes() {
        assert!(run(24, 1, Some(date(2019, 9, 1))).is_empty());
        assert!(run(24, 1, Some(date(2019, 9, 30))).is_empty());
    }

    #[test]
    fn component_aims_and_other_programmes_pass() {
        assert!(run(24, 3, Some(date(2020, 1, 1))).is_empty());
        assert!(run(25, 1, Some(date(2020, 1, 1))).is_empty());
        assert!(run(24, 1, None).is_empty());
    }
}
