use ilr_derive::age_at;
use ilr_model::{Learner, LearningDelivery, ViolationParameter};
use ilr_reference::SettingKey;

use super::FUND_MODEL_ADULT_SKILLS;
use crate::rule::{EvalContext, Requirement, RuleDefinition};

const MIN_AGE: &str = "LearnAimRef_Level.min_age";
const RESTRICTED_LEVELS: &str = "LearnAimRef_Level.restricted_levels";

/// LearnAimRef_Level: adult skills funding is not available for aims at a
/// restricted notional level once the learner reaches the age limit.
pub fn learn_aim_ref_level() -> RuleDefinition {
    RuleDefinition::delivery("LearnAimRef_Level", condition, parameters)
        .with_description("Aim level is not fundable for the learner's age")
        .requiring(Requirement::Lars)
        .requiring(Requirement::Setting(SettingKey::Threshold(MIN_AGE)))
        .requiring(Requirement::Setting(SettingKey::CodeSet(RESTRICTED_LEVELS)))
        .excluding_learner(exclude_learner)
}

fn exclude_learner(_ctx: &EvalContext<'_>, learner: &Learner) -> bool {
    learner.date_of_birth.is_none() || !learner.has_deliveries()
}

fn condition(ctx: &EvalContext<'_>, learner: &Learner, delivery: &LearningDelivery) -> bool {
    if delivery.fund_model != Some(FUND_MODEL_ADULT_SKILLS) {
        return false;
    }
    let settings = ctx.settings();
    let (Some(min_age), Some(levels), Some(lars)) = (
        settings.threshold(MIN_AGE),
        settings.code_set(RESTRICTED_LEVELS),
        ctx.toolbox().lars(),
    ) else {
        return false;
    };
    if i64::from(age_at(learner.date_of_birth, delivery.learn_start_date)) < min_age {
        return false;
    }
    lars.learning_delivery(&delivery.learn_aim_ref)
        .filter(|aim| aim.is_effective_on(delivery.learn_start_date))
        .and_then(|aim| aim.notional_nvq_level.as_deref())
        .is_some_and(|level| levels.contains(level))
}

fn parameters(
    _ctx: &EvalContext<'_>,
    learner: &Learner,
    delivery: &LearningDelivery,
) -> Vec<ViolationParameter> {
    vec![
        ViolationParameter::new("LearnAimRef", &delivery.learn_aim_ref),
        ViolationParameter::date("DateOfBirth", learner.date_of_birth),
        ViolationParameter::date("LearnStartDate", Some(delivery.learn_start_date)),
        ViolationParameter::optional("FundModel", delivery.fund_model),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ilr_model::Violation;

    use super::*;
    use crate::rules::test_support::{date, delivery, evaluate, learner, toolbox};

    fn run(aim: &str, dob: Option<NaiveDate>, start: NaiveDate, fund_model: i32) -> Vec<Violation> {
        let mut l = learner("L0001");
        l.date_of_birth = dob;
        let mut d = delivery(1, aim, start);
        d.fund_model = Some(fund_model);
        l.learning_deliveries.push(d);
        evaluate(&learn_aim_ref_level(), &toolbox(), &l)
    }

    #[test]
    fn restricted_level_for_older_learner_is_reported() {
        let violations = run("60005415", Some(date(1980, 1, 1)), date(2018, 9, 1), 35);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].parameter("LearnAimRef"), Some("60005415"));
        assert_eq!(violations[0].parameter("FundModel"), Some("35"));
    }

    #[test]
    fn age_is_taken_on_the_start_date() {
        // Turns 24 on 2 September 2018.
        let dob = Some(date(1994, 9, 2));
        assert!(run("60005415", dob, date(2018, 9, 1), 35).is_empty());
        assert_eq!(run("60005415", dob, date(2018, 9, 2), 35).len(), 1);
    }

    #[test]
    fn unrestricted_or_not_yet_effective_aims_pass() {
        let dob = Some(date(1980, 1, 1));
        assert!(run("50086832", dob, date(2018, 9, 1), 35).is_empty());
        assert!(run("60005415", dob, date(2015, 7, 31), 35).is_empty());
        assert!(run("99999999", dob, date(2018, 9, 1), 35).is_empty());
    }

    #[test]
    fn other_fund_models_and_unknown_dob_pass() {
        assert!(run("60005415", Some(date(1980, 1, 1)), date(2018, 9, 1), 25).is_empty());
        assert!(run("60005415", None, date(2018, 9, 1), 35).is_empty());
    }
}
