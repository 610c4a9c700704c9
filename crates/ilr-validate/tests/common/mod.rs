#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use ilr_model::{LearnRefNumber, Learner, LearningDelivery, Marker, Violation};
use ilr_reference::{
    AcademicCalendar, ContractAllocation, InMemoryFcs, InMemoryLars, InMemoryOrganisations,
    InMemoryPostcodes, LarsLearningDelivery, OrganisationRecord, PostcodeRecord, RuleSettings,
};
use ilr_validate::{BatchOptions, BatchValidator, RuleSet, Toolbox, default_rules};

pub const VALID_ULN: i64 = 1_234_567_899;
pub const INVALID_ULN: i64 = 1_234_567_890;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn settings() -> RuleSettings {
    RuleSettings::new("2018-19.1", 2018)
        .with_threshold("DateOfBirth_48.min_age", 19)
        .with_code_set("DateOfBirth_48.exempt_ldm", ["034", "347"])
        .with_date("LearnStartDate_14.cutoff", date(2017, 5, 1))
        .with_code_set(
            "LearnDelFAMType_LdmValid.valid_codes",
            ["034", "100", "347", "356"],
        )
        .with_code_set("DelLocPostCode_Valid.exempt_postcodes", ["ZZ99 9ZZ"])
        .with_threshold("LearnAimRef_Level.min_age", 24)
        .with_code_set("LearnAimRef_Level.restricted_levels", ["3", "4"])
        .with_code_set("UKPRN_LegalOrgType.ineligible_types", ["PLTD"])
        .with_threshold("ProgType_TraineeshipDuration.max_months", 12)
}

/// Toolbox carrying settings and calendar only.
pub fn bare_toolbox(settings: RuleSettings) -> Toolbox {
    let calendar = AcademicCalendar::for_start_year(settings.academic_year()).unwrap();
    Toolbox::new(Arc::new(settings), Arc::new(calendar))
}

pub fn toolbox() -> Toolbox {
    toolbox_with(settings())
}

/// Every reference service, over the given settings.
pub fn toolbox_with(settings: RuleSettings) -> Toolbox {
    bare_toolbox(settings)
        .with_postcodes(Arc::new(InMemoryPostcodes::from_records([PostcodeRecord {
            postcode: "B1 1AA".to_string(),
            effective_from: Some(date(2000, 1, 1)),
            effective_to: None,
            local_authority: Some("E08000025".to_string()),
        }])))
        .with_lars(Arc::new(InMemoryLars::from_records([LarsLearningDelivery {
            learn_aim_ref: "60005415".to_string(),
            notional_nvq_level: Some("3".to_string()),
            category_ref: None,
            effective_from: Some(date(2015, 8, 1)),
            effective_to: None,
        }])))
        .with_fcs(Arc::new(InMemoryFcs::from_records([ContractAllocation {
            contract_allocation_number: "ESF-2108".to_string(),
            start_date: Some(date(2018, 8, 1)),
            end_date: Some(date(2019, 3, 31)),
            min_age: Some(19),
            max_age: Some(64),
            local_authority_codes: ["E08000025".to_string()].into_iter().collect(),
        }])))
        .with_organisations(Arc::new(InMemoryOrganisations::from_records([
            OrganisationRecord {
                ukprn: 10000001,
                legal_org_type: "PLTD".to_string(),
            },
        ])))
        .with_ukprn(Some(10000001))
}

pub fn default_set() -> RuleSet {
    RuleSet::compose(Arc::new(toolbox()), default_rules()).unwrap()
}

pub fn validator(options: BatchOptions) -> BatchValidator {
    BatchValidator::new(default_set()).with_options(options)
}

pub fn learner(reference: &str) -> Learner {
    Learner::new(LearnRefNumber::new(reference).unwrap())
}

/// A varied batch that trips most catalogue rules somewhere.
pub fn sample_batch(size: usize) -> Vec<Learner> {
    const FUND_MODELS: [i32; 3] = [25, 35, 70];
    const LDM_CODES: [&str; 3] = ["034", "999", "100"];
    const POSTCODES: [&str; 2] = ["B1 1AA", "XX1 1XX"];

    (0..size)
        .map(|i| {
            let mut l = learner(&format!("L{i:04}"));
            l.uln = match i % 3 {
                0 => Some(VALID_ULN),
                1 => Some(INVALID_ULN),
                _ => None,
            };
            let birth_year = 1975 + i32::try_from(i % 28).unwrap();
            l.date_of_birth = Some(date(birth_year, 1, 15));

            let fund_model = FUND_MODELS[i % 3];
            let mut aim = LearningDelivery::new(1, "60005415", date(2018, 9, 1));
            aim.fund_model = Some(fund_model);
            aim.del_loc_postcode = Some(POSTCODES[i % 2].to_string());
            aim.learning_delivery_fams
                .push(Marker::new("LDM", LDM_CODES[(i / 3) % 3]));
            if fund_model == 70 {
                aim.con_ref_number = Some("ESF-2108".to_string());
            }
            l.learning_deliveries.push(aim);

            if i % 4 == 0 {
                let mut programme = LearningDelivery::new(2, "ZPROG001", date(2018, 9, 1));
                programme.aim_type = Some(1);
                programme.prog_type = Some(if i % 8 == 0 { 24 } else { 25 });
                programme.learn_planned_end_date = Some(date(2019, 12, 1));
                programme.fund_model = Some(36);
                l.learning_deliveries.push(programme);
            }
            l
        })
        .collect()
}

/// Order-insensitive view of a violation list.
pub fn normalized(violations: &[Violation]) -> Vec<String> {
    let mut keys: Vec<String> = violations.iter().map(|v| format!("{v:?}")).collect();
    keys.sort();
    keys
}
