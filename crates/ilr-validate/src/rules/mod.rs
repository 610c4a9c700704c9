//! The shipped rule catalogue.
//!
//! | Rule | Scope | Checks |
//! |------|-------|--------|
//! | `ULN_03` | learner | ULN check digit (DD01) |
//! | `DateOfBirth_48` | delivery | 16-19 funded learner aged over the limit on 31 August |
//! | `LearnStartDate_14` | delivery | apprenticeship (DD07) started after the cutoff without an ACT marker |
//! | `ConRefNumber_LatestStart` | delivery | latest contract start (DD22) after the contract ends |
//! | `LearnDelFAMType_LdmValid` | delivery | LDM codes outside the valid list |
//! | `DelLocPostCode_Valid` | delivery | delivery postcode unknown or not effective |
//! | `LearnAimRef_Level` | delivery | adult skills aim at a restricted level for older learners |
//! | `UKPRN_LegalOrgType` | first delivery | 16-19 funding from an ineligible organisation type |
//! | `ProgType_TraineeshipDuration` | delivery | traineeship (DD29) planned longer than allowed |
//! | `FundModel_ContractAge` | delivery | learner age at contract start outside the contract's limits |
//!
//! Thresholds, cutoff dates and code lists are read from [`RuleSettings`]
//! under keys namespaced by rule id.
//!
//! [`RuleSettings`]: ilr_reference::RuleSettings

mod con_ref_number;
mod date_of_birth;
mod del_loc_postcode;
mod fund_model;
mod learn_aim_ref;
mod learn_del_fam;
mod learn_start_date;
mod prog_type;
mod ukprn;
mod uln;

use crate::rule::{Rule, RuleDefinition};

/// Learning delivery FAM type for learning delivery monitoring.
pub const LDM: &str = "LDM";
/// Learning delivery FAM type for apprenticeship contract type.
pub const ACT: &str = "ACT";

pub const FUND_MODEL_ADULT_SKILLS: i32 = 35;
pub const FUND_MODEL_16_19: i32 = 25;
pub const FUND_MODEL_ESF: i32 = 70;

/// Every catalogue rule as a definition.
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        uln::uln_03(),
        date_of_birth::date_of_birth_48(),
        learn_start_date::learn_start_date_14(),
        con_ref_number::con_ref_number_latest_start(),
        learn_del_fam::learn_del_fam_type_ldm_valid(),
        del_loc_postcode::del_loc_postcode_valid(),
        learn_aim_ref::learn_aim_ref_level(),
        ukprn::ukprn_legal_org_type(),
        prog_type::prog_type_traineeship_duration(),
        fund_model::fund_model_contract_age(),
    ]
}

/// The catalogue, ready for [`RuleSet::compose`](crate::RuleSet::compose).
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    definitions()
        .into_iter()
        .map(|rule| Box::new(rule) as Box<dyn Rule>)
        .collect()
}
