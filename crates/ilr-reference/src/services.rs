//! Read-only lookup interfaces consumed by rules.
//!
//! Every service is fully loaded before validation starts and answers from
//! memory. Implementations must be `Send + Sync`; the rule engine shares one
//! instance across all workers.

use chrono::NaiveDate;

use crate::fcs::ContractAllocation;
use crate::lars::LarsLearningDelivery;
use crate::postcodes::PostcodeRecord;

pub trait PostcodesDataService: Send + Sync {
    fn lookup(&self, postcode: &str) -> Option<&PostcodeRecord>;

    fn exists(&self, postcode: &str) -> bool {
        self.lookup(postcode).is_some()
    }
}

pub trait LarsDataService: Send + Sync {
    fn learning_delivery(&self, learn_aim_ref: &str) -> Option<&LarsLearningDelivery>;
}

pub trait FcsDataService: Send + Sync {
    fn contract_allocation(&self, con_ref_number: &str) -> Option<&ContractAllocation>;
}

pub trait OrganisationDataService: Send + Sync {
    fn legal_org_type(&self, ukprn: i64) -> Option<&str>;
}

pub trait AcademicYearDataService: Send + Sync {
    /// First day of the academic year (1 August).
    fn start(&self) -> NaiveDate;

    /// Last day of the academic year (31 July).
    fn end(&self) -> NaiveDate;

    /// 31 August of the academic year, the usual age reference date.
    fn august_31(&self) -> NaiveDate;

    /// Last Friday in June of the academic year.
    fn june_last_friday(&self) -> NaiveDate;

    /// Start year of the academic year containing `date`.
    fn academic_year_of(&self, date: NaiveDate) -> i32;
}
