use chrono::NaiveDate;
use ilr_reference::{AcademicYearDataService, ContractAllocation};

use crate::dates::age_at;

/// Age on the contract allocation's start date; `None` when the contract has
/// no start date.
pub fn age_at_contract_start(
    date_of_birth: Option<NaiveDate>,
    contract: &ContractAllocation,
) -> Option<i32> {
    let start = contract.start_date?;
    Some(age_at(date_of_birth, start))
}

/// Age on 31 August of the academic year.
pub fn age_at_academic_year_start(
    date_of_birth: Option<NaiveDate>,
    calendar: &dyn AcademicYearDataService,
) -> i32 {
    age_at(date_of_birth, calendar.august_31())
}
