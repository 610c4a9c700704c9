#![deny(unsafe_code)]

use std::path::Path;

use crate::error::ReferenceError;
use crate::fcs::ContractAllocation;

/// Columns: `ContractAllocationNumber,StartDate,EndDate,MinAge,MaxAge,LocalAuthorityCodes`.
///
/// `LocalAuthorityCodes` is a `;`-separated list.
pub fn parse_fcs_csv(path: &Path) -> Result<Vec<ContractAllocation>, ReferenceError> {
    let mut records = super::parse_rows(path, |row| {
        Ok(ContractAllocation {
            contract_allocation_number: row.required("ContractAllocationNumber")?,
            start_date: row.date("StartDate")?,
            end_date: row.date("EndDate")?,
            min_age: row.int("MinAge")?,
            max_age: row.int("MaxAge")?,
            local_authority_codes: row
                .get("LocalAuthorityCodes")
                .map(|codes| {
                    codes
                        .split(';')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    })?;
    records.sort_by(|a, b| a.contract_allocation_number.cmp(&b.contract_allocation_number));
    Ok(records)
}
