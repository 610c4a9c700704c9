#![deny(unsafe_code)]

use std::path::Path;

use crate::error::ReferenceError;
use crate::organisations::OrganisationRecord;

/// Columns: `UKPRN,LegalOrgType`.
pub fn parse_organisations_csv(path: &Path) -> Result<Vec<OrganisationRecord>, ReferenceError> {
    let mut records = super::parse_rows(path, |row| {
        let ukprn = row
            .int::<i64>("UKPRN")?
            .ok_or_else(|| ReferenceError::csv(path, "missing UKPRN"))?;
        Ok(OrganisationRecord {
            ukprn,
            legal_org_type: row.required("LegalOrgType")?,
        })
    })?;
    records.sort_by_key(|record| record.ukprn);
    Ok(records)
}
