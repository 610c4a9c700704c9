#![deny(unsafe_code)]

use std::path::Path;

use crate::error::ReferenceError;
use crate::postcodes::PostcodeRecord;

/// Columns: `Postcode,EffectiveFrom,EffectiveTo,LocalAuthority`.
pub fn parse_postcodes_csv(path: &Path) -> Result<Vec<PostcodeRecord>, ReferenceError> {
    let mut records = super::parse_rows(path, |row| {
        Ok(PostcodeRecord {
            postcode: row.required("Postcode")?,
            effective_from: row.date("EffectiveFrom")?,
            effective_to: row.date("EffectiveTo")?,
            local_authority: row.get("LocalAuthority"),
        })
    })?;
    records.sort_by(|a, b| a.postcode.cmp(&b.postcode));
    Ok(records)
}
