#![deny(unsafe_code)]

use std::path::Path;

use crate::error::ReferenceError;
use crate::lars::LarsLearningDelivery;

/// Columns: `LearnAimRef,NotionalNVQLevel,CategoryRef,EffectiveFrom,EffectiveTo`.
pub fn parse_lars_csv(path: &Path) -> Result<Vec<LarsLearningDelivery>, ReferenceError> {
    let mut records = super::parse_rows(path, |row| {
        Ok(LarsLearningDelivery {
            learn_aim_ref: row.required("LearnAimRef")?,
            notional_nvq_level: row.get("NotionalNVQLevel"),
            category_ref: row.int("CategoryRef")?,
            effective_from: row.date("EffectiveFrom")?,
            effective_to: row.date("EffectiveTo")?,
        })
    })?;
    records.sort_by(|a, b| a.learn_aim_ref.cmp(&b.learn_aim_ref));
    Ok(records)
}
