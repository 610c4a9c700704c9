#![deny(unsafe_code)]

//! CSV table parsers for reference data files.
//!
//! All tables have a header row. Blank cells are treated as absent values and
//! dates use ISO `YYYY-MM-DD`.

pub mod fcs;
pub mod lars;
pub mod organisations;
pub mod postcodes;

use std::path::Path;

use chrono::NaiveDate;

use crate::error::ReferenceError;

/// A header-aware view over one CSV row.
pub(crate) struct Row<'a> {
    path: &'a Path,
    headers: &'a ::csv::StringRecord,
    record: &'a ::csv::StringRecord,
}

impl Row<'_> {
    pub(crate) fn get(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .and_then(|i| self.record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }

    pub(crate) fn required(&self, name: &str) -> Result<String, ReferenceError> {
        self.get(name)
            .ok_or_else(|| ReferenceError::csv(self.path, format!("missing {name}")))
    }

    pub(crate) fn date(&self, name: &str) -> Result<Option<NaiveDate>, ReferenceError> {
        self.get(name)
            .map(|value| {
                NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|e| {
                    ReferenceError::csv(self.path, format!("invalid {name} {value:?}: {e}"))
                })
            })
            .transpose()
    }

    pub(crate) fn int<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ReferenceError>
    where
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|value| {
                value.parse::<T>().map_err(|e| {
                    ReferenceError::csv(self.path, format!("invalid {name} {value:?}: {e}"))
                })
            })
            .transpose()
    }
}

/// Parse every row of a headed CSV file with `parse_row`.
pub(crate) fn parse_rows<T>(
    path: &Path,
    mut parse_row: impl FnMut(&Row<'_>) -> Result<T, ReferenceError>,
) -> Result<Vec<T>, ReferenceError> {
    let bytes = std::fs::read(path).map_err(|e| ReferenceError::io(path, e))?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| ReferenceError::csv(path, e.to_string()))?
        .clone();

    let mut results = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReferenceError::csv(path, e.to_string()))?;
        let row = Row {
            path,
            headers: &headers,
            record: &record,
        };
        results.push(parse_row(&row)?);
    }
    Ok(results)
}
