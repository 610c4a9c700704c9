use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::PostcodesDataService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostcodeRecord {
    pub postcode: String,
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
    pub local_authority: Option<String>,
}

impl PostcodeRecord {
    /// Absent bounds are open.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from.is_none_or(|from| from <= date)
            && self.effective_to.is_none_or(|to| date <= to)
    }
}

/// Postcode lookup keyed by normalized postcode.
///
/// Keys are trimmed and uppercased with inner whitespace collapsed, so
/// `"b1  1aa"` and `"B1 1AA"` resolve to the same record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPostcodes {
    by_postcode: HashMap<String, PostcodeRecord>,
}

impl InMemoryPostcodes {
    pub fn from_records(records: impl IntoIterator<Item = PostcodeRecord>) -> Self {
        let by_postcode = records
            .into_iter()
            .map(|record| (normalize_postcode(&record.postcode), record))
            .collect();
        Self { by_postcode }
    }

    pub fn len(&self) -> usize {
        self.by_postcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_postcode.is_empty()
    }
}

impl PostcodesDataService for InMemoryPostcodes {
    fn lookup(&self, postcode: &str) -> Option<&PostcodeRecord> {
        self.by_postcode.get(&normalize_postcode(postcode))
    }
}

pub fn normalize_postcode(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_whitespace_and_case_tolerant() {
        let store = InMemoryPostcodes::from_records([PostcodeRecord {
            postcode: "B1 1AA".to_string(),
            effective_from: None,
            effective_to: None,
            local_authority: Some("E08000025".to_string()),
        }]);
        assert!(store.exists("b1  1aa"));
        assert!(store.exists(" B1 1AA "));
        assert!(!store.exists("B11AA"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_is_idempotent(raw in "[ a-zA-Z0-9\t]{0,12}") {
                let once = normalize_postcode(&raw);
                prop_assert_eq!(normalize_postcode(&once), once.clone());
                prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
                prop_assert!(!once.contains("  "));
            }
        }
    }
}
