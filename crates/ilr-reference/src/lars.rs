use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::LarsDataService;

/// Qualification metadata for one learning aim reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LarsLearningDelivery {
    pub learn_aim_ref: String,
    /// Notional NVQ level, e.g. `"3"`, `"E"` (entry) or `"X"` (not applicable).
    pub notional_nvq_level: Option<String>,
    pub category_ref: Option<i32>,
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
}

impl LarsLearningDelivery {
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from.is_none_or(|from| from <= date)
            && self.effective_to.is_none_or(|to| date <= to)
    }
}

/// Learning aim lookup. Aim references are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLars {
    by_aim: HashMap<String, LarsLearningDelivery>,
}

impl InMemoryLars {
    pub fn from_records(records: impl IntoIterator<Item = LarsLearningDelivery>) -> Self {
        let by_aim = records
            .into_iter()
            .map(|record| (record.learn_aim_ref.to_ascii_uppercase(), record))
            .collect();
        Self { by_aim }
    }

    pub fn len(&self) -> usize {
        self.by_aim.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_aim.is_empty()
    }
}

impl LarsDataService for InMemoryLars {
    fn learning_delivery(&self, learn_aim_ref: &str) -> Option<&LarsLearningDelivery> {
        self.by_aim.get(&learn_aim_ref.trim().to_ascii_uppercase())
    }
}
