use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::FcsDataService;

/// Funding contract allocation and its eligibility constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractAllocation {
    pub contract_allocation_number: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub local_authority_codes: BTreeSet<String>,
}

impl ContractAllocation {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| start <= date)
            && self.end_date.is_none_or(|end| date <= end)
    }

    /// True when the age lies inside the eligibility window. Absent limits are open.
    pub fn accepts_age(&self, age: i32) -> bool {
        self.min_age.is_none_or(|min| age >= min) && self.max_age.is_none_or(|max| age <= max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFcs {
    by_contract: HashMap<String, ContractAllocation>,
}

impl InMemoryFcs {
    pub fn from_records(records: impl IntoIterator<Item = ContractAllocation>) -> Self {
        let by_contract = records
            .into_iter()
            .map(|record| (record.contract_allocation_number.clone(), record))
            .collect();
        Self { by_contract }
    }

    pub fn len(&self) -> usize {
        self.by_contract.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_contract.is_empty()
    }
}

impl FcsDataService for InMemoryFcs {
    fn contract_allocation(&self, con_ref_number: &str) -> Option<&ContractAllocation> {
        self.by_contract.get(con_ref_number.trim())
    }
}
