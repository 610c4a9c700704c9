use std::collections::HashMap;

use serde::Serialize;

use crate::services::OrganisationDataService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationRecord {
    pub ukprn: i64,
    pub legal_org_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryOrganisations {
    by_ukprn: HashMap<i64, OrganisationRecord>,
}

impl InMemoryOrganisations {
    pub fn from_records(records: impl IntoIterator<Item = OrganisationRecord>) -> Self {
        let by_ukprn = records
            .into_iter()
            .map(|record| (record.ukprn, record))
            .collect();
        Self { by_ukprn }
    }

    pub fn len(&self) -> usize {
        self.by_ukprn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ukprn.is_empty()
    }
}

impl OrganisationDataService for InMemoryOrganisations {
    fn legal_org_type(&self, ukprn: i64) -> Option<&str> {
        self.by_ukprn
            .get(&ukprn)
            .map(|record| record.legal_org_type.as_str())
    }
}
