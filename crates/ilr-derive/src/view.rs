use ilr_model::{Learner, LearningDelivery};
use ilr_reference::{AcademicYearDataService, ContractAllocation};

use crate::cache::DerivedCache;
use crate::derived::{self, DatedAim, DerivedId};

/// Derived values for one learner, memoized through an optional batch cache.
///
/// Classifications are computed directly; date aggregations go through the
/// cache when one is attached. Results are identical with or without it.
#[derive(Debug, Clone, Copy)]
pub struct DerivedData<'a> {
    learner: &'a Learner,
    record: usize,
    cache: Option<&'a DerivedCache>,
}

impl<'a> DerivedData<'a> {
    pub fn new(learner: &'a Learner, record: usize, cache: Option<&'a DerivedCache>) -> Self {
        Self {
            learner,
            record,
            cache,
        }
    }

    /// Uncached view, for evaluating a single learner.
    pub fn uncached(learner: &'a Learner) -> Self {
        Self::new(learner, 0, None)
    }

    pub fn learner(&self) -> &'a Learner {
        self.learner
    }

    pub fn record(&self) -> usize {
        self.record
    }

    /// DD01. `None` when the learner has no ULN.
    pub fn uln_is_valid(&self) -> Option<bool> {
        self.learner.uln.map(derived::uln_is_valid)
    }

    /// DD04.
    pub fn earliest_programme_start(&self, delivery: &LearningDelivery) -> Option<DatedAim> {
        self.memo(DerivedId::Dd04, &derived::programme_key(delivery), || {
            derived::earliest_programme_start(self.learner.deliveries(), delivery)
        })
    }

    /// DD06.
    pub fn earliest_start(&self) -> Option<DatedAim> {
        self.memo(DerivedId::Dd06, "", || {
            derived::earliest_start(self.learner.deliveries())
        })
    }

    /// DD07.
    pub fn is_apprenticeship(&self, delivery: &LearningDelivery) -> bool {
        derived::is_apprenticeship(delivery.prog_type)
    }

    /// DD22, keyed by the delivery's contract reference.
    pub fn latest_contract_start(&self, delivery: &LearningDelivery) -> Option<DatedAim> {
        let con_ref = delivery.con_ref_number.as_deref()?;
        self.memo(DerivedId::Dd22, con_ref.trim(), || {
            derived::latest_contract_start(self.learner.deliveries(), con_ref)
        })
    }

    /// DD29.
    pub fn is_traineeship(&self, delivery: &LearningDelivery) -> bool {
        derived::is_traineeship(delivery.prog_type)
    }

    pub fn age_at_contract_start(&self, contract: &ContractAllocation) -> Option<i32> {
        derived::age_at_contract_start(self.learner.date_of_birth, contract)
    }

    pub fn age_at_academic_year_start(&self, calendar: &dyn AcademicYearDataService) -> i32 {
        derived::age_at_academic_year_start(self.learner.date_of_birth, calendar)
    }

    fn memo(
        &self,
        id: DerivedId,
        input: &str,
        compute: impl FnOnce() -> Option<DatedAim>,
    ) -> Option<DatedAim> {
        match self.cache {
            Some(cache) => cache.get_or_compute(self.record, id, input, compute),
            None => compute(),
        }
    }
}
