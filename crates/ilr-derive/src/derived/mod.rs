//! Derived-data computations shared across rules.
//!
//! Every computation is a pure free function over a learner's deliveries or a
//! scalar attribute. Aggregations return the winning delivery as a
//! [`DatedAim`] so ties are visible: the extreme date wins and equal dates are
//! broken by the lowest `aim_seq_number`. Nothing qualifying yields `None`.

mod age;
mod contract;
mod programme;
mod uln;

use std::fmt;

use chrono::NaiveDate;
use ilr_model::LearningDelivery;

pub use age::{age_at_academic_year_start, age_at_contract_start};
pub use contract::{ESF_PROGRAMME_AIM, latest_contract_start};
pub use programme::{
    APPRENTICESHIP_PROG_TYPES, PROGRAMME_AIM_TYPE, TRAINEESHIP_PROG_TYPE, earliest_programme_start,
    earliest_start, is_apprenticeship, is_traineeship,
};
pub use uln::{TEMPORARY_ULN, uln_check_digit, uln_is_valid};

pub(crate) use programme::programme_key;

/// Stable identifier of a derived computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DerivedId {
    Dd01,
    Dd04,
    Dd06,
    Dd07,
    Dd22,
    Dd29,
    AgeAtContractStart,
    AgeAtAcademicYearStart,
}

impl DerivedId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dd01 => "DD01",
            Self::Dd04 => "DD04",
            Self::Dd06 => "DD06",
            Self::Dd07 => "DD07",
            Self::Dd22 => "DD22",
            Self::Dd29 => "DD29",
            Self::AgeAtContractStart => "AgeAtContractStart",
            Self::AgeAtAcademicYearStart => "AgeAtAcademicYearStart",
        }
    }
}

impl fmt::Display for DerivedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The delivery selected by a date aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatedAim {
    pub aim_seq_number: i64,
    pub date: NaiveDate,
}

impl DatedAim {
    fn start_of(delivery: &LearningDelivery) -> Self {
        Self {
            aim_seq_number: delivery.aim_seq_number,
            date: delivery.learn_start_date,
        }
    }
}

/// Earliest start among `deliveries`, ties to the lowest sequence number.
fn min_start<'a>(deliveries: impl Iterator<Item = &'a LearningDelivery>) -> Option<DatedAim> {
    deliveries
        .map(DatedAim::start_of)
        .min_by_key(|aim| (aim.date, aim.aim_seq_number))
}

/// Latest start among `deliveries`, ties to the lowest sequence number.
fn max_start<'a>(deliveries: impl Iterator<Item = &'a LearningDelivery>) -> Option<DatedAim> {
    deliveries
        .map(DatedAim::start_of)
        .max_by_key(|aim| (aim.date, std::cmp::Reverse(aim.aim_seq_number)))
}
