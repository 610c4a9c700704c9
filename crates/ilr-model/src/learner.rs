//! Learner records as consumed by the rule engine.
//!
//! A [`Learner`] owns its learning deliveries and learner-level markers.
//! Records are built by an external loader and treated as read-only for the
//! whole validation pass; rules only ever see `&Learner`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::LearnRefNumber;

/// A coded funding/monitoring flag (FAM) attached to a learner or delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Short categorical type, e.g. `LDM`, `ACT`, `SOF`.
    pub marker_type: String,
    /// Type-dependent code, e.g. `034`.
    #[serde(default)]
    pub code: Option<String>,
    /// Start of the window the marker applies to (delivery markers only).
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// End of the window the marker applies to (delivery markers only).
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl Marker {
    pub fn new(marker_type: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            marker_type: marker_type.into(),
            code: Some(code.into()),
            date_from: None,
            date_to: None,
        }
    }

    /// Marker carrying a type only.
    pub fn of_type(marker_type: impl Into<String>) -> Self {
        Self {
            marker_type: marker_type.into(),
            code: None,
            date_from: None,
            date_to: None,
        }
    }

    #[must_use]
    pub fn with_window(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// True when `date` lies inside the marker window. Absent bounds are open.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| from <= date) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// A single learning aim delivered to a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningDelivery {
    pub aim_seq_number: i64,
    pub learn_aim_ref: String,
    #[serde(default)]
    pub aim_type: Option<i32>,
    #[serde(default)]
    pub fund_model: Option<i32>,
    #[serde(default)]
    pub prog_type: Option<i32>,
    #[serde(default)]
    pub fwork_code: Option<i32>,
    #[serde(default)]
    pub pway_code: Option<i32>,
    #[serde(default)]
    pub std_code: Option<i32>,
    pub learn_start_date: NaiveDate,
    #[serde(default)]
    pub learn_planned_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub learn_act_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub comp_status: Option<i32>,
    #[serde(default)]
    pub outcome: Option<i32>,
    #[serde(default)]
    pub con_ref_number: Option<String>,
    #[serde(default)]
    pub del_loc_postcode: Option<String>,
    #[serde(default)]
    pub learning_delivery_fams: Vec<Marker>,
}

impl LearningDelivery {
    /// Minimal delivery; remaining attributes are set through the public fields.
    pub fn new(aim_seq_number: i64, learn_aim_ref: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            aim_seq_number,
            learn_aim_ref: learn_aim_ref.into(),
            aim_type: None,
            fund_model: None,
            prog_type: None,
            fwork_code: None,
            pway_code: None,
            std_code: None,
            learn_start_date: start,
            learn_planned_end_date: None,
            learn_act_end_date: None,
            comp_status: None,
            outcome: None,
            con_ref_number: None,
            del_loc_postcode: None,
            learning_delivery_fams: Vec::new(),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.learning_delivery_fams
    }
}

/// The top-level record validated by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub learn_ref_number: LearnRefNumber,
    #[serde(default)]
    pub uln: Option<i64>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub learner_fams: Vec<Marker>,
    #[serde(default)]
    pub learning_deliveries: Vec<LearningDelivery>,
}

impl Learner {
    pub fn new(learn_ref_number: LearnRefNumber) -> Self {
        Self {
            learn_ref_number,
            uln: None,
            date_of_birth: None,
            postcode: None,
            learner_fams: Vec::new(),
            learning_deliveries: Vec::new(),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.learner_fams
    }

    pub fn deliveries(&self) -> &[LearningDelivery] {
        &self.learning_deliveries
    }

    pub fn has_deliveries(&self) -> bool {
        !self.learning_deliveries.is_empty()
    }
}
