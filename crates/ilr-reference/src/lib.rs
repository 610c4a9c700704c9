#![deny(unsafe_code)]

//! Reference data consumed by ILR rules.
//!
//! Lookups are exposed as read-only service traits ([`services`]) with
//! in-memory implementations. [`ReferenceRegistry::verify_and_load`] reads a
//! reference directory described by a sha256-pinned `manifest.toml`.

pub mod calendar;
pub mod csv;
pub mod error;
pub mod fcs;
pub mod hash;
pub mod lars;
pub mod manifest;
pub mod organisations;
pub mod paths;
pub mod postcodes;
pub mod registry;
pub mod services;
pub mod settings;

pub use crate::calendar::AcademicCalendar;
pub use crate::error::ReferenceError;
pub use crate::fcs::{ContractAllocation, InMemoryFcs};
pub use crate::lars::{InMemoryLars, LarsLearningDelivery};
pub use crate::organisations::{InMemoryOrganisations, OrganisationRecord};
pub use crate::postcodes::{InMemoryPostcodes, PostcodeRecord};
pub use crate::registry::{ReferenceData, ReferenceRegistry, VerifySummary};
pub use crate::services::{
    AcademicYearDataService, FcsDataService, LarsDataService, OrganisationDataService,
    PostcodesDataService,
};
pub use crate::settings::{RuleSettings, SettingKey};
