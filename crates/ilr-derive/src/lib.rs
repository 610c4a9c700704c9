#![deny(unsafe_code)]

//! Shared building blocks for ILR rules: marker predicates, calendar
//! arithmetic, derived-data computations and their per-batch memoization.

pub mod cache;
pub mod dates;
pub mod derived;
pub mod predicates;
mod view;

pub use cache::{CacheStats, DerivedCache};
pub use dates::{age_at, days_between, months_between, years_between};
pub use derived::{DatedAim, DerivedId};
pub use predicates::{
    has_any_marker_code, has_marker_code, has_marker_code_on, has_marker_type, marker_codes,
};
pub use view::DerivedData;
