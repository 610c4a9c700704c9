//! Marker (FAM) membership predicates.
//!
//! Type and code comparison is exact, case-sensitive string equality:
//! `"LDM"` does not match `"ldm"` and `"034"` does not match `"34"`.
//! An empty marker collection answers `false` to every question.

use chrono::NaiveDate;
use ilr_model::Marker;

pub fn has_marker_type(markers: &[Marker], marker_type: &str) -> bool {
    markers.iter().any(|m| m.marker_type == marker_type)
}

pub fn has_marker_code(markers: &[Marker], marker_type: &str, code: &str) -> bool {
    markers
        .iter()
        .any(|m| m.marker_type == marker_type && m.code() == Some(code))
}

/// True when any marker of `marker_type` carries a code contained in `codes`.
pub fn has_any_marker_code<I, S>(markers: &[Marker], marker_type: &str, codes: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let codes: Vec<S> = codes.into_iter().collect();
    marker_codes(markers, marker_type).any(|code| codes.iter().any(|c| c.as_ref() == code))
}

/// As [`has_marker_code`], restricted to markers whose window contains `date`.
pub fn has_marker_code_on(
    markers: &[Marker],
    marker_type: &str,
    code: &str,
    date: NaiveDate,
) -> bool {
    markers.iter().any(|m| {
        m.marker_type == marker_type && m.code() == Some(code) && m.applies_on(date)
    })
}

/// Codes of every marker of `marker_type`, in collection order.
pub fn marker_codes<'a>(
    markers: &'a [Marker],
    marker_type: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    markers
        .iter()
        .filter(move |m| m.marker_type == marker_type)
        .filter_map(Marker::code)
}
