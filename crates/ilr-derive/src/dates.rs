//! Calendar-exact date differences.
//!
//! All functions count whole elapsed units. An anniversary on 29 February
//! falls on 28 February in non-leap years, and a day-of-month that does not
//! exist in the target month is clamped to that month's last day. When the
//! second date precedes the first the result is the negated swapped call.
//! An absent date on either side yields `0`.

use chrono::{Datelike, NaiveDate};

pub fn years_between(d1: impl Into<Option<NaiveDate>>, d2: impl Into<Option<NaiveDate>>) -> i32 {
    match (d1.into(), d2.into()) {
        (Some(from), Some(to)) => signed(from, to, whole_years),
        _ => 0,
    }
}

pub fn months_between(d1: impl Into<Option<NaiveDate>>, d2: impl Into<Option<NaiveDate>>) -> i32 {
    match (d1.into(), d2.into()) {
        (Some(from), Some(to)) => signed(from, to, whole_months),
        _ => 0,
    }
}

pub fn days_between(d1: impl Into<Option<NaiveDate>>, d2: impl Into<Option<NaiveDate>>) -> i32 {
    match (d1.into(), d2.into()) {
        // chrono's date range spans fewer than i32::MAX days.
        (Some(from), Some(to)) => i32::try_from((to - from).num_days()).unwrap_or_default(),
        _ => 0,
    }
}

/// Age in whole years on `reference`.
pub fn age_at(
    date_of_birth: impl Into<Option<NaiveDate>>,
    reference: impl Into<Option<NaiveDate>>,
) -> i32 {
    years_between(date_of_birth, reference)
}

fn signed(from: NaiveDate, to: NaiveDate, count: fn(NaiveDate, NaiveDate) -> i32) -> i32 {
    if to < from {
        -count(to, from)
    } else {
        count(from, to)
    }
}

fn whole_years(from: NaiveDate, to: NaiveDate) -> i32 {
    let years = to.year() - from.year();
    let anniversary_day = from.day().min(days_in_month(to.year(), from.month()));
    if (to.month(), to.day()) < (from.month(), anniversary_day) {
        years - 1
    } else {
        years
    }
}

fn whole_months(from: NaiveDate, to: NaiveDate) -> i32 {
    let months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let anniversary_day = from.day().min(days_in_month(to.year(), to.month()));
    if to.day() < anniversary_day {
        months - 1
    } else {
        months
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(age_at(date(1996, 2, 29), date(1997, 2, 27)), 0);
        assert_eq!(age_at(date(1996, 2, 29), date(1997, 2, 28)), 1);
        assert_eq!(age_at(date(1996, 2, 29), date(2000, 2, 28)), 3);
        assert_eq!(age_at(date(1996, 2, 29), date(2000, 2, 29)), 4);
    }

    #[test]
    fn birthday_boundary() {
        assert_eq!(years_between(date(1988, 12, 25), date(2018, 8, 31)), 29);
        assert_eq!(years_between(date(1988, 12, 25), date(2018, 12, 24)), 29);
        assert_eq!(years_between(date(1988, 12, 25), date(2018, 12, 25)), 30);
    }

    #[test]
    fn reversed_dates_negate() {
        assert_eq!(years_between(date(2018, 8, 31), date(1988, 12, 25)), -29);
        assert_eq!(months_between(date(2019, 3, 1), date(2019, 1, 15)), -1);
        assert_eq!(days_between(date(2019, 1, 2), date(2019, 1, 1)), -1);
    }

    #[test]
    fn month_end_clamp() {
        assert_eq!(months_between(date(2019, 1, 31), date(2019, 2, 28)), 1);
        assert_eq!(months_between(date(2019, 1, 31), date(2019, 2, 27)), 0);
        assert_eq!(months_between(date(2020, 1, 31), date(2020, 2, 29)), 1);
        assert_eq!(months_between(date(2018, 8, 1), date(2019, 7, 31)), 11);
        assert_eq!(months_between(date(2018, 8, 1), date(2019, 8, 1)), 12);
    }

    #[test]
    fn absent_dates_are_zero() {
        assert_eq!(years_between(None::<NaiveDate>, date(2018, 8, 31)), 0);
        assert_eq!(months_between(date(2018, 8, 31), None::<NaiveDate>), 0);
        assert_eq!(days_between(None::<NaiveDate>, None::<NaiveDate>), 0);
        assert_eq!(age_at(None::<NaiveDate>, date(2018, 8, 31)), 0);
    }
}
