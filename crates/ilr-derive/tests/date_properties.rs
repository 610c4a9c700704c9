use chrono::{Datelike, Duration, NaiveDate};
use ilr_derive::{age_at, days_between, months_between, years_between};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    // 1900-01-01 .. 2100-12-31
    (0i64..73_413).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Duration::days(offset)
    })
}

proptest! {
    #[test]
    fn reversal_negates(a in any_date(), b in any_date()) {
        prop_assert_eq!(years_between(a, b), -years_between(b, a));
        prop_assert_eq!(months_between(a, b), -months_between(b, a));
        prop_assert_eq!(days_between(a, b), -days_between(b, a));
    }

    #[test]
    fn same_date_is_zero(a in any_date()) {
        prop_assert_eq!(years_between(a, a), 0);
        prop_assert_eq!(months_between(a, a), 0);
        prop_assert_eq!(days_between(a, a), 0);
    }

    #[test]
    fn units_are_consistent(a in any_date(), b in any_date()) {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        let years = years_between(from, to);
        let months = months_between(from, to);
        prop_assert!(years >= 0);
        prop_assert_eq!(months / 12, years);
        prop_assert!(days_between(from, to) >= months * 28);
    }

    #[test]
    fn age_is_monotonic(dob in any_date(), a in any_date(), b in any_date()) {
        let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(age_at(dob, earlier) <= age_at(dob, later));
    }

    #[test]
    fn age_increments_on_anniversary(dob in any_date(), years in 1i32..90) {
        let target_year = dob.year() + years;
        // 29 February birthdays fall on 28 February in non-leap years.
        let anniversary = NaiveDate::from_ymd_opt(target_year, dob.month(), dob.day())
            .or_else(|| NaiveDate::from_ymd_opt(target_year, 2, 28))
            .unwrap();
        prop_assert_eq!(age_at(dob, anniversary), years);
        prop_assert_eq!(age_at(dob, anniversary - Duration::days(1)), years - 1);
    }
}
