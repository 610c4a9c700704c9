//! Programme classification (DD07, DD29) and start-date aggregation (DD04, DD06).

use ilr_model::LearningDelivery;

use super::{DatedAim, min_start};

/// Programme types funded as apprenticeships: advanced, intermediate, higher
/// (levels 4 to 7) and apprenticeship standards.
pub const APPRENTICESHIP_PROG_TYPES: &[i32] = &[2, 3, 20, 21, 22, 23, 25];

pub const TRAINEESHIP_PROG_TYPE: i32 = 24;

/// Aim type of the programme aim that frames component aims.
pub const PROGRAMME_AIM_TYPE: i32 = 1;

/// DD07.
pub fn is_apprenticeship(prog_type: Option<i32>) -> bool {
    prog_type.is_some_and(|p| APPRENTICESHIP_PROG_TYPES.contains(&p))
}

/// DD29.
pub fn is_traineeship(prog_type: Option<i32>) -> bool {
    prog_type == Some(TRAINEESHIP_PROG_TYPE)
}

/// DD06: earliest start date across every delivery.
pub fn earliest_start(deliveries: &[LearningDelivery]) -> Option<DatedAim> {
    min_start(deliveries.iter())
}

/// DD04: earliest start of the programme `delivery` belongs to.
///
/// Programme aims sharing the delivery's programme type and either its
/// framework and pathway codes or its standard code are considered. A
/// delivery without a programme type belongs to no programme.
pub fn earliest_programme_start(
    deliveries: &[LearningDelivery],
    delivery: &LearningDelivery,
) -> Option<DatedAim> {
    delivery.prog_type?;
    min_start(
        deliveries
            .iter()
            .filter(|d| d.aim_type == Some(PROGRAMME_AIM_TYPE) && same_programme(d, delivery)),
    )
}

fn same_programme(a: &LearningDelivery, b: &LearningDelivery) -> bool {
    if a.prog_type != b.prog_type {
        return false;
    }
    match (a.std_code, b.std_code) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.fwork_code == b.fwork_code && a.pway_code == b.pway_code,
        _ => false,
    }
}

/// Cache key for [`earliest_programme_start`]; deliveries of one programme share it.
pub(crate) fn programme_key(delivery: &LearningDelivery) -> String {
    format!(
        "{:?}/{:?}/{:?}/{:?}",
        delivery.prog_type, delivery.fwork_code, delivery.pway_code, delivery.std_code
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn delivery(seq: i64, start: (i32, u32, u32)) -> LearningDelivery {
        LearningDelivery::new(
            seq,
            "ZPROG001",
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        )
    }

    fn programme(
        seq: i64,
        start: (i32, u32, u32),
        prog_type: i32,
        std_code: i32,
    ) -> LearningDelivery {
        let mut d = delivery(seq, start);
        d.aim_type = Some(PROGRAMME_AIM_TYPE);
        d.prog_type = Some(prog_type);
        d.std_code = Some(std_code);
        d
    }

    #[test]
    fn classifications() {
        assert!(is_apprenticeship(Some(25)));
        assert!(is_apprenticeship(Some(2)));
        assert!(!is_apprenticeship(Some(24)));
        assert!(!is_apprenticeship(None));
        assert!(is_traineeship(Some(24)));
        assert!(!is_traineeship(Some(25)));
        assert!(!is_traineeship(None));
    }

    #[test]
    fn earliest_start_breaks_ties_by_sequence() {
        let deliveries = vec![
            delivery(3, (2018, 9, 1)),
            delivery(2, (2018, 9, 1)),
            delivery(1, (2018, 10, 1)),
        ];
        let earliest = earliest_start(&deliveries).unwrap();
        assert_eq!(earliest.aim_seq_number, 2);
        assert_eq!(earliest.date, NaiveDate::from_ymd_opt(2018, 9, 1).unwrap());
        assert_eq!(earliest_start(&[]), None);
    }

    #[test]
    fn programme_start_matches_standard_code() {
        let mut component = delivery(3, (2018, 11, 1));
        component.aim_type = Some(3);
        component.prog_type = Some(25);
        component.std_code = Some(100);
        let deliveries = vec![
            programme(1, (2018, 9, 1), 25, 100),
            programme(2, (2017, 9, 1), 25, 200),
            component.clone(),
        ];
        let start = earliest_programme_start(&deliveries, &component).unwrap();
        assert_eq!(start.aim_seq_number, 1);
    }

    #[test]
    fn no_programme_without_prog_type() {
        let lone = delivery(1, (2018, 9, 1));
        assert_eq!(earliest_programme_start(std::slice::from_ref(&lone), &lone), None);
    }
}
