//! DD22: latest start date for a funding contract.

use ilr_model::LearningDelivery;

use super::{DatedAim, max_start};

/// Programme aim reference recorded against every ESF-funded contract.
pub const ESF_PROGRAMME_AIM: &str = "ZESF0001";

/// Latest start among ESF programme aims recorded against `con_ref_number`.
///
/// Contract references are compared exactly after trimming; the aim
/// reference is compared case-insensitively.
pub fn latest_contract_start(
    deliveries: &[LearningDelivery],
    con_ref_number: &str,
) -> Option<DatedAim> {
    let con_ref_number = con_ref_number.trim();
    if con_ref_number.is_empty() {
        return None;
    }
    max_start(deliveries.iter().filter(|d| {
        d.learn_aim_ref.eq_ignore_ascii_case(ESF_PROGRAMME_AIM)
            && d.con_ref_number.as_deref().map(str::trim) == Some(con_ref_number)
    }))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn esf(seq: i64, start: (i32, u32, u32), con_ref: &str) -> LearningDelivery {
        let mut d = LearningDelivery::new(
            seq,
            ESF_PROGRAMME_AIM,
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        );
        d.con_ref_number = Some(con_ref.to_string());
        d
    }

    #[test]
    fn picks_latest_for_contract() {
        let deliveries = vec![
            esf(1, (2018, 8, 1), "ESF-2108"),
            esf(2, (2018, 10, 1), "ESF-2108"),
            esf(3, (2019, 1, 1), "ESF-9999"),
        ];
        let latest = latest_contract_start(&deliveries, "ESF-2108").unwrap();
        assert_eq!(latest.aim_seq_number, 2);
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2018, 10, 1).unwrap());
    }

    #[test]
    fn ties_resolve_to_lowest_sequence() {
        let deliveries = vec![
            esf(4, (2018, 10, 1), "ESF-2108"),
            esf(2, (2018, 10, 1), "ESF-2108"),
        ];
        assert_eq!(
            latest_contract_start(&deliveries, "ESF-2108").map(|a| a.aim_seq_number),
            Some(2)
        );
    }

    #[test]
    fn non_programme_aims_do_not_qualify() {
        let mut component = esf(1, (2018, 8, 1), "ESF-2108");
        component.learn_aim_ref = "60005415".to_string();
        assert_eq!(latest_contract_start(&[component], "ESF-2108"), None);
        assert_eq!(latest_contract_start(&[], "ESF-2108"), None);
        assert_eq!(
            latest_contract_start(&[esf(1, (2018, 8, 1), "ESF-2108")], "  "),
            None
        );
    }
}
