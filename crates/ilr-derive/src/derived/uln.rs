//! DD01: unique learner number check digit.

/// Placeholder ULN used before a learner has been registered.
pub const TEMPORARY_ULN: i64 = 9_999_999_999;

const ULN_MIN: i64 = 1_000_000_000;
const ULN_MAX: i64 = 9_999_999_999;

/// Expected tenth digit for a ten-digit ULN.
///
/// The first nine digits are weighted 10 down to 2 and summed; the check
/// digit is `10 - (sum mod 11)`. Returns `None` when the value is not ten
/// digits long or the remainder is zero, which no valid ULN produces.
pub fn uln_check_digit(uln: i64) -> Option<i64> {
    if !(ULN_MIN..=ULN_MAX).contains(&uln) {
        return None;
    }
    let mut prefix = uln / 10;
    let mut sum = 0;
    for weight in 2..=10 {
        sum += (prefix % 10) * weight;
        prefix /= 10;
    }
    match sum % 11 {
        0 => None,
        remainder => Some(10 - remainder),
    }
}

pub fn uln_is_valid(uln: i64) -> bool {
    uln_check_digit(uln) == Some(uln % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_digit() {
        assert_eq!(uln_check_digit(1_234_567_890), Some(9));
        assert!(uln_is_valid(1_234_567_899));
        assert!(uln_is_valid(1_000_000_000));
        assert!(!uln_is_valid(1_234_567_891));
    }

    #[test]
    fn zero_remainder_is_never_valid() {
        for last in 0..10 {
            assert!(!uln_is_valid(1_000_000_060 + last));
        }
    }

    #[test]
    fn wrong_length_is_invalid() {
        assert_eq!(uln_check_digit(123_456_789), None);
        assert_eq!(uln_check_digit(12_345_678_901), None);
        assert!(!uln_is_valid(-1_234_567_899));
    }

    #[test]
    fn temporary_uln_fails_checksum() {
        assert!(!uln_is_valid(TEMPORARY_ULN));
    }
}
