use chrono::NaiveDate;
use common::error::ValidationError;

/// Parses a "MM-YYYY" string into the first day of that month.
///
/// The month must be two digits (01..=12) and the year four digits. `field` names the
/// request field in the returned error.
pub fn parse_period(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };

    let (month, year) = value.split_once('-').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 4 || !is_digits(month) || !is_digits(year) {
        return Err(invalid());
    }

    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_anchors_to_first_day() {
        assert_eq!(
            parse_period("start_date", "02-2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(
            parse_period("start_date", "12-1999").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_period_rejects_bad_input() {
        for input in [
            "13-2024", "00-2024", "02-abcd", "2-2024", "02-24", "2024-02", "02/2024", "", "-",
            "+2-2024", "02-2024 ", "02-2024-01",
        ] {
            assert!(
                parse_period("start_date", input).is_err(),
                "expected '{}' to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_period_error_names_field() {
        assert_eq!(
            parse_period("end_date", "13-2024"),
            Err(ValidationError::InvalidDate {
                field: "end_date",
                value: "13-2024".to_string(),
            })
        );
    }
}
