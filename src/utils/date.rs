use chrono::NaiveDate;

use crate::core::parse_generic;
use crate::error::AppError;

/// Parse a date given on the command line
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    parse_generic(s).ok_or_else(|| AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Parse an optional date flag
pub(crate) fn parse_date_opt(s: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    s.map(parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn accepts_compact_iso_and_long_forms() {
        assert_eq!(parse_date("20241231").unwrap(), d(2024, 12, 31));
        assert_eq!(parse_date("2024-12-31").unwrap(), d(2024, 12, 31));
        assert_eq!(parse_date("December 31, 2024").unwrap(), d(2024, 12, 31));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("yesterday").unwrap_err();
        assert!(matches!(err, AppError::InvalidDate { .. }));
    }

    #[test]
    fn optional_flag() {
        assert_eq!(parse_date_opt(None).unwrap(), None);
        assert_eq!(parse_date_opt(Some("2024-01-05")).unwrap(), Some(d(2024, 1, 5)));
        assert!(parse_date_opt(Some("2024-13-01")).is_err());
    }
}
