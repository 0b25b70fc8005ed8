use chrono::{Duration, NaiveDate};

/// Format every date in the API uses, both on the wire and in the store.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// A date string that does not parse as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{input}': expected YYYY-MM-DD")]
pub struct DateParseError {
    /// The raw input as received.
    pub input: String,
}

/// Parse a user-supplied `YYYY-MM-DD` date.
pub fn parse_api_date(input: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input, API_DATE_FORMAT).map_err(|_| DateParseError {
        input: input.to_string(),
    })
}

/// Render a date the way the store and JSON keys expect it.
pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

/// First date of the trailing window that ends at `latest`.
///
/// `None` when the window reaches past the range `NaiveDate` can represent.
pub fn cutoff_date(latest: NaiveDate, lookback_days: i64) -> Option<NaiveDate> {
    latest.checked_sub_signed(Duration::try_days(lookback_days)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_date_valid() {
        let date = parse_api_date("2017-08-23").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2017, 8, 23).unwrap());
    }

    #[test]
    fn test_parse_api_date_rejects_garbage() {
        let err = parse_api_date("not-a-date").unwrap_err();
        assert_eq!(err.input, "not-a-date");
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_parse_api_date_rejects_impossible_day() {
        assert!(parse_api_date("2017-02-30").is_err());
        assert!(parse_api_date("2017-13-01").is_err());
    }

    #[test]
    fn test_parse_api_date_rejects_other_layouts() {
        assert!(parse_api_date("08/23/2017").is_err());
        assert!(parse_api_date("20170823").is_err());
        assert!(parse_api_date("").is_err());
    }

    #[test]
    fn test_format_api_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2016, 1, 5).unwrap();
        assert_eq!(format_api_date(date), "2016-01-05");
    }

    #[test]
    fn test_cutoff_date_one_year_back() {
        let latest = NaiveDate::from_ymd_opt(2017, 8, 23).unwrap();
        assert_eq!(
            cutoff_date(latest, 365),
            NaiveDate::from_ymd_opt(2016, 8, 23)
        );
    }

    #[test]
    fn test_cutoff_date_crosses_leap_day() {
        // 2016 is a leap year, so 365 days before 2016-03-01 is 2015-03-02.
        let latest = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        assert_eq!(
            cutoff_date(latest, 365),
            NaiveDate::from_ymd_opt(2015, 3, 2)
        );
    }

    #[test]
    fn test_cutoff_date_out_of_range() {
        let latest = NaiveDate::from_ymd_opt(2017, 8, 23).unwrap();
        assert_eq!(cutoff_date(latest, 200_000_000), None);
        assert_eq!(cutoff_date(latest, i64::MAX), None);
    }
}
