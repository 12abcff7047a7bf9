//! Sales report period token.

use core::fmt;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SalesPeriod`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PeriodError {
    /// The token is not one of `day`, `week`, `month`, `year`.
    #[error("invalid time period: {0}")]
    Invalid(String),
}

/// A reporting window token: the trailing day, week, month, or year.
///
/// Parsed from the path segment of the sales endpoint. Anything outside the
/// four known tokens is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl SalesPeriod {
    /// The canonical lowercase token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Compute the half-open window `[start, end)` ending at `end`,
    /// spanning one unit of this period.
    ///
    /// Month and year subtraction are calendar-aware; when the subtraction
    /// would underflow the calendar (not reachable for real clocks), the
    /// window collapses to empty rather than panicking.
    #[must_use]
    pub fn window_ending(self, end: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            Self::Day => end - Duration::days(1),
            Self::Week => end - Duration::weeks(1),
            Self::Month => end.checked_sub_months(Months::new(1)).unwrap_or(end),
            Self::Year => end.checked_sub_months(Months::new(12)).unwrap_or(end),
        };
        (start, end)
    }
}

impl fmt::Display for SalesPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SalesPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(PeriodError::Invalid(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!("day".parse::<SalesPeriod>().unwrap(), SalesPeriod::Day);
        assert_eq!("week".parse::<SalesPeriod>().unwrap(), SalesPeriod::Week);
        assert_eq!("month".parse::<SalesPeriod>().unwrap(), SalesPeriod::Month);
        assert_eq!("year".parse::<SalesPeriod>().unwrap(), SalesPeriod::Year);
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        assert!(matches!(
            "fortnight".parse::<SalesPeriod>(),
            Err(PeriodError::Invalid(_))
        ));
        // Tokens are case-sensitive
        assert!("Day".parse::<SalesPeriod>().is_err());
        assert!("".parse::<SalesPeriod>().is_err());
    }

    #[test]
    fn test_window_day_and_week() {
        let end = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let (start, window_end) = SalesPeriod::Day.window_ending(end);
        assert_eq!(window_end, end);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap());

        let (start, _) = SalesPeriod::Week.window_ending(end);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_window_month_is_calendar_aware() {
        // March 31 minus one month clamps to Feb 29 (leap year)
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let (start, _) = SalesPeriod::Month.window_ending(end);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_year() {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let (start, _) = SalesPeriod::Year.window_ending(end);
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_display_roundtrip() {
        for period in [
            SalesPeriod::Day,
            SalesPeriod::Week,
            SalesPeriod::Month,
            SalesPeriod::Year,
        ] {
            assert_eq!(period.to_string().parse::<SalesPeriod>().unwrap(), period);
        }
    }
}
