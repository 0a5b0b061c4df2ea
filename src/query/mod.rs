//! Query planning helpers: result limits and on-this-day date ranges.
//!
//! Nothing here touches the database. The operations in `ops` combine these
//! helpers with the queries in `db::entries`.

use crate::constants::{DATE_FORMAT_ISO, MAX_QUERY_LIMIT, MAX_YEARS_BACK, MIN_QUERY_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::timestamp::from_calendar_time;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};

/// Leap year used to validate month/day pairs so that 02-29 is accepted.
const LEAP_REFERENCE_YEAR: i32 = 2000;

/// Clamps a requested result limit to `[1, 50]`.
///
/// # Examples
///
/// ```
/// use dayone_tools::query::clamp_limit;
///
/// assert_eq!(clamp_limit(0), 1);
/// assert_eq!(clamp_limit(10), 10);
/// assert_eq!(clamp_limit(500), 50);
/// ```
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(MIN_QUERY_LIMIT, MAX_QUERY_LIMIT)
}

/// Clamps the on-this-day lookback window.
pub fn clamp_years_back(years_back: u32) -> u32 {
    years_back.min(MAX_YEARS_BACK)
}

/// A calendar month and day, independent of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Parses `MM-DD`, or `YYYY-MM-DD` with the year ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDate` if the input matches neither format or
    /// names a day that does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use dayone_tools::query::MonthDay;
    ///
    /// assert_eq!(MonthDay::parse("06-14").unwrap(), MonthDay { month: 6, day: 14 });
    /// assert_eq!(MonthDay::parse("2019-06-14").unwrap(), MonthDay { month: 6, day: 14 });
    /// assert!(MonthDay::parse("13-40").is_err());
    /// ```
    pub fn parse(input: &str) -> AppResult<Self> {
        let input = input.trim();
        let invalid = || AppError::InvalidDate(input.to_string());

        let date = match input.len() {
            5 => NaiveDate::parse_from_str(
                &format!("{}-{}", LEAP_REFERENCE_YEAR, input),
                DATE_FORMAT_ISO,
            ),
            10 => NaiveDate::parse_from_str(input, DATE_FORMAT_ISO),
            _ => return Err(invalid()),
        }
        .map_err(|_| invalid())?;

        Ok(MonthDay {
            month: date.month(),
            day: date.day(),
        })
    }

    /// This month/day in `year`, or `None` when it does not exist (02-29 in
    /// a common year).
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

/// The first instant of `date` in local time.
///
/// Where a DST transition skips midnight, the first valid instant of the day
/// is used instead.
fn local_start_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    (0..24).find_map(|hour| {
        date.and_hms_opt(hour, 0, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
    })
}

/// Builds one local-day range per year from `current_year - years_back`
/// through `current_year`, each inclusive at the start and exclusive at the end.
///
/// Years in which the month/day does not exist are skipped.
pub fn day_ranges(
    target: MonthDay,
    years_back: u32,
    current_year: i32,
) -> Vec<(DateTime<Local>, DateTime<Local>)> {
    let first_year = current_year - years_back as i32;
    (first_year..=current_year)
        .filter_map(|year| {
            let day = target.in_year(year)?;
            let next = day.checked_add_signed(Duration::days(1))?;
            Some((local_start_of_day(day)?, local_start_of_day(next)?))
        })
        .collect()
}

/// The same ranges as [`day_ranges`], in storage-epoch seconds.
pub fn storage_day_ranges(target: MonthDay, years_back: u32, current_year: i32) -> Vec<(f64, f64)> {
    day_ranges(target, years_back, current_year)
        .iter()
        .map(|(start, end)| (from_calendar_time(start), from_calendar_time(end)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(51), 50);
        assert_eq!(clamp_limit(500), 50);
    }

    #[test]
    fn test_clamp_years_back() {
        assert_eq!(clamp_years_back(5), 5);
        assert_eq!(clamp_years_back(10_000), MAX_YEARS_BACK);
    }

    #[test]
    fn test_parse_month_day_formats() {
        assert_eq!(
            MonthDay::parse("06-14").unwrap(),
            MonthDay { month: 6, day: 14 }
        );
        assert_eq!(
            MonthDay::parse(" 2020-12-31 ").unwrap(),
            MonthDay { month: 12, day: 31 }
        );
        assert_eq!(
            MonthDay::parse("02-29").unwrap(),
            MonthDay { month: 2, day: 29 }
        );
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        for input in ["13-40", "00-10", "06-31", "June 14", "6-14", "", "2023-02-29", "2024/06/14"] {
            match MonthDay::parse(input) {
                Err(AppError::InvalidDate(_)) => {}
                other => panic!("Expected InvalidDate for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_day_ranges_cover_each_year() {
        let ranges = day_ranges(MonthDay { month: 6, day: 14 }, 3, 2026);
        let years: Vec<i32> = ranges.iter().map(|(start, _)| start.year()).collect();
        assert_eq!(years, vec![2023, 2024, 2025, 2026]);

        for (start, end) in &ranges {
            assert_eq!(start.month(), 6);
            assert_eq!(start.day(), 14);
            assert_eq!(end.day(), 15);
            assert!(start < end);
        }
    }

    #[test]
    fn test_day_ranges_skip_missing_leap_days() {
        let ranges = day_ranges(MonthDay { month: 2, day: 29 }, 4, 2026);
        let years: Vec<i32> = ranges.iter().map(|(start, _)| start.year()).collect();
        assert_eq!(years, vec![2024]);
    }

    #[test]
    fn test_zero_years_back_is_current_year_only() {
        let ranges = storage_day_ranges(MonthDay { month: 1, day: 1 }, 0, 2026);
        assert_eq!(ranges.len(), 1);
        let (start, end) = ranges[0];
        assert!(end > start);
    }
}
