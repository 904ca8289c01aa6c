use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    DATE_SEPARATOR, DATE_TIME_SEPARATOR, Error, HOURS_PER_DAY, MINUTES_PER_DAY, MINUTES_PER_HOUR,
    SECONDS_PER_MINUTE, TIME_SEPARATOR,
    prelude::*,
    types::{Day, Month, Weekday, Year, civil_from_day_number, day_number, days_in_month},
};

/// A Gregorian calendar date inside the supported 1900-2100 window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct SolarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

impl SolarDate {
    /// Creates a date, validating every component against the calendar
    ///
    /// # Errors
    /// Returns `Error::YearOutOfRange`, `Error::InvalidMonth` or
    /// `Error::DayOutOfRange` for a component that does not exist.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, Error> {
        let year_typed = Year::new(year)?;
        let month_typed = Month::new(month)?;
        let day_typed = Day::new(day, year, month)?;
        Ok(Self {
            year:  year_typed,
            month: month_typed,
            day:   day_typed,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Length of this date's month
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year(), self.month())
    }

    /// Days since 1970-01-01
    pub const fn day_number(&self) -> i32 {
        day_number(self.year(), self.month(), self.day())
    }

    /// 1-based day of the year
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn ordinal(&self) -> u16 {
        (self.day_number() - day_number(self.year(), 1, 1) + 1) as u16
    }

    pub const fn weekday(&self) -> Weekday {
        Weekday::from_day_number(self.day_number())
    }

    /// Inverse of [`SolarDate::day_number`]
    ///
    /// # Errors
    /// Returns `Error::YearOutOfRange` if the day falls outside 1900-2100.
    pub fn from_day_number(days: i32) -> Result<Self, Error> {
        let (year, month, day) = civil_from_day_number(days);
        let year = u16::try_from(year).map_err(|_| Error::YearOutOfRange(0))?;
        Self::new(year, month, day)
    }

    /// Moves the date by `days` (negative goes back), carrying month and year
    ///
    /// # Errors
    /// Returns `Error::YearOutOfRange` if the result leaves 1900-2100.
    pub fn add_days(&self, days: i32) -> Result<Self, Error> {
        Self::from_day_number(self.day_number() + days)
    }

    /// The same day-of-month in another month, clamped to that month's length
    ///
    /// # Errors
    /// Returns an error if `year`/`month` are not valid.
    pub fn clamped(year: u16, month: u8, day: u8) -> Result<Self, Error> {
        Month::new(month)?;
        Year::new(year)?;
        Self::new(year, month, day.min(days_in_month(year, month)))
    }

    /// Chinese long form, e.g. `2025年05月29日`
    pub fn to_chinese(&self) -> String {
        format!("{:04}年{:02}月{:02}日", self.year(), self.month(), self.day())
    }
}

impl FromStr for SolarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }

        // ISO format only: YYYY-MM-DD
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(Error::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} {DATE_SEPARATOR} separators",
                parts.len() - 1
            )));
        }
        // Parse components - InvalidFormat if not numeric
        let year = parse_u16(parts[0])?;
        let month = parse_u8(parts[1])?;
        let day = parse_u8(parts[2])?;

        Self::new(year, month, day)
    }
}

impl Serialize for SolarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SolarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A wall-clock instant with second resolution, as the RTC reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{date} {hour:02}:{minute:02}:{second:02}")]
pub struct SolarDateTime {
    date:   SolarDate,
    hour:   u8,
    minute: u8,
    second: u8,
}

impl SolarDateTime {
    /// Combines a date with a time of day
    ///
    /// # Errors
    /// Returns `Error::InvalidTime` for an hour, minute or second out of range.
    pub fn new(date: SolarDate, hour: u8, minute: u8, second: u8) -> Result<Self, Error> {
        if hour >= HOURS_PER_DAY || minute >= MINUTES_PER_HOUR || second >= SECONDS_PER_MINUTE {
            return Err(Error::InvalidTime {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            date,
            hour,
            minute,
            second,
        })
    }

    /// Builds an instant from raw RTC components
    ///
    /// # Errors
    /// Returns the first validation error of any component.
    pub fn from_components(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, Error> {
        Self::new(SolarDate::new(year, month, day)?, hour, minute, second)
    }

    pub const fn date(&self) -> SolarDate {
        self.date
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    pub const fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Minutes elapsed since midnight
    pub const fn minute_of_day(&self) -> u16 {
        self.hour as u16 * MINUTES_PER_HOUR as u16 + self.minute as u16
    }

    /// Absolute minute count (day number and minute of day), ignoring seconds
    pub const fn total_minutes(&self) -> i64 {
        self.date.day_number() as i64 * MINUTES_PER_DAY + self.minute_of_day() as i64
    }

    /// Moves the instant by whole minutes, keeping the second
    ///
    /// # Errors
    /// Returns `Error::YearOutOfRange` if the result leaves 1900-2100.
    pub fn add_minutes(&self, minutes: i64) -> Result<Self, Error> {
        let total = self.total_minutes() + minutes;
        let days = i32::try_from(total.div_euclid(MINUTES_PER_DAY))
            .map_err(|_| Error::YearOutOfRange(0))?;
        let minute_of_day = total.rem_euclid(MINUTES_PER_DAY);
        let date = SolarDate::from_day_number(days)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (hour, minute) = (
            (minute_of_day / i64::from(MINUTES_PER_HOUR)) as u8,
            (minute_of_day % i64::from(MINUTES_PER_HOUR)) as u8,
        );
        Self::new(date, hour, minute, self.second)
    }
}

impl FromStr for SolarDateTime {
    type Err = Error;

    /// Parses `YYYY-MM-DD HH:MM[:SS]` (a `T` is accepted in place of the space)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }

        let (date_str, time_str) = trimmed
            .split_once(DATE_TIME_SEPARATOR)
            .or_else(|| trimmed.split_once('T'))
            .ok_or_else(|| Error::InvalidFormat(format!("Missing time of day: {s}")))?;
        let date = date_str.parse::<SolarDate>()?;

        let parts: Vec<&str> = time_str.trim().split(TIME_SEPARATOR).collect();
        let (hour, minute, second) = match parts.as_slice() {
            [h, m] => (parse_u8(h)?, parse_u8(m)?, 0),
            [h, m, sec] => (parse_u8(h)?, parse_u8(m)?, parse_u8(sec)?),
            _ => {
                return Err(Error::InvalidFormat(format!(
                    "Expected HH{TIME_SEPARATOR}MM[{TIME_SEPARATOR}SS]: {time_str}"
                )));
            },
        };

        Self::new(date, hour, minute, second)
    }
}

impl Serialize for SolarDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SolarDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Helper to parse u16 with better error messages
fn parse_u16(s: &str) -> Result<u16, Error> {
    s.parse::<u16>()
        .map_err(|_| Error::InvalidFormat(s.to_owned()))
}

/// Helper to parse u8 with better error messages
fn parse_u8(s: &str) -> Result<u8, Error> {
    s.parse::<u8>()
        .map_err(|_| Error::InvalidFormat(s.to_owned()))
}

/// Whether `(year, month, day)` names a real date in the supported window
pub fn is_valid_date(year: u16, month: u8, day: u8) -> bool {
    Year::new(year).is_ok() && Month::new(month).is_ok() && Day::new(day, year, month).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, datetime};

    #[test]
    fn test_new_rejects_invalid_components() {
        assert!(matches!(SolarDate::new(1899, 12, 31), Err(Error::YearOutOfRange(1899))));
        assert!(matches!(SolarDate::new(2025, 13, 1), Err(Error::InvalidMonth(13))));
        assert!(matches!(SolarDate::new(2025, 2, 29), Err(Error::DayOutOfRange { .. })));
        assert!(SolarDate::new(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_display_and_parse() {
        let d = date(2025, 5, 29);
        assert_eq!(d.to_string(), "2025-05-29");
        assert_eq!("2025-05-29".parse::<SolarDate>().unwrap(), d);
        assert_eq!(" 2025-5-29 ".parse::<SolarDate>().unwrap(), d);
        assert_eq!(d.to_chinese(), "2025年05月29日");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<SolarDate>(), Err(Error::EmptyInput)));
        assert!(matches!("2025-05".parse::<SolarDate>(), Err(Error::InvalidFormat(_))));
        assert!(matches!("2025-xx-01".parse::<SolarDate>(), Err(Error::InvalidFormat(_))));
        assert!(matches!("2025-02-30".parse::<SolarDate>(), Err(Error::DayOutOfRange { .. })));
    }

    #[test]
    fn test_add_days_rollover() {
        struct TestCase {
            start:    (u16, u8, u8),
            days:     i32,
            expected: (u16, u8, u8),
        }

        let cases = [
            TestCase {
                start:    (2025, 1, 28),
                days:     7,
                expected: (2025, 2, 4),
            },
            TestCase {
                start:    (2024, 2, 28),
                days:     1,
                expected: (2024, 2, 29),
            },
            TestCase {
                start:    (2023, 2, 28),
                days:     1,
                expected: (2023, 3, 1),
            },
            TestCase {
                start:    (2025, 12, 29),
                days:     7,
                expected: (2026, 1, 5),
            },
            TestCase {
                start:    (2025, 3, 1),
                days:     -1,
                expected: (2025, 2, 28),
            },
        ];

        for case in &cases {
            let (y, m, d) = case.start;
            let (ey, em, ed) = case.expected;
            assert_eq!(
                date(y, m, d).add_days(case.days).unwrap(),
                date(ey, em, ed),
                "{y}-{m}-{d} + {}",
                case.days
            );
        }
    }

    #[test]
    fn test_add_days_out_of_window() {
        assert!(matches!(date(2100, 12, 31).add_days(1), Err(Error::YearOutOfRange(2101))));
        assert!(matches!(date(1900, 1, 1).add_days(-1), Err(Error::YearOutOfRange(1899))));
    }

    #[test]
    fn test_ordinal_and_weekday() {
        assert_eq!(date(2025, 1, 1).ordinal(), 1);
        assert_eq!(date(2024, 12, 31).ordinal(), 366);
        assert_eq!(date(2025, 12, 31).ordinal(), 365);
        assert_eq!(date(2025, 5, 29).weekday(), Weekday::Thursday);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(SolarDate::clamped(2025, 4, 31).unwrap(), date(2025, 4, 30));
        assert_eq!(SolarDate::clamped(2025, 2, 31).unwrap(), date(2025, 2, 28));
        assert_eq!(SolarDate::clamped(2024, 2, 31).unwrap(), date(2024, 2, 29));
        assert!(SolarDate::clamped(2025, 0, 1).is_err());
    }

    #[test]
    fn test_month_lengths_need_a_valid_month() {
        let expected = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (month, days) in (1..=12).zip(expected) {
            assert_eq!(date(2024, month, 1).days_in_month(), days, "month {month}");
        }
        assert!(matches!(SolarDate::clamped(2025, 13, 31), Err(Error::InvalidMonth(13))));
        assert!(matches!(SolarDate::clamped(2025, 0, 31), Err(Error::InvalidMonth(0))));
    }

    #[test]
    fn test_datetime_validation() {
        let d = date(2025, 5, 29);
        assert!(SolarDateTime::new(d, 23, 59, 59).is_ok());
        assert!(matches!(SolarDateTime::new(d, 24, 0, 0), Err(Error::InvalidTime { .. })));
        assert!(matches!(SolarDateTime::new(d, 0, 60, 0), Err(Error::InvalidTime { .. })));
        assert!(matches!(SolarDateTime::new(d, 0, 0, 60), Err(Error::InvalidTime { .. })));
    }

    #[test]
    fn test_datetime_parse_and_display() {
        let dt = datetime(2025, 5, 29, 8, 30, 5);
        assert_eq!(dt.to_string(), "2025-05-29 08:30:05");
        assert_eq!("2025-05-29 08:30:05".parse::<SolarDateTime>().unwrap(), dt);
        assert_eq!("2025-05-29T08:30:05".parse::<SolarDateTime>().unwrap(), dt);
        assert_eq!(
            "2025-05-29 08:30".parse::<SolarDateTime>().unwrap(),
            datetime(2025, 5, 29, 8, 30, 0)
        );
        assert!("2025-05-29".parse::<SolarDateTime>().is_err());
        assert!("2025-05-29 8".parse::<SolarDateTime>().is_err());
    }

    #[test]
    fn test_datetime_ordering() {
        assert!(datetime(2025, 5, 29, 8, 30, 0) < datetime(2025, 5, 29, 8, 31, 0));
        assert!(datetime(2025, 5, 29, 23, 59, 59) < datetime(2025, 5, 30, 0, 0, 0));
    }

    #[test]
    fn test_add_minutes() {
        let dt = datetime(2025, 12, 31, 23, 30, 15);
        assert_eq!(dt.add_minutes(30).unwrap(), datetime(2026, 1, 1, 0, 0, 15));
        assert_eq!(dt.add_minutes(-24 * 60).unwrap(), datetime(2025, 12, 30, 23, 30, 15));
        assert_eq!(
            datetime(2025, 3, 1, 0, 10, 0).add_minutes(-11).unwrap(),
            datetime(2025, 2, 28, 23, 59, 0)
        );
    }

    #[test]
    fn test_serde_as_strings() {
        let dt = datetime(2025, 5, 29, 8, 30, 0);
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, r#""2025-05-29 08:30:00""#);
        let parsed: SolarDateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dt);

        let rejected: Result<SolarDate, _> = serde_json::from_str(r#""2025-02-30""#);
        assert!(rejected.is_err());
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date(2024, 2, 29));
        assert!(!is_valid_date(2023, 2, 29));
        assert!(!is_valid_date(2101, 1, 1));
    }
}
