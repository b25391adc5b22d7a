use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar date in the proleptic Gregorian calendar.
///
/// Fields are public for cheap destructuring; use [`Date::from_parts`] when
/// the components come from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// A wall-clock time of day (24-hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// A local date + time pair. No timezone semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

/// Monday-first weekday index (Mo = 0 … Su = 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weekday(pub u8);

impl Weekday {
    pub const MON: Self = Self(0);
    pub const SUN: Self = Self(6);

    pub fn short_name(self) -> &'static str {
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"][self.0 as usize % 7]
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Date {
    pub fn from_parts(year: i32, month: u8, day: u8) -> Result<Self, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("invalid month: {month}"));
        }
        let max_day = days_in_month(year, month);
        if day < 1 || day > max_day {
            return Err(format!("invalid day {day} for {month}/{year} (max {max_day})"));
        }
        Ok(Date { year, month, day })
    }

    /// Whether the stored components still describe a real calendar date.
    /// Fields are public, so a caller can build an impossible date by hand.
    pub fn is_valid(self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
    }

    /// Days since 1970-01-01, negative before the epoch.
    pub fn to_unix_days(self) -> i64 {
        let y = if self.month <= 2 {
            self.year as i64 - 1
        } else {
            self.year as i64
        };
        let era = if y >= 0 { y } else { y - 399 } / 400;
        let yoe = y - era * 400;
        let m = self.month as i64;
        let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + self.day as i64 - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146097 + doe - 719468
    }

    pub fn from_unix_days(days: i64) -> Self {
        let z = days + 719468;
        let era = if z >= 0 { z } else { z - 146096 } / 146097;
        let doe = z - era * 146097;
        let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
        let y = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let d = doy - (153 * mp + 2) / 5 + 1;
        let m = if mp < 10 { mp + 3 } else { mp - 9 };
        let y = if m <= 2 { y + 1 } else { y };
        Date {
            year: y as i32,
            month: m as u8,
            day: d as u8,
        }
    }

    pub fn weekday(self) -> Weekday {
        // 1970-01-01 was a Thursday (Monday-first index 3).
        Weekday(((self.to_unix_days() + 3).rem_euclid(7)) as u8)
    }

    pub fn add_days(self, delta: i32) -> Self {
        Self::from_unix_days(self.to_unix_days() + delta as i64)
    }

    /// Adds whole months, clamping the day to the target month's length
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn add_months(self, delta: i32) -> Self {
        let total = self.month as i32 - 1 + delta;
        let year = self.year + total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u8;
        let day = self.day.min(days_in_month(year, month));
        Date { year, month, day }
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12]
    }
}

impl Time {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };
    pub const END_OF_DAY: Self = Self {
        hour: 23,
        minute: 59,
        second: 59,
    };

    pub fn from_parts(hour: u8, minute: u8, second: u8) -> Result<Self, String> {
        if hour > 23 {
            return Err(format!("invalid hour: {hour}"));
        }
        if minute > 59 {
            return Err(format!("invalid minute: {minute}"));
        }
        if second > 59 {
            return Err(format!("invalid second: {second}"));
        }
        Ok(Time {
            hour,
            minute,
            second,
        })
    }

    pub fn is_valid(self) -> bool {
        self.hour <= 23 && self.minute <= 59 && self.second <= 59
    }
}

impl DateTime {
    pub fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    pub fn is_valid(self) -> bool {
        self.date.is_valid() && self.time.is_valid()
    }
}

pub fn today() -> Date {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    Date::from_unix_days(secs.div_euclid(86400))
}

pub fn now_time() -> Time {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Time {
        hour: ((secs / 3600) % 24) as u8,
        minute: ((secs / 60) % 60) as u8,
        second: (secs % 60) as u8,
    }
}

// ---------------------------------------------------------------------------
// Canonical text forms (the wire format; see display.rs for preference-aware
// rendering).
// ---------------------------------------------------------------------------

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl Time {
    pub fn to_hhmm(self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

impl FromStr for Date {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(|| format!("not a date: {s:?}"))?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(|| format!("not a date: {s:?}"))?;
        let day = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(|| format!("not a date: {s:?}"))?;
        Date::from_parts(year, month, day)
    }
}

impl FromStr for Time {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let hour = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(|| format!("not a time: {s:?}"))?;
        let minute = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(|| format!("not a time: {s:?}"))?;
        let second = match parts.next() {
            Some(p) => p.parse::<u8>().map_err(|_| format!("not a time: {s:?}"))?,
            None => 0,
        };
        Time::from_parts(hour, minute, second)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Month grid
// ---------------------------------------------------------------------------

/// The day matrix for one month: complete rows of 7 cells, `None` for the
/// leading cells before day 1 and the trailing cells after the last day.
///
/// The grid is a pure function of `(year, month)`; "today" and "selected"
/// highlighting is the caller's comparison against these cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u8,
    pub rows: Vec<[Option<u8>; 7]>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u8) -> Self {
        let first = Date {
            year,
            month,
            day: 1,
        }
        .weekday()
        .0 as usize;
        let days = days_in_month(year, month) as usize;
        let row_count = (first + days).div_ceil(7);
        let mut rows = vec![[None; 7]; row_count];
        for day in 1..=days {
            let pos = first + day - 1;
            rows[pos / 7][pos % 7] = Some(day as u8);
        }
        MonthGrid { year, month, rows }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12]
    }

    /// Number of real day cells (equals the month length).
    pub fn day_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn february_length_tracks_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn date_from_parts_rejects_impossible_days() {
        assert!(Date::from_parts(2024, 2, 29).is_ok());
        assert!(Date::from_parts(2023, 2, 29).is_err());
        assert!(Date::from_parts(2024, 2, 30).is_err());
        assert!(Date::from_parts(2024, 13, 1).is_err());
        assert!(Date::from_parts(2024, 6, 0).is_err());
    }

    #[test]
    fn unix_day_round_trip() {
        for &(y, m, d) in &[(1970, 1, 1), (1999, 12, 31), (2024, 2, 29), (1899, 3, 15)] {
            let date = Date::from_parts(y, m, d).unwrap();
            assert_eq!(Date::from_unix_days(date.to_unix_days()), date);
        }
        assert_eq!(Date::from_parts(1970, 1, 1).unwrap().to_unix_days(), 0);
    }

    #[test]
    fn weekday_is_monday_first() {
        // 2024-01-01 was a Monday, 1970-01-01 a Thursday.
        assert_eq!(Date::from_parts(2024, 1, 1).unwrap().weekday(), Weekday::MON);
        assert_eq!(Date::from_parts(1970, 1, 1).unwrap().weekday(), Weekday(3));
        assert_eq!(Date::from_parts(2024, 3, 3).unwrap().weekday(), Weekday::SUN);
    }

    #[test]
    fn add_months_clamps_day() {
        let jan31 = Date::from_parts(2024, 1, 31).unwrap();
        assert_eq!(jan31.add_months(1), Date::from_parts(2024, 2, 29).unwrap());
        assert_eq!(jan31.add_months(-2), Date::from_parts(2023, 11, 30).unwrap());
        assert_eq!(jan31.add_months(12), Date::from_parts(2025, 1, 31).unwrap());
    }

    #[test]
    fn add_days_crosses_month_and_year_boundaries() {
        let date = Date::from_parts(2023, 12, 31).unwrap();
        assert_eq!(date.add_days(1), Date::from_parts(2024, 1, 1).unwrap());
        assert_eq!(date.add_days(60), Date::from_parts(2024, 2, 29).unwrap());
        assert_eq!(date.add_days(-31), Date::from_parts(2023, 11, 30).unwrap());
    }

    #[test]
    fn canonical_text_round_trip() {
        let date: Date = "2024-02-29".parse().unwrap();
        assert_eq!(date.to_string(), "2024-02-29");
        let time: Time = "13:15".parse().unwrap();
        assert_eq!(time.to_hhmm(), "13:15");
        assert_eq!(time.to_string(), "13:15:00");
        assert!("2024-02-30".parse::<Date>().is_err());
        assert!("24:00".parse::<Time>().is_err());
    }

    #[test]
    fn month_grid_is_deterministic_and_leap_aware() {
        let feb24 = MonthGrid::new(2024, 2);
        assert_eq!(feb24.day_count(), 29);
        let feb23 = MonthGrid::new(2023, 2);
        assert_eq!(feb23.day_count(), 28);
        assert_eq!(feb24, MonthGrid::new(2024, 2));
    }

    #[test]
    fn month_grid_aligns_first_day_and_pads_rows() {
        // February 2024 starts on a Thursday (column 3, Monday-first).
        let grid = MonthGrid::new(2024, 2);
        assert_eq!(grid.rows[0][3], Some(1));
        assert_eq!(grid.rows[0][0], None);
        let last = grid.rows.last().unwrap();
        assert_eq!(last[3], Some(29));
        assert_eq!(last[4], None);
        assert!(grid.rows.iter().all(|row| row.len() == 7));
    }

    #[test]
    fn month_grid_five_full_weeks_has_no_padding_row() {
        // April 2024: starts Monday, 30 days -> exactly 5 rows (last row short).
        let grid = MonthGrid::new(2024, 4);
        assert_eq!(grid.rows[0][0], Some(1));
        assert_eq!(grid.rows.len(), 5);
    }
}
