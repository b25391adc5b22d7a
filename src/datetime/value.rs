use serde::{Deserialize, Serialize};

use crate::datetime::calendar::{Date, DateTime, Time};

/// What a field instance represents. Fixed for the widget's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Date,
    Time,
    DateTime,
}

impl Mode {
    pub fn has_date(self) -> bool {
        matches!(self, Mode::Date | Mode::DateTime)
    }

    pub fn has_time(self) -> bool {
        matches!(self, Mode::Time | Mode::DateTime)
    }
}

/// Reference date carried internally by `Time`-mode values so every mode can
/// share one `DateTime` representation. It never reaches canonical output.
pub const REFERENCE_DATE: Date = Date {
    year: 1970,
    month: 1,
    day: 1,
};

/// The authoritative, format-independent value of a field.
///
/// Empty means "no value entered", distinct from any parse failure. The
/// inner `DateTime` always holds both components; the mode decides which
/// ones are visible on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanonicalValue {
    inner: Option<DateTime>,
}

impl CanonicalValue {
    pub const EMPTY: Self = Self { inner: None };

    pub fn from_date(date: Date) -> Self {
        Self {
            inner: Some(DateTime::new(date, Time::MIDNIGHT)),
        }
    }

    pub fn from_time(time: Time) -> Self {
        Self {
            inner: Some(DateTime::new(REFERENCE_DATE, time)),
        }
    }

    pub fn from_datetime(value: DateTime) -> Self {
        Self { inner: Some(value) }
    }

    pub fn is_empty(self) -> bool {
        self.inner.is_none()
    }

    pub fn get(self) -> Option<DateTime> {
        self.inner
    }

    pub fn date(self) -> Option<Date> {
        self.inner.map(|v| v.date)
    }

    pub fn time(self) -> Option<Time> {
        self.inner.map(|v| v.time)
    }

    /// Replaces the date component, keeping any existing time.
    pub fn with_date(self, date: Date) -> Self {
        let time = self.time().unwrap_or(Time::MIDNIGHT);
        Self {
            inner: Some(DateTime::new(date, time)),
        }
    }

    /// Replaces the time component, keeping any existing date.
    pub fn with_time(self, time: Time) -> Self {
        let date = self.date().unwrap_or(REFERENCE_DATE);
        Self {
            inner: Some(DateTime::new(date, time)),
        }
    }
}
