use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datetime::calendar::{Date, DateTime, Time};
use crate::datetime::value::{CanonicalValue, Mode};

/// Caller-supplied availability constraints, immutable per commit attempt.
///
/// `min > max` is a caller programming error; the engine does not police it.
/// Disabled entries use the canonical string forms (`yyyy-MM-dd`, `HH:mm` or
/// `HH:mm:ss`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_date: Option<Date>,
    pub max_date: Option<Date>,
    pub min_time: Option<Time>,
    pub max_time: Option<Time>,
    pub disabled_dates: IndexSet<String>,
    pub disabled_times: IndexSet<String>,
}

impl Constraints {
    pub fn is_unconstrained(&self) -> bool {
        self.min_date.is_none()
            && self.max_date.is_none()
            && self.min_time.is_none()
            && self.max_time.is_none()
            && self.disabled_dates.is_empty()
            && self.disabled_times.is_empty()
    }
}

/// Why a commit attempt was rejected. At most one reason is ever reported:
/// checks run in declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("this field is required")]
    Required,
    #[error("not a valid calendar date or time")]
    MalformedCalendarDate,
    #[error("value is outside the allowed range")]
    OutOfRange,
    #[error("this date or time is not available")]
    Disabled,
}

/// Validates a candidate value: required → calendar validity → range →
/// disabled list, short-circuiting on the first failure.
pub fn validate(
    value: CanonicalValue,
    mode: Mode,
    constraints: &Constraints,
    required: bool,
) -> Result<(), InvalidReason> {
    let Some(inner) = value.get() else {
        if required {
            return Err(InvalidReason::Required);
        }
        return Ok(());
    };

    if !inner.is_valid() {
        return Err(InvalidReason::MalformedCalendarDate);
    }

    if constraints.is_unconstrained() {
        return Ok(());
    }

    check_range(inner, mode, constraints)?;
    check_disabled(inner, mode, constraints)
}

fn check_range(inner: DateTime, mode: Mode, constraints: &Constraints) -> Result<(), InvalidReason> {
    match mode {
        Mode::Date => {
            if let Some(min) = constraints.min_date
                && inner.date < min
            {
                return Err(InvalidReason::OutOfRange);
            }
            if let Some(max) = constraints.max_date
                && inner.date > max
            {
                return Err(InvalidReason::OutOfRange);
            }
        }
        Mode::Time => {
            if let Some(min) = constraints.min_time
                && inner.time < min
            {
                return Err(InvalidReason::OutOfRange);
            }
            if let Some(max) = constraints.max_time
                && inner.time > max
            {
                return Err(InvalidReason::OutOfRange);
            }
        }
        Mode::DateTime => {
            // With a date bound present the comparison is over the full
            // instant; a lone time bound constrains the time of day.
            if let Some(min_date) = constraints.min_date {
                let floor =
                    DateTime::new(min_date, constraints.min_time.unwrap_or(Time::MIDNIGHT));
                if inner < floor {
                    return Err(InvalidReason::OutOfRange);
                }
            } else if let Some(min) = constraints.min_time
                && inner.time < min
            {
                return Err(InvalidReason::OutOfRange);
            }

            if let Some(max_date) = constraints.max_date {
                let ceiling =
                    DateTime::new(max_date, constraints.max_time.unwrap_or(Time::END_OF_DAY));
                if inner > ceiling {
                    return Err(InvalidReason::OutOfRange);
                }
            } else if let Some(max) = constraints.max_time
                && inner.time > max
            {
                return Err(InvalidReason::OutOfRange);
            }
        }
    }
    Ok(())
}

fn check_disabled(
    inner: DateTime,
    mode: Mode,
    constraints: &Constraints,
) -> Result<(), InvalidReason> {
    if mode.has_date() && constraints.disabled_dates.contains(&inner.date.to_string()) {
        return Err(InvalidReason::Disabled);
    }
    if mode.has_time()
        && (constraints.disabled_times.contains(&inner.time.to_hhmm())
            || constraints.disabled_times.contains(&inner.time.to_string()))
    {
        return Err(InvalidReason::Disabled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::calendar::Date;

    fn date(text: &str) -> Date {
        text.parse().unwrap()
    }

    fn value(text: &str) -> CanonicalValue {
        CanonicalValue::from_date(date(text))
    }

    fn year_2024() -> Constraints {
        Constraints {
            min_date: Some(date("2024-01-01")),
            max_date: Some(date("2024-12-31")),
            ..Constraints::default()
        }
    }

    #[test]
    fn empty_is_fine_unless_required() {
        let constraints = Constraints::default();
        assert_eq!(
            validate(CanonicalValue::EMPTY, Mode::Date, &constraints, false),
            Ok(())
        );
        assert_eq!(
            validate(CanonicalValue::EMPTY, Mode::Date, &constraints, true),
            Err(InvalidReason::Required)
        );
    }

    #[test]
    fn unconstrained_accepts_any_valid_value() {
        let constraints = Constraints::default();
        assert!(constraints.is_unconstrained());
        assert!(!year_2024().is_unconstrained());
        assert_eq!(
            validate(value("1900-01-01"), Mode::Date, &constraints, false),
            Ok(())
        );
    }

    #[test]
    fn required_wins_over_every_other_check() {
        let mut constraints = year_2024();
        constraints.disabled_dates.insert("2024-06-01".to_string());
        assert_eq!(
            validate(CanonicalValue::EMPTY, Mode::Date, &constraints, true),
            Err(InvalidReason::Required)
        );
    }

    #[test]
    fn hand_built_impossible_date_is_malformed() {
        let bogus = CanonicalValue::from_date(Date {
            year: 2024,
            month: 2,
            day: 30,
        });
        assert_eq!(
            validate(bogus, Mode::Date, &year_2024(), false),
            Err(InvalidReason::MalformedCalendarDate)
        );
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let constraints = year_2024();
        assert_eq!(validate(value("2024-01-01"), Mode::Date, &constraints, false), Ok(()));
        assert_eq!(validate(value("2024-12-31"), Mode::Date, &constraints, false), Ok(()));
        assert_eq!(
            validate(value("2023-12-31"), Mode::Date, &constraints, false),
            Err(InvalidReason::OutOfRange)
        );
        assert_eq!(
            validate(value("2025-01-01"), Mode::Date, &constraints, false),
            Err(InvalidReason::OutOfRange)
        );
    }

    #[test]
    fn range_is_checked_before_disabled() {
        let mut constraints = year_2024();
        constraints.disabled_dates.insert("2025-01-01".to_string());
        // Both out of range and disabled: only OutOfRange is reported.
        assert_eq!(
            validate(value("2025-01-01"), Mode::Date, &constraints, false),
            Err(InvalidReason::OutOfRange)
        );
    }

    #[test]
    fn disabled_date_is_rejected() {
        let mut constraints = Constraints::default();
        constraints.disabled_dates.insert("2024-06-01".to_string());
        assert_eq!(
            validate(value("2024-06-01"), Mode::Date, &constraints, false),
            Err(InvalidReason::Disabled)
        );
        assert_eq!(validate(value("2024-06-02"), Mode::Date, &constraints, false), Ok(()));
    }

    #[test]
    fn disabled_times_accept_both_canonical_forms() {
        let mut constraints = Constraints::default();
        constraints.disabled_times.insert("12:30".to_string());
        constraints.disabled_times.insert("13:45:30".to_string());
        let half_past = CanonicalValue::from_time(Time::from_parts(12, 30, 0).unwrap());
        let precise = CanonicalValue::from_time(Time::from_parts(13, 45, 30).unwrap());
        assert_eq!(
            validate(half_past, Mode::Time, &constraints, false),
            Err(InvalidReason::Disabled)
        );
        assert_eq!(
            validate(precise, Mode::Time, &constraints, false),
            Err(InvalidReason::Disabled)
        );
    }

    #[test]
    fn time_range_applies_to_time_mode() {
        let constraints = Constraints {
            min_time: Some(Time::from_parts(9, 0, 0).unwrap()),
            max_time: Some(Time::from_parts(17, 0, 0).unwrap()),
            ..Constraints::default()
        };
        let early = CanonicalValue::from_time(Time::from_parts(8, 59, 59).unwrap());
        let noon = CanonicalValue::from_time(Time::from_parts(12, 0, 0).unwrap());
        assert_eq!(
            validate(early, Mode::Time, &constraints, false),
            Err(InvalidReason::OutOfRange)
        );
        assert_eq!(validate(noon, Mode::Time, &constraints, false), Ok(()));
    }

    #[test]
    fn datetime_range_compares_the_full_instant() {
        let constraints = Constraints {
            min_date: Some(date("2024-01-01")),
            min_time: Some(Time::from_parts(12, 0, 0).unwrap()),
            max_date: Some(date("2024-01-02")),
            max_time: Some(Time::from_parts(12, 0, 0).unwrap()),
            ..Constraints::default()
        };
        let morning_day_one = CanonicalValue::from_datetime(DateTime::new(
            date("2024-01-01"),
            Time::from_parts(8, 0, 0).unwrap(),
        ));
        let evening_day_one = CanonicalValue::from_datetime(DateTime::new(
            date("2024-01-01"),
            Time::from_parts(20, 0, 0).unwrap(),
        ));
        assert_eq!(
            validate(morning_day_one, Mode::DateTime, &constraints, false),
            Err(InvalidReason::OutOfRange)
        );
        // 20:00 on day one is after the per-day window but inside the full
        // instant range.
        assert_eq!(
            validate(evening_day_one, Mode::DateTime, &constraints, false),
            Ok(())
        );
    }

    #[test]
    fn constraints_deserialize_from_canonical_strings() {
        let constraints: Constraints = serde_json::from_str(
            r#"{
                "min_date": "2024-01-01",
                "max_date": "2024-12-31",
                "disabled_dates": ["2024-07-04"],
                "disabled_times": ["12:00"]
            }"#,
        )
        .unwrap();
        assert_eq!(constraints.min_date, Some(date("2024-01-01")));
        assert!(constraints.disabled_dates.contains("2024-07-04"));
        assert_eq!(
            validate(value("2024-07-04"), Mode::Date, &constraints, false),
            Err(InvalidReason::Disabled)
        );
    }
}
