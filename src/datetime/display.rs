use serde::{Deserialize, Serialize};

use crate::datetime::calendar::{Date, Time};
use crate::datetime::value::{CanonicalValue, Mode};

/// Order of the date components in the human-facing display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    YearMonthDay,
    MonthDayYear,
    DayMonthYear,
}

/// Display preferences. These may change between renders; the canonical
/// output never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub use_12_hour: bool,
    pub include_seconds: bool,
    pub date_order: DateOrder,
}

/// Preference-aware display string for an unfocused field.
///
/// Display-only. Under `DateOrder::DayMonthYear` the output reads back
/// month-first through the fixed template precedence, so this string must
/// not be fed back into `parse`; the field re-seeds its typing buffer from
/// the committed value's digits, never from this rendering.
pub fn to_display(value: CanonicalValue, mode: Mode, options: &DisplayOptions) -> String {
    let Some(inner) = value.get() else {
        return String::new();
    };

    match mode {
        Mode::Date => display_date(inner.date, options.date_order),
        Mode::Time => display_time(inner.time, options),
        Mode::DateTime => format!(
            "{} {}",
            display_date(inner.date, options.date_order),
            display_time(inner.time, options)
        ),
    }
}

/// The stable machine value handed to the surrounding form. Bit-stable for a
/// given value: `Date` → `yyyy-MM-dd`, `Time` → `HH:mm`[`:ss`], `DateTime` →
/// `yyyy-MM-ddTHH:mm:ss`. This is a wire contract; do not change it.
pub fn to_canonical_output(value: CanonicalValue, mode: Mode, include_seconds: bool) -> String {
    let Some(inner) = value.get() else {
        return String::new();
    };

    match mode {
        Mode::Date => inner.date.to_string(),
        Mode::Time => {
            if include_seconds {
                inner.time.to_string()
            } else {
                inner.time.to_hhmm()
            }
        }
        Mode::DateTime => inner.to_string(),
    }
}

fn display_date(date: Date, order: DateOrder) -> String {
    match order {
        DateOrder::YearMonthDay => date.to_string(),
        DateOrder::MonthDayYear => {
            format!("{:02}/{:02}/{:04}", date.month, date.day, date.year)
        }
        DateOrder::DayMonthYear => {
            format!("{:02}/{:02}/{:04}", date.day, date.month, date.year)
        }
    }
}

fn display_time(time: Time, options: &DisplayOptions) -> String {
    if options.use_12_hour {
        let (hour12, meridiem) = match time.hour {
            0 => (12, "AM"),
            12 => (12, "PM"),
            hour if hour > 12 => (hour - 12, "PM"),
            hour => (hour, "AM"),
        };
        if options.include_seconds {
            format!("{:02}:{:02}:{:02} {}", hour12, time.minute, time.second, meridiem)
        } else {
            format!("{:02}:{:02} {}", hour12, time.minute, meridiem)
        }
    } else if options.include_seconds {
        time.to_string()
    } else {
        time.to_hhmm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::calendar::DateTime;
    use crate::datetime::parse::{parse, Parsed};

    fn sample() -> CanonicalValue {
        CanonicalValue::from_datetime(DateTime::new(
            Date::from_parts(2024, 2, 29).unwrap(),
            Time::from_parts(13, 15, 0).unwrap(),
        ))
    }

    #[test]
    fn empty_value_renders_empty_strings() {
        let empty = CanonicalValue::EMPTY;
        assert_eq!(to_display(empty, Mode::DateTime, &DisplayOptions::default()), "");
        assert_eq!(to_canonical_output(empty, Mode::Date, false), "");
    }

    #[test]
    fn canonical_output_per_mode() {
        let value = sample();
        assert_eq!(to_canonical_output(value, Mode::Date, false), "2024-02-29");
        assert_eq!(to_canonical_output(value, Mode::Time, false), "13:15");
        assert_eq!(to_canonical_output(value, Mode::Time, true), "13:15:00");
        assert_eq!(
            to_canonical_output(value, Mode::DateTime, false),
            "2024-02-29T13:15:00"
        );
    }

    #[test]
    fn display_respects_date_order() {
        let value = sample();
        let mut options = DisplayOptions::default();
        assert_eq!(to_display(value, Mode::Date, &options), "2024-02-29");
        options.date_order = DateOrder::MonthDayYear;
        assert_eq!(to_display(value, Mode::Date, &options), "02/29/2024");
        options.date_order = DateOrder::DayMonthYear;
        assert_eq!(to_display(value, Mode::Date, &options), "29/02/2024");
    }

    #[test]
    fn display_respects_clock_preference() {
        let value = sample();
        let mut options = DisplayOptions::default();
        assert_eq!(to_display(value, Mode::Time, &options), "13:15");
        options.use_12_hour = true;
        assert_eq!(to_display(value, Mode::Time, &options), "01:15 PM");
        options.include_seconds = true;
        assert_eq!(to_display(value, Mode::Time, &options), "01:15:00 PM");
    }

    #[test]
    fn twelve_hour_edges() {
        let midnight = CanonicalValue::from_time(Time::MIDNIGHT);
        let noon = CanonicalValue::from_time(Time::from_parts(12, 0, 0).unwrap());
        let options = DisplayOptions {
            use_12_hour: true,
            ..DisplayOptions::default()
        };
        assert_eq!(to_display(midnight, Mode::Time, &options), "12:00 AM");
        assert_eq!(to_display(noon, Mode::Time, &options), "12:00 PM");
    }

    #[test]
    fn day_first_display_is_not_a_parse_input() {
        // "02/01/2024" reads back month-first under the fixed template
        // precedence, so the day-first rendering must never be reparsed.
        let value = CanonicalValue::from_date(Date::from_parts(2024, 1, 2).unwrap());
        let options = DisplayOptions {
            date_order: DateOrder::DayMonthYear,
            ..DisplayOptions::default()
        };
        let text = to_display(value, Mode::Date, &options);
        assert_eq!(text, "02/01/2024");
        let reparsed = parse(&text, Mode::Date).unwrap();
        assert_eq!(
            reparsed,
            Parsed::Value(DateTime::new(
                Date::from_parts(2024, 2, 1).unwrap(),
                Time::MIDNIGHT,
            ))
        );
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let value = sample();
        for mode in [Mode::Date, Mode::Time, Mode::DateTime] {
            for use_12_hour in [false, true] {
                let options = DisplayOptions {
                    use_12_hour,
                    include_seconds: true,
                    date_order: DateOrder::default(),
                };
                let text = to_display(value, mode, &options);
                let reparsed = parse(&text, mode).unwrap();
                let Parsed::Value(round) = reparsed else {
                    panic!("display text {text:?} did not reparse");
                };
                if mode.has_date() {
                    assert_eq!(round.date, value.date().unwrap());
                }
                if mode.has_time() {
                    assert_eq!(round.time, value.time().unwrap());
                }
            }
        }
    }
}
