use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::datetime::calendar::{Date, DateTime, Time};
use crate::datetime::template::{parse_templates, SegmentRole, Template};
use crate::datetime::value::{Mode, REFERENCE_DATE};

/// Outcome of a successful parse. Empty input is an intentional clear, not a
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    Cleared,
    Value(DateTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized date/time format")]
    NoMatchingTemplate,
    #[error("not a valid calendar date or time")]
    InvalidDate,
}

/// Parses free text against the fixed template list for `mode`.
///
/// The first template whose shape matches AND whose numbers form a real
/// calendar value wins; list position is the only tie-break. A generic
/// numeric-token pass runs before giving up entirely.
pub fn parse(text: &str, mode: Mode) -> Result<Parsed, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Parsed::Cleared);
    }

    let mut saw_invalid_calendar = false;

    for template in parse_templates(mode) {
        match match_template(trimmed, template) {
            Match::Value(value) => {
                trace!(template = template.spec, "template matched");
                return Ok(Parsed::Value(value));
            }
            Match::ShapeOnly => saw_invalid_calendar = true,
            Match::NoShape => {}
        }
    }

    match best_effort(trimmed, mode) {
        Match::Value(value) => {
            trace!("numeric fallback matched");
            Ok(Parsed::Value(value))
        }
        Match::ShapeOnly => Err(ParseError::InvalidDate),
        Match::NoShape => {
            if saw_invalid_calendar {
                Err(ParseError::InvalidDate)
            } else {
                Err(ParseError::NoMatchingTemplate)
            }
        }
    }
}

enum Match {
    /// Shape and calendar both valid.
    Value(DateTime),
    /// Token shape lined up but the numbers are not a real date/time.
    ShapeOnly,
    NoShape,
}

/// Field values collected while walking a template or the fallback tokens.
#[derive(Default)]
struct Fields {
    year: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    hour12: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    pm: Option<bool>,
}

impl Fields {
    fn set(&mut self, role: SegmentRole, value: u32) {
        match role {
            SegmentRole::Year => self.year = Some(value),
            SegmentRole::Month => self.month = Some(value),
            SegmentRole::Day => self.day = Some(value),
            SegmentRole::Hour => self.hour = Some(value),
            SegmentRole::Hour12 => self.hour12 = Some(value),
            SegmentRole::Minute => self.minute = Some(value),
            SegmentRole::Second => self.second = Some(value),
            SegmentRole::Meridiem => {}
        }
    }

    /// Assembles the final value; `ShapeOnly` when the numbers do not form a
    /// real calendar date or time.
    fn resolve(&self, needs_date: bool, needs_time: bool) -> Match {
        let date = if needs_date {
            let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day) else {
                return Match::NoShape;
            };
            if year > 9999 || month > 12 || day > 31 {
                return Match::ShapeOnly;
            }
            match Date::from_parts(year as i32, month as u8, day as u8) {
                Ok(date) => date,
                Err(_) => return Match::ShapeOnly,
            }
        } else {
            REFERENCE_DATE
        };

        let time = if needs_time {
            let hour = match (self.hour, self.hour12, self.pm) {
                (Some(hour), _, _) => hour,
                (None, Some(hour12), Some(pm)) => {
                    if !(1..=12).contains(&hour12) {
                        return Match::ShapeOnly;
                    }
                    to_24_hour(hour12, pm)
                }
                _ => return Match::NoShape,
            };
            let Some(minute) = self.minute else {
                return Match::NoShape;
            };
            let second = self.second.unwrap_or(0);
            if hour > 23 || minute > 59 || second > 59 {
                return Match::ShapeOnly;
            }
            match Time::from_parts(hour as u8, minute as u8, second as u8) {
                Ok(time) => time,
                Err(_) => return Match::ShapeOnly,
            }
        } else {
            Time::MIDNIGHT
        };

        Match::Value(DateTime::new(date, time))
    }
}

fn to_24_hour(hour12: u32, pm: bool) -> u32 {
    match (hour12, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (hour, false) => hour,
        (hour, true) => hour + 12,
    }
}

fn match_template(text: &str, template: &Template) -> Match {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0usize;
    let mut fields = Fields::default();

    for (idx, role) in template.segments.iter().enumerate() {
        if !eat_separator(&chars, &mut pos, &template.separators[idx]) {
            return Match::NoShape;
        }

        match role {
            SegmentRole::Meridiem => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_ascii_alphabetic() {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                match word.to_ascii_uppercase().as_str() {
                    "AM" => fields.pm = Some(false),
                    "PM" => fields.pm = Some(true),
                    _ => return Match::NoShape,
                }
            }
            role => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let run = pos - start;
                let want = role.len();
                // Years must be written in full; two-digit segments may be
                // typed as a single digit.
                let acceptable = if want == 4 { run == 4 } else { run >= 1 && run <= want };
                if !acceptable {
                    return Match::NoShape;
                }
                let digits: String = chars[start..pos].iter().collect();
                let value: u32 = match digits.parse() {
                    Ok(value) => value,
                    Err(_) => return Match::NoShape,
                };
                fields.set(*role, value);
            }
        }
    }

    let trailing = template.separators.last().map(String::as_str).unwrap_or("");
    if !eat_separator(&chars, &mut pos, trailing) || pos != chars.len() {
        return Match::NoShape;
    }

    fields.resolve(template.has_date(), template.has_time())
}

/// Consumes a template separator at `pos`. A space separator matches any
/// amount of whitespace (including none); `T` also matches lowercase.
fn eat_separator(chars: &[char], pos: &mut usize, separator: &str) -> bool {
    for expected in separator.chars() {
        if expected == ' ' {
            while *pos < chars.len() && chars[*pos].is_whitespace() {
                *pos += 1;
            }
            continue;
        }
        let Some(&actual) = chars.get(*pos) else {
            return false;
        };
        let matches = if expected == 'T' {
            actual == 'T' || actual == 't'
        } else {
            actual == expected
        };
        if !matches {
            return false;
        }
        *pos += 1;
    }
    true
}

// ---------------------------------------------------------------------------
// Best-effort numeric fallback
// ---------------------------------------------------------------------------

static DIGIT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(am|pm|a\.m\.|p\.m\.)").unwrap());

/// One generic pass over the digit runs in the input, used only after every
/// template has failed. Digit-run order follows the mode's first template
/// (year-first when the leading run has four digits, month-first otherwise).
fn best_effort(text: &str, mode: Mode) -> Match {
    let runs: Vec<&str> = DIGIT_RUNS.find_iter(text).map(|m| m.as_str()).collect();
    let pm = MERIDIEM
        .find(text)
        .map(|m| m.as_str().to_ascii_lowercase().starts_with('p'));

    let numbers: Vec<u32> = match runs.iter().map(|run| run.parse()).collect() {
        Ok(numbers) => numbers,
        Err(_) => return Match::NoShape,
    };

    let mut fields = Fields::default();
    fields.pm = pm;

    match mode {
        Mode::Date => {
            if !assign_date(&mut fields, &runs, &numbers) {
                return Match::NoShape;
            }
            fields.resolve(true, false)
        }
        Mode::Time => {
            if !assign_time(&mut fields, &numbers, pm.is_some()) {
                return Match::NoShape;
            }
            fields.resolve(false, true)
        }
        Mode::DateTime => {
            if numbers.len() < 5 || numbers.len() > 6 {
                return Match::NoShape;
            }
            if !assign_date(&mut fields, &runs[..3], &numbers[..3]) {
                return Match::NoShape;
            }
            if !assign_time(&mut fields, &numbers[3..], pm.is_some()) {
                return Match::NoShape;
            }
            fields.resolve(true, true)
        }
    }
}

fn assign_date(fields: &mut Fields, runs: &[&str], numbers: &[u32]) -> bool {
    match numbers {
        [single] if runs[0].len() == 8 => {
            fields.year = Some(single / 10_000);
            fields.month = Some(single / 100 % 100);
            fields.day = Some(single % 100);
            true
        }
        [a, b, c] => {
            if runs[0].len() == 4 {
                fields.year = Some(*a);
                fields.month = Some(*b);
                fields.day = Some(*c);
            } else if runs[2].len() == 4 {
                // Month-first, matching the MM/dd/yyyy template's precedence.
                fields.month = Some(*a);
                fields.day = Some(*b);
                fields.year = Some(*c);
            } else {
                return false;
            }
            true
        }
        _ => false,
    }
}

fn assign_time(fields: &mut Fields, numbers: &[u32], twelve_hour: bool) -> bool {
    let set_hour = |fields: &mut Fields, hour: u32| {
        if twelve_hour {
            fields.hour12 = Some(hour);
        } else {
            fields.hour = Some(hour);
        }
    };
    match numbers {
        [hour, minute] => {
            set_hour(fields, *hour);
            fields.minute = Some(*minute);
            true
        }
        [hour, minute, second] => {
            set_hour(fields, *hour);
            fields.minute = Some(*minute);
            fields.second = Some(*second);
            true
        }
        [single] if *single >= 100 => {
            // Compact "1315" / "131500" forms.
            let (rest, second) = if *single >= 10_000 {
                (single / 100, Some(single % 100))
            } else {
                (*single, None)
            };
            set_hour(fields, rest / 100);
            fields.minute = Some(rest % 100);
            fields.second = second;
            true
        }
        _ => false,
    }
}
