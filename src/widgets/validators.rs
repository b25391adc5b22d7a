use crate::datetime::calendar::Date;

pub type ValidationError = String;

/// Extra caller-supplied checks, run against the canonical output string
/// after the built-in constraint validation passes.
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), ValidationError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.trim().is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

/// Rejects Saturdays and Sundays. Expects the canonical `yyyy-MM-dd` prefix;
/// non-date values pass.
pub fn weekdays_only(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        let Some(date) = leading_date(value) else {
            return Ok(());
        };
        if date.weekday().0 >= 5 {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

/// Rejects times that are not on a full hour (`HH:00`).
pub fn full_hours_only(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        let Some(minute) = trailing_time_minute(value) else {
            return Ok(());
        };
        if minute != 0 {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

fn leading_date(value: &str) -> Option<Date> {
    value.get(..10).and_then(|prefix| prefix.parse().ok())
}

fn trailing_time_minute(value: &str) -> Option<u8> {
    let time_part = match value.split_once('T') {
        Some((_, time)) => time,
        None => value,
    };
    let mut parts = time_part.split(':');
    parts.next()?.parse::<u8>().ok()?;
    parts.next()?.parse::<u8>().ok()
}
