use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(r"^(?P<value>\d+)(?P<unit>[smhdw])$").unwrap();
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

#[readonly::make]
#[derive(Debug)]
pub struct ParsedDuration {
    pub value: i64,
    pub unit: DurationUnit,
}

impl ParsedDuration {
    // Returns `None` when the value overflows what `Duration` can hold.
    pub fn as_duration(&self) -> Option<Duration> {
        match self.unit {
            DurationUnit::Seconds => Duration::try_seconds(self.value),
            DurationUnit::Minutes => Duration::try_minutes(self.value),
            DurationUnit::Hours => Duration::try_hours(self.value),
            DurationUnit::Days => Duration::try_days(self.value),
            DurationUnit::Weeks => Duration::try_weeks(self.value),
        }
    }
}

// Parses the user-facing duration format (e.g. "30s", "5m", "2h", "1d",
// "1w"). The parser itself is clock-free: checking that the resulting
// end time lands in the future is the controller's job.
pub fn parse_duration(text: &str) -> Result<ParsedDuration> {
    let captures = match DURATION_REGEX.captures(text.trim()) {
        Some(captures) => captures,
        None => {
            let message = "Invalid duration format. Use: 30s, 5m, 2h, 1d, 1w".to_string();
            return Err(Error::Validation(message));
        }
    };

    let value = captures
        .name("value")
        .map(|value| value.as_str())
        .unwrap_or_default()
        .parse::<i64>()
        .map_err(|_| Error::Validation("The duration value is too large.".to_string()))?;

    let unit = match captures.name("unit").map(|unit| unit.as_str()) {
        Some("s") => DurationUnit::Seconds,
        Some("m") => DurationUnit::Minutes,
        Some("h") => DurationUnit::Hours,
        Some("d") => DurationUnit::Days,
        _ => DurationUnit::Weeks,
    };

    Ok(ParsedDuration { value, unit })
}
