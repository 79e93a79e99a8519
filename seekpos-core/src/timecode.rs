//! Time code parsing
//!
//! Accepted forms:
//! - `inf`, `+inf`, `infinity`, `-inf`, `-infinity`, `indefinite`
//! - seconds: `12`, `12.5`, `12.5s`
//! - milliseconds: `1500ms`
//! - clock: `MM:SS[.fff]`, `HH:MM:SS[.fff]`
//!
//! Numeric forms may carry a leading `-`. Fractions are parsed exactly up to
//! nanosecond resolution; magnitudes beyond the nanosecond range saturate to
//! the matching infinity.

use crate::time::DEFAULT_TIMESCALE;
use crate::{Error, MediaTime, Result};
use std::str::FromStr;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;

impl FromStr for MediaTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_timecode(s)
    }
}

/// Parses a time code into a media time at nanosecond timescale
pub fn parse_timecode(input: &str) -> Result<MediaTime> {
    let text = input.trim();
    let invalid = || Error::InvalidTimecode(input.to_string());

    match text.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => return Ok(MediaTime::POSITIVE_INFINITY),
        "-inf" | "-infinity" => return Ok(MediaTime::NEGATIVE_INFINITY),
        "indefinite" => return Ok(MediaTime::INDEFINITE),
        _ => {}
    }

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let nanos = if let Some(millis) = body.strip_suffix("ms") {
        parse_decimal(millis, 6)
    } else if body.contains(':') {
        parse_clock(body)
    } else {
        parse_decimal(body.strip_suffix('s').unwrap_or(body), 9)
    }
    .ok_or_else(invalid)?;

    let nanos = if negative { -nanos } else { nanos };
    Ok(match i64::try_from(nanos) {
        Ok(value) => MediaTime::new(value, DEFAULT_TIMESCALE),
        // Saturate like `MediaTime::from_seconds`
        Err(_) if negative => MediaTime::NEGATIVE_INFINITY,
        Err(_) => MediaTime::POSITIVE_INFINITY,
    })
}

/// Parses `HH:MM:SS[.fff]` or `MM:SS[.fff]` into nanoseconds
fn parse_clock(text: &str) -> Option<i128> {
    let fields: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match fields.as_slice() {
        [minutes, seconds] => (0, parse_digits(minutes)?, seconds),
        [hours, minutes, seconds] => {
            let minutes = parse_digits(minutes)?;
            if minutes >= 60 {
                return None;
            }
            (parse_digits(hours)?, minutes, seconds)
        }
        _ => return None,
    };

    let seconds = parse_decimal(seconds, 9)?;
    if seconds >= NANOS_PER_MINUTE {
        return None;
    }

    Some(
        hours
            .saturating_mul(NANOS_PER_HOUR)
            .saturating_add(minutes.saturating_mul(NANOS_PER_MINUTE))
            .saturating_add(seconds),
    )
}

/// Parses an unsigned decimal number, scaled by `10^fraction_digits`
///
/// Returns `None` when the fraction is longer than `fraction_digits`.
fn parse_decimal(text: &str, fraction_digits: u32) -> Option<i128> {
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (text, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > fraction_digits as usize {
        return None;
    }

    let integer = if integer.is_empty() {
        0
    } else {
        parse_digits(integer)?
    };
    let fraction = if fraction.is_empty() {
        0
    } else {
        let padding = fraction_digits - fraction.len() as u32;
        parse_digits(fraction)? * 10i128.pow(padding)
    };

    Some(
        integer
            .saturating_mul(10i128.pow(fraction_digits))
            .saturating_add(fraction),
    )
}

/// Parses ASCII digits, saturating at `i128::MAX`
fn parse_digits(text: &str) -> Option<i128> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(text.parse().unwrap_or(i128::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seconds(text: &str) -> f64 {
        text.parse::<MediaTime>().unwrap().seconds()
    }

    #[test]
    fn test_plain_seconds() {
        assert_eq!(seconds("12"), 12.0);
        assert_eq!(seconds("12.5"), 12.5);
        assert_eq!(seconds("12.5s"), 12.5);
        assert_eq!(seconds(" 30s "), 30.0);
        assert_eq!(seconds(".25"), 0.25);
        assert_eq!(seconds("-3"), -3.0);
    }

    #[test]
    fn test_milliseconds() {
        assert_eq!("1500ms".parse::<MediaTime>().unwrap(), MediaTime::from_millis(1500));
        assert_eq!(seconds("0.5ms"), 0.0005);
    }

    #[test]
    fn test_clock_forms() {
        assert_eq!(seconds("01:30"), 90.0);
        assert_eq!(seconds("1:02:03.5"), 3723.5);
        assert_eq!(seconds("90:00"), 5400.0);
    }

    #[test]
    fn test_fraction_is_exact() {
        let parsed: MediaTime = "0.1".parse().unwrap();
        assert_eq!(parsed, MediaTime::new(1, 10));
    }

    #[test]
    fn test_special_values() {
        assert!("inf".parse::<MediaTime>().unwrap().is_positive_infinity());
        assert!("+Infinity".parse::<MediaTime>().unwrap().is_positive_infinity());
        assert!("-inf".parse::<MediaTime>().unwrap().is_negative_infinity());
        assert!("indefinite".parse::<MediaTime>().unwrap().is_indefinite());
    }

    #[test]
    fn test_rejects_malformed_input() {
        for text in ["", "abc", "1:2:3:4", "01:60", "1:60:00", "12.5.3", "1e3", "-", "s", "1.0000000001"] {
            assert!(
                matches!(text.parse::<MediaTime>(), Err(Error::InvalidTimecode(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_out_of_range_saturates() {
        let huge: MediaTime = "99999999999999999999".parse().unwrap();
        assert!(huge.is_positive_infinity());
        assert_eq!(huge, MediaTime::from_seconds(99999999999999999999.0));

        let hours: MediaTime = "9999999999:00:00".parse().unwrap();
        assert!(hours.is_positive_infinity());

        let negative: MediaTime = "-99999999999999999999ms".parse().unwrap();
        assert!(negative.is_negative_infinity());
        assert_eq!(negative, MediaTime::from_seconds(-99999999999999999.999));

        let digits = "9".repeat(60);
        assert!(digits.parse::<MediaTime>().unwrap().is_positive_infinity());
        assert!(format!("-{digits}s").parse::<MediaTime>().unwrap().is_negative_infinity());
    }
}
