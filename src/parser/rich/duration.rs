//! Duration parser.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::{Captures, Regex};
use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::parser::traits::Parser;

const EXPECTED: &str = "Union[str, float]";

const MICROS_PER_SECOND: i128 = 1_000_000;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(-)?P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration pattern is valid")
});

/// Parses a duration given as seconds or as an ISO 8601 duration string.
///
/// Numbers are seconds and may be fractional. Strings use the
/// `[-]P[nW][nD][T[nH][nM][nS]]` form; at least one component must be given,
/// and a `T` must be followed by at least one time component.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDeltaValue;

fn invalid_format(raw: &Value) -> SimpleParseError {
    SimpleParseError::new(EXPECTED, raw)
        .with_code(ErrorCode::InvalidFormat)
        .with_detail("can't be parsed as an ISO 8601 duration")
}

fn out_of_range(raw: &Value) -> SimpleParseError {
    SimpleParseError::new(EXPECTED, raw)
        .with_code(ErrorCode::OutOfRange)
        .with_detail("is too large to be a duration")
}

fn from_micros(micros: i128) -> Option<TimeDelta> {
    i64::try_from(micros).ok().map(TimeDelta::microseconds)
}

fn from_seconds(seconds: f64) -> Option<TimeDelta> {
    let micros = (seconds * 1_000_000.0).round();
    // i64::MAX is not exactly representable; stay strictly below it.
    if micros.is_finite() && micros.abs() < 9.2e18 {
        Some(TimeDelta::microseconds(micros as i64))
    } else {
        None
    }
}

fn group(captures: &Captures<'_>, index: usize) -> Result<Option<i128>, ()> {
    captures
        .get(index)
        .map(|m| m.as_str().parse::<i128>().map_err(|_| ()))
        .transpose()
}

fn whole_seconds(
    weeks: Option<i128>,
    days: Option<i128>,
    hours: Option<i128>,
    minutes: Option<i128>,
) -> Option<i128> {
    let days = weeks.unwrap_or(0).checked_mul(7)?.checked_add(days.unwrap_or(0))?;
    days.checked_mul(86_400)?
        .checked_add(hours.unwrap_or(0).checked_mul(3_600)?)?
        .checked_add(minutes.unwrap_or(0).checked_mul(60)?)
}

enum Iso {
    Parsed(TimeDelta),
    Invalid,
    TooLarge,
}

fn parse_iso(text: &str) -> Iso {
    let Some(captures) = ISO_DURATION.captures(text) else {
        return Iso::Invalid;
    };

    let components = || -> Result<_, ()> {
        Ok((
            group(&captures, 2)?,
            group(&captures, 3)?,
            group(&captures, 4)?,
            group(&captures, 5)?,
        ))
    };
    let Ok((weeks, days, hours, minutes)) = components() else {
        return Iso::TooLarge;
    };
    let seconds = captures.get(6).map(|m| m.as_str());

    let has_date = weeks.is_some() || days.is_some();
    let has_time = hours.is_some() || minutes.is_some() || seconds.is_some();
    if !(has_date || has_time) || (text.contains('T') && !has_time) {
        return Iso::Invalid;
    }

    let Some(whole_seconds) = whole_seconds(weeks, days, hours, minutes) else {
        return Iso::TooLarge;
    };
    let fractional = match seconds.map(str::parse::<f64>).transpose() {
        Ok(secs) => secs.unwrap_or(0.0),
        Err(_) => return Iso::Invalid,
    };
    let Some(fractional) = from_seconds(fractional) else {
        return Iso::TooLarge;
    };

    let total = whole_seconds
        .checked_mul(MICROS_PER_SECOND)
        .and_then(|micros| {
            micros.checked_add(i128::from(fractional.num_microseconds().unwrap_or(0)))
        });
    let signed = match (total, captures.get(1).is_some()) {
        (Some(total), true) => total.checked_neg(),
        (total, _) => total,
    };
    match signed.and_then(from_micros) {
        Some(delta) => Iso::Parsed(delta),
        None => Iso::TooLarge,
    }
}

impl Parser for TimeDeltaValue {
    type Output = TimeDelta;

    fn try_parse(&self, raw: &Value) -> Result<TimeDelta, ParseError> {
        match raw {
            Value::Number(number) => number
                .as_f64()
                .and_then(from_seconds)
                .ok_or_else(|| out_of_range(raw).into()),
            Value::String(text) => match parse_iso(text) {
                Iso::Parsed(delta) => Ok(delta),
                Iso::Invalid => Err(invalid_format(raw).into()),
                Iso::TooLarge => Err(out_of_range(raw).into()),
            },
            _ => Err(SimpleParseError::new(EXPECTED, raw).into()),
        }
    }

    fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        json!({
            "anyOf": [
                {"type": "string", "format": "duration"},
                {"type": "number"},
            ]
        })
    }

    fn describe(&self) -> String {
        "TimeDelta".to_string()
    }
}
