//! Opening-hours predicates.
//!
//! Pure functions answering "does this place open before T" and "does it
//! close after T" from a provider weekly schedule. Times are compared as
//! minutes since midnight; the day of week is ignored, so a place that opens
//! at 06:00 on a single day of the week counts as opening before 07:00.

use thiserror::Error;

use crate::place::{DayTime, OpeningHours};

/// 07:00 expressed in minutes since midnight.
pub const OPENS_BEFORE_7_MINUTES: u16 = 7 * 60;

/// 20:00 expressed in minutes since midnight.
pub const CLOSES_AFTER_8_MINUTES: u16 = 20 * 60;

/// Errors raised while reading a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursError {
    /// A period time was not a four digit `HHMM` value.
    #[error("malformed opening-hours time '{0}', expected HHMM")]
    MalformedTime(String),

    /// A period lacks the `open` or `close` time the filter needs.
    #[error("opening-hours period has no {0} time")]
    MissingTime(&'static str),
}

/// Result type for opening-hours evaluation.
pub type HoursResult<T> = Result<T, HoursError>;

/// Parse an `HHMM` string into minutes since midnight.
///
/// `2400` is accepted because some providers use it for "end of day".
///
/// # Errors
///
/// Returns [`HoursError::MalformedTime`] unless the input is exactly four
/// ASCII digits with hours in `00..=24` and minutes in `00..=59`.
pub fn parse_hhmm(time: &str) -> HoursResult<u16> {
    let malformed = || HoursError::MalformedTime(time.to_string());

    if time.len() != 4 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let hours: u16 = time[..2].parse().map_err(|_| malformed())?;
    let minutes: u16 = time[2..].parse().map_err(|_| malformed())?;

    if hours > 24 || minutes > 59 || (hours == 24 && minutes > 0) {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Minutes since midnight of a period boundary, which must be present.
fn boundary_minutes(boundary: Option<&DayTime>, which: &'static str) -> HoursResult<u16> {
    boundary
        .and_then(|b| b.time.as_deref())
        .ok_or(HoursError::MissingTime(which))
        .and_then(parse_hhmm)
}

/// Returns `true` if any period opens strictly before `threshold_minutes`.
///
/// A missing schedule or an empty period list yields `false`.
///
/// # Errors
///
/// Fails on the first missing or malformed `open.time` encountered before a
/// match.
pub fn opens_before(schedule: Option<&OpeningHours>, threshold_minutes: u16) -> HoursResult<bool> {
    let Some(schedule) = schedule else {
        return Ok(false);
    };

    for period in &schedule.periods {
        if boundary_minutes(period.open.as_ref(), "open")? < threshold_minutes {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Returns `true` if any period closes strictly after `threshold_minutes`,
/// or has no close time at all (open around the clock).
///
/// A missing schedule or an empty period list yields `false`.
///
/// # Errors
///
/// Fails on the first malformed `close.time`, or a `close` without a time,
/// encountered before a match.
pub fn closes_after(schedule: Option<&OpeningHours>, threshold_minutes: u16) -> HoursResult<bool> {
    let Some(schedule) = schedule else {
        return Ok(false);
    };

    for period in &schedule.periods {
        let Some(close) = &period.close else {
            return Ok(true);
        };
        if boundary_minutes(Some(close), "close")? > threshold_minutes {
            return Ok(true);
        }
    }

    Ok(false)
}
