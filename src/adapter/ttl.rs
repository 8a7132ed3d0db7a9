//! TTL Normalization
//!
//! Resolves the accepted TTL shapes into a single backend expiry decision.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Days, Months, TimeDelta, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::error::{CacheError, Result};

// == TTL ==
/// Time-to-live accepted by the cache contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Whole seconds. Zero or negative means "already expired".
    Seconds(i64),
    /// Calendar-relative interval, resolved against the unix epoch.
    Interval(TtlInterval),
}

impl From<i64> for Ttl {
    fn from(seconds: i64) -> Self {
        Ttl::Seconds(seconds)
    }
}

impl From<i32> for Ttl {
    fn from(seconds: i32) -> Self {
        Ttl::Seconds(i64::from(seconds))
    }
}

impl From<u64> for Ttl {
    fn from(seconds: u64) -> Self {
        Ttl::Seconds(i64::try_from(seconds).unwrap_or(i64::MAX))
    }
}

impl From<u32> for Ttl {
    fn from(seconds: u32) -> Self {
        Ttl::Seconds(i64::from(seconds))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::from(duration.as_secs())
    }
}

impl From<TimeDelta> for Ttl {
    fn from(delta: TimeDelta) -> Self {
        Ttl::Seconds(delta.num_seconds())
    }
}

impl From<TtlInterval> for Ttl {
    fn from(interval: TtlInterval) -> Self {
        Ttl::Interval(interval)
    }
}

// == TTL Interval ==
/// A calendar interval: years and months vary in length, so the interval is
/// only turned into seconds by anchoring it at the unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TtlInterval {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Negative interval
    pub invert: bool,
}

impl TtlInterval {
    pub fn years(years: u32) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    pub fn months(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn weeks(weeks: u32) -> Self {
        Self {
            weeks,
            ..Self::default()
        }
    }

    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn hours(hours: u32) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    pub fn minutes(minutes: u32) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    pub fn seconds(seconds: u32) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// Returns the same interval pointing backwards in time.
    pub fn inverted(self) -> Self {
        Self {
            invert: !self.invert,
            ..self
        }
    }

    // == Resolve ==
    /// Seconds between the unix epoch and the epoch shifted by this interval.
    ///
    /// Months and years are applied first, then days, then the time part.
    /// Returns `None` when the shifted instant is not representable.
    pub fn to_seconds(&self) -> Option<i64> {
        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let days = u64::from(self.weeks) * 7 + u64::from(self.days);
        let time = TimeDelta::try_seconds(
            i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds),
        )?;

        let epoch: DateTime<Utc> = DateTime::from_timestamp(0, 0)?;
        let shifted = if self.invert {
            epoch
                .checked_sub_months(Months::new(months))?
                .checked_sub_days(Days::new(days))?
                .checked_sub_signed(time)?
        } else {
            epoch
                .checked_add_months(Months::new(months))?
                .checked_add_days(Days::new(days))?
                .checked_add_signed(time)?
        };

        Some(shifted.timestamp())
    }
}

impl fmt::Display for TtlInterval {
    /// Formats the interval as an ISO-8601 duration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_str("-")?;
        }
        f.write_str("P")?;

        let date = [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ];
        let time = [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')];

        let mut wrote_any = false;
        for (value, unit) in date.into_iter().filter(|(v, _)| *v > 0) {
            write!(f, "{}{}", value, unit)?;
            wrote_any = true;
        }
        if time.iter().any(|(v, _)| *v > 0) {
            f.write_str("T")?;
            for (value, unit) in time.into_iter().filter(|(v, _)| *v > 0) {
                write!(f, "{}{}", value, unit)?;
            }
        } else if !wrote_any {
            f.write_str("0D")?;
        }
        Ok(())
    }
}

// == ISO-8601 Parsing ==
/// Error returned when a string is not an ISO-8601 duration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid ISO-8601 duration: {0:?}")]
pub struct ParseIntervalError(String);

impl FromStr for TtlInterval {
    type Err = ParseIntervalError;

    /// Parses `PnYnMnWnDTnHnMnS` style durations, with an optional leading `-`.
    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ParseIntervalError(input.to_string());

        let (invert, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let rest = rest.strip_prefix('P').ok_or_else(invalid)?;
        let (date, time) = match rest.split_once('T') {
            Some((date, time)) if !time.is_empty() => (date, Some(time)),
            Some(_) => return Err(invalid()),
            None => (rest, None),
        };

        let mut interval = TtlInterval {
            invert,
            ..TtlInterval::default()
        };
        let mut components = 0;

        // Designators must appear in this order, each at most once
        let mut cursor = 0;
        for (value, unit) in split_components(date).ok_or_else(invalid)? {
            let position =
                next_designator(&DATE_DESIGNATORS, &mut cursor, unit).ok_or_else(invalid)?;
            let slot = match position {
                0 => &mut interval.years,
                1 => &mut interval.months,
                2 => &mut interval.weeks,
                _ => &mut interval.days,
            };
            *slot = value;
            components += 1;
        }

        let mut cursor = 0;
        for (value, unit) in split_components(time.unwrap_or("")).ok_or_else(invalid)? {
            let position =
                next_designator(&TIME_DESIGNATORS, &mut cursor, unit).ok_or_else(invalid)?;
            let slot = match position {
                0 => &mut interval.hours,
                1 => &mut interval.minutes,
                _ => &mut interval.seconds,
            };
            *slot = value;
            components += 1;
        }

        if components == 0 {
            return Err(invalid());
        }
        Ok(interval)
    }
}

const DATE_DESIGNATORS: [char; 4] = ['Y', 'M', 'W', 'D'];
const TIME_DESIGNATORS: [char; 3] = ['H', 'M', 'S'];

/// Finds `unit` among `designators` at or after `cursor`, then moves the
/// cursor past it. Repeated or out-of-order units are not found.
fn next_designator(designators: &[char], cursor: &mut usize, unit: char) -> Option<usize> {
    let position = designators[*cursor..]
        .iter()
        .position(|designator| *designator == unit)?
        + *cursor;
    *cursor = position + 1;
    Some(position)
}

/// Splits `"1Y2M"` into `[(1, 'Y'), (2, 'M')]`.
fn split_components(part: &str) -> Option<Vec<(u32, char)>> {
    let mut components = Vec::new();
    let mut start = 0;

    for (index, c) in part.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        let digits = &part[start..index];
        if digits.is_empty() {
            return None;
        }
        components.push((digits.parse().ok()?, c));
        start = index + c.len_utf8();
    }

    if start != part.len() {
        return None;
    }
    Some(components)
}

// == Expiry ==
/// What the adapter should do with a write, given its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Store without expiry
    Never,
    /// Store for this many seconds
    After(u64),
    /// Do not store; delete instead
    Expired,
}

impl Expiry {
    /// Seconds to hand to the backend save path.
    pub fn as_backend_ttl(&self) -> Option<u64> {
        match self {
            Expiry::After(seconds) => Some(*seconds),
            Expiry::Never | Expiry::Expired => None,
        }
    }
}

// == Normalize ==
/// Resolves `ttl` for the write under `key`.
pub fn normalize(key: &str, ttl: Option<&Ttl>) -> Result<Expiry> {
    let seconds = match ttl {
        None => return Ok(Expiry::Never),
        Some(Ttl::Seconds(seconds)) => *seconds,
        Some(Ttl::Interval(interval)) => {
            interval.to_seconds().ok_or_else(|| CacheError::TtlOutOfRange {
                key: key.to_string(),
            })?
        }
    };

    if seconds <= 0 {
        Ok(Expiry::Expired)
    } else {
        Ok(Expiry::After(seconds as u64))
    }
}
