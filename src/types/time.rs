//! Tick-based durations and timestamps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Number of ticks in one millisecond. One tick is 100 nanoseconds.
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i64 = 1_000 * TICKS_PER_MILLISECOND;

/// A signed duration measured in 100ns ticks.
///
/// Lap, sector, gap and session times all travel on the wire as a single `I64`
/// tick count, so this type is the canonical time representation throughout
/// the crate. Arithmetic saturates at the ends of the `i64` tick range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TimeSpan(i64);

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan(0);

    pub const fn from_ticks(ticks: i64) -> Self {
        TimeSpan(ticks)
    }

    /// Saturates outside roughly +/- 29,000 years.
    pub const fn from_millis(millis: i64) -> Self {
        TimeSpan(millis.saturating_mul(TICKS_PER_MILLISECOND))
    }

    pub const fn from_secs(secs: i64) -> Self {
        TimeSpan(secs.saturating_mul(TICKS_PER_SECOND))
    }

    /// Builds a span from fractional seconds, rounding to the nearest tick.
    pub fn from_secs_f64(secs: f64) -> Self {
        TimeSpan((secs * TICKS_PER_SECOND as f64).round() as i64)
    }

    pub const fn ticks(self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts to a [`std::time::Duration`], or `None` when negative.
    pub fn to_std(self) -> Option<std::time::Duration> {
        let ticks = u64::try_from(self.0).ok()?;
        let per_second = TICKS_PER_SECOND.unsigned_abs();
        let nanos = u32::try_from(ticks % per_second * 100).ok()?;
        Some(std::time::Duration::new(ticks / per_second, nanos))
    }

    /// Converts from a [`std::time::Duration`], saturating at the largest span.
    pub fn from_std(duration: std::time::Duration) -> Self {
        TimeSpan(i64::try_from(duration.as_nanos() / 100).unwrap_or(i64::MAX))
    }

    /// Scales the span by a floating point factor, rounding to the nearest tick.
    pub fn mul_f64(self, factor: f64) -> Self {
        TimeSpan((self.0 as f64 * factor).round() as i64)
    }
}

impl Add for TimeSpan {
    type Output = TimeSpan;

    fn add(self, rhs: TimeSpan) -> TimeSpan {
        TimeSpan(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for TimeSpan {
    fn add_assign(&mut self, rhs: TimeSpan) {
        *self = *self + rhs;
    }
}

impl Sub for TimeSpan {
    type Output = TimeSpan;

    fn sub(self, rhs: TimeSpan) -> TimeSpan {
        TimeSpan(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for TimeSpan {
    fn sub_assign(&mut self, rhs: TimeSpan) {
        *self = *self - rhs;
    }
}

impl Neg for TimeSpan {
    type Output = TimeSpan;

    fn neg(self) -> TimeSpan {
        TimeSpan(self.0.saturating_neg())
    }
}

impl fmt::Display for TimeSpan {
    /// Formats as `m:ss.fff`, or `s.fff` below one minute.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total_millis = self.0.unsigned_abs() / TICKS_PER_MILLISECOND as u64;
        let minutes = total_millis / 60_000;
        let seconds = (total_millis / 1_000) % 60;
        let millis = total_millis % 1_000;

        if minutes > 0 {
            write!(f, "{sign}{minutes}:{seconds:02}.{millis:03}")
        } else {
            write!(f, "{sign}{seconds}.{millis:03}")
        }
    }
}

/// An opaque point in time carried as a tick count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_ticks(ticks: i64) -> Self {
        Timestamp(ticks)
    }

    pub const fn ticks(self) -> i64 {
        self.0
    }
}
