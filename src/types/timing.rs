//! Timing results and gaps.
//!
//! ## Ordering
//!
//! [`TimedResult`] orders by time ascending. Ties are broken by rank with the
//! more special rank first (`SessionBest < PersonalBest < Normal`), then by lap
//! number. [`Gap`] orders lap gaps after every time gap, so a driver a lap down
//! always sorts behind a driver on the lead lap.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::TimeSpan;
use crate::schema::record;
use crate::{Result, TimingError};

super::enums::wire_enum! {
    /// Classification of a posted time.
    pub enum Rank {
        #[default]
        Normal = 0,
        PersonalBest = 1,
        SessionBest = 2,
    }
}

/// A posted lap or sector time with its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TimedResult {
    lap_number: u32,
    time: TimeSpan,
    rank: Rank,
}

impl TimedResult {
    pub fn new(time: TimeSpan, rank: Rank, lap_number: u32) -> Result<Self> {
        if time.is_negative() {
            return Err(TimingError::domain("time", format!("must not be negative, was {time}")));
        }
        Ok(Self { lap_number, time, rank })
    }

    pub fn time(&self) -> TimeSpan {
        self.time
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn lap_number(&self) -> u32 {
        self.lap_number
    }
}

impl Ord for TimedResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| other.rank.code().cmp(&self.rank.code()))
            .then_with(|| self.lap_number.cmp(&other.lap_number))
    }
}

impl PartialOrd for TimedResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}, lap {})", self.time, self.rank, self.lap_number)
    }
}

record!(TimedResult, tag = 1, name = "TimedResult", {
    0 => lap_number,
    1 => time,
    2 => rank,
});

/// Gap expressed as a time behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TimeGap {
    time: TimeSpan,
}

impl TimeGap {
    pub fn new(time: TimeSpan) -> Result<Self> {
        if time.is_negative() {
            return Err(TimingError::domain("gap", format!("must not be negative, was {time}")));
        }
        Ok(Self { time })
    }

    pub fn time(&self) -> TimeSpan {
        self.time
    }
}

record!(TimeGap, tag = 19, name = "TimeGap", {
    0 => time,
});

/// Gap expressed in whole laps behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapGap {
    laps: i32,
}

impl LapGap {
    pub fn new(laps: i32) -> Result<Self> {
        if laps < 0 {
            return Err(TimingError::domain("laps", format!("must not be negative, was {laps}")));
        }
        Ok(Self { laps })
    }

    pub fn laps(&self) -> i32 {
        self.laps
    }
}

record!(LapGap, tag = -54815557, name = "LapGap", {
    0 => laps,
});

/// Gap or interval between two drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Gap {
    Time(TimeGap),
    Laps(LapGap),
}

impl Gap {
    pub fn time(time: TimeSpan) -> Result<Self> {
        TimeGap::new(time).map(Gap::Time)
    }

    pub fn laps(laps: i32) -> Result<Self> {
        LapGap::new(laps).map(Gap::Laps)
    }
}

impl Default for Gap {
    fn default() -> Self {
        Gap::Time(TimeGap::default())
    }
}

impl Ord for Gap {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Gap::Time(a), Gap::Time(b)) => a.time.cmp(&b.time),
            (Gap::Laps(a), Gap::Laps(b)) => a.laps.cmp(&b.laps),
            (Gap::Laps(_), Gap::Time(_)) => Ordering::Greater,
            (Gap::Time(_), Gap::Laps(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Gap {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gap::Time(gap) => write!(f, "+{}", gap.time),
            Gap::Laps(gap) if gap.laps == 1 => f.write_str("+1 lap"),
            Gap::Laps(gap) => write!(f, "+{} laps", gap.laps),
        }
    }
}
