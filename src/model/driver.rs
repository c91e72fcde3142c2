//! Per-driver state.

use std::collections::BTreeMap;

use serde::Serialize;

use super::series::TimedResultSeries;
use crate::types::{DriverStatus, Gap, TimeSpan, TimedResult};

/// Lap and sector time series for one driver.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LapTimes {
    pub laps: TimedResultSeries,
    pub s1: TimedResultSeries,
    pub s2: TimedResultSeries,
    pub s3: TimedResultSeries,
}

impl LapTimes {
    /// Series for sector 1, 2 or 3.
    pub fn sector(&self, number: i32) -> Option<&TimedResultSeries> {
        match number {
            1 => Some(&self.s1),
            2 => Some(&self.s2),
            3 => Some(&self.s3),
            _ => None,
        }
    }

    pub fn sector_mut(&mut self, number: i32) -> Option<&mut TimedResultSeries> {
        match number {
            1 => Some(&mut self.s1),
            2 => Some(&mut self.s2),
            3 => Some(&mut self.s3),
            _ => None,
        }
    }

    /// Sector and lap times joined by lap number, most recent lap first.
    ///
    /// Laps with no posted time are left out. Where a series holds more than
    /// one time for a lap, the earliest posted wins. Corrections replace the
    /// time in place, so a corrected sector shows its replacement.
    pub fn history(&self) -> Vec<LapHistoryEntry> {
        let mut laps: BTreeMap<u32, LapHistoryEntry> = BTreeMap::new();
        for (column, series) in [&self.s1, &self.s2, &self.s3, &self.laps].into_iter().enumerate() {
            for result in series.items() {
                let entry = laps
                    .entry(result.lap_number())
                    .or_insert_with(|| LapHistoryEntry::blank(result.lap_number()));
                entry.column_mut(column).get_or_insert(*result);
            }
        }
        laps.into_values().rev().collect()
    }
}

/// The times posted during one lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LapHistoryEntry {
    pub lap_number: u32,
    pub s1: Option<TimedResult>,
    pub s2: Option<TimedResult>,
    pub s3: Option<TimedResult>,
    pub lap: Option<TimedResult>,
}

impl LapHistoryEntry {
    fn blank(lap_number: u32) -> Self {
        Self { lap_number, s1: None, s2: None, s3: None, lap: None }
    }

    fn column_mut(&mut self, column: usize) -> &mut Option<TimedResult> {
        match column {
            0 => &mut self.s1,
            1 => &mut self.s2,
            2 => &mut self.s3,
            _ => &mut self.lap,
        }
    }
}

/// A completed pit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PitTime {
    pub time: TimeSpan,
    pub lap_number: i32,
}

/// Best time in each qualifying segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuallyTimes([Option<TimeSpan>; 3]);

impl QuallyTimes {
    /// Time for segment 1, 2 or 3.
    pub fn get(&self, number: i32) -> Option<TimeSpan> {
        Self::slot(number).and_then(|index| self.0[index])
    }

    pub(crate) fn set(&mut self, number: i32, time: TimeSpan) -> bool {
        match Self::slot(number) {
            Some(index) => {
                self.0[index] = Some(time);
                true
            }
            None => false,
        }
    }

    fn slot(number: i32) -> Option<usize> {
        usize::try_from(number).ok().filter(|n| (1..=3).contains(n)).map(|n| n - 1)
    }
}

/// Everything known about one driver in the current session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Driver {
    pub id: i32,
    pub name: Option<String>,
    pub car_number: Option<i32>,
    pub position: i32,
    pub laps_completed: i32,
    pub status: DriverStatus,
    pub gap: Option<Gap>,
    pub interval: Option<Gap>,
    pub pit_count: i32,
    pub pit_times: Vec<PitTime>,
    pub lap_times: LapTimes,
    pub qually_times: QuallyTimes,
}

impl Driver {
    pub fn new(id: i32) -> Self {
        Self { id, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    #[test]
    fn sectors_are_addressed_one_based() {
        let mut times = LapTimes::default();
        assert!(times.sector(0).is_none());
        assert!(times.sector_mut(4).is_none());
        assert!(times.sector(3).is_some_and(TimedResultSeries::is_empty));
    }

    fn posted(millis: i64, lap_number: u32) -> TimedResult {
        TimedResult::new(TimeSpan::from_millis(millis), Rank::Normal, lap_number).expect("valid")
    }

    #[test]
    fn history_joins_sectors_and_laps_by_lap_number() {
        let mut times = LapTimes::default();
        assert!(times.history().is_empty());

        times.s1.add(posted(30_100, 1));
        times.s2.add(posted(29_400, 1));
        times.s3.add(posted(31_000, 1));
        times.laps.add(posted(90_500, 1));
        times.s1.add(posted(29_900, 2));
        times.s2.add(posted(29_100, 2));

        let history = times.history();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0],
            LapHistoryEntry {
                lap_number: 2,
                s1: Some(posted(29_900, 2)),
                s2: Some(posted(29_100, 2)),
                s3: None,
                lap: None,
            }
        );
        assert_eq!(history[1].lap_number, 1);
        assert_eq!(history[1].s3, Some(posted(31_000, 1)));
        assert_eq!(history[1].lap, Some(posted(90_500, 1)));
    }

    #[test]
    fn history_shows_corrected_sectors() {
        let mut times = LapTimes::default();
        times.s1.add(posted(30_000, 4));
        times.s2.add(posted(28_000, 4));
        times.s2.replace_last(posted(28_750, 4)).expect("non-empty");

        let history = times.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].s1, Some(posted(30_000, 4)));
        assert_eq!(history[0].s2, Some(posted(28_750, 4)));
    }

    #[test]
    fn history_skips_laps_without_times() {
        let mut times = LapTimes::default();
        times.laps.add(posted(91_000, 1));
        times.laps.add(posted(92_000, 5));
        times.laps.add(posted(93_000, 5));

        let history = times.history();
        let laps: Vec<u32> = history.iter().map(|entry| entry.lap_number).collect();
        assert_eq!(laps, vec![5, 1]);
        assert_eq!(history[0].lap, Some(posted(92_000, 5)));
        assert!(history.iter().all(|entry| entry.s1.is_none()));
    }

    #[test]
    fn qually_segments_are_one_based() {
        let mut qually = QuallyTimes::default();
        assert!(qually.set(2, TimeSpan::from_secs(80)));
        assert!(!qually.set(0, TimeSpan::from_secs(80)));
        assert_eq!(qually.get(2), Some(TimeSpan::from_secs(80)));
        assert_eq!(qually.get(1), None);
        assert_eq!(qually.get(-1), None);
    }

    #[test]
    fn new_drivers_start_blank() {
        let driver = Driver::new(12);
        assert_eq!(driver.id, 12);
        assert_eq!(driver.position, 0);
        assert!(driver.name.is_none());
        assert!(driver.lap_times.laps.is_empty());
    }
}
