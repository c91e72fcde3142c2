//! Session-wide fastest lap and sector times.

use serde::Serialize;

use crate::types::TimeSpan;

/// The holder of a fastest time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FastestTime {
    /// `None` for the theoretical best, which no single driver holds.
    pub driver_id: Option<i32>,
    pub time: TimeSpan,
    pub lap_number: u32,
    /// Change against the previous holder's time. For the theoretical best
    /// this is the fastest lap minus the theoretical best.
    pub delta: Option<TimeSpan>,
}

/// Fastest lap, fastest sectors and the theoretical best lap they add up to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FastestTimes {
    lap: Option<FastestTime>,
    sectors: [Option<FastestTime>; 3],
    possible: Option<FastestTime>,
}

impl FastestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lap(&self) -> Option<&FastestTime> {
        self.lap.as_ref()
    }

    /// Fastest time for sector 1, 2 or 3.
    pub fn sector(&self, number: i32) -> Option<&FastestTime> {
        sector_slot(number).and_then(|index| self.sectors[index].as_ref())
    }

    /// The theoretical best lap, once all three sectors are known.
    pub fn possible(&self) -> Option<&FastestTime> {
        self.possible.as_ref()
    }

    pub fn theoretical_best(&self) -> Option<TimeSpan> {
        self.possible.map(|possible| possible.time)
    }

    /// Fastest lap minus the theoretical best.
    pub fn best_lap_delta(&self) -> Option<TimeSpan> {
        self.possible.and_then(|possible| possible.delta)
    }

    pub fn is_empty(&self) -> bool {
        self.lap.is_none() && self.sectors.iter().all(Option::is_none)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_lap(&mut self, driver_id: i32, time: TimeSpan, lap_number: u32) {
        self.lap = Some(next_holder(self.lap, driver_id, time, lap_number));
        self.compute_possible();
    }

    /// Records a new fastest sector. Returns `false` for a sector outside 1..=3.
    pub fn set_sector(&mut self, number: i32, driver_id: i32, time: TimeSpan, lap_number: u32) -> bool {
        let Some(index) = sector_slot(number) else {
            return false;
        };
        self.sectors[index] = Some(next_holder(self.sectors[index], driver_id, time, lap_number));
        self.compute_possible();
        true
    }

    fn compute_possible(&mut self) {
        let [Some(s1), Some(s2), Some(s3)] = self.sectors else {
            self.possible = None;
            return;
        };
        let time = s1.time + s2.time + s3.time;
        self.possible = Some(FastestTime {
            driver_id: None,
            time,
            lap_number: 0,
            delta: self.lap.map(|lap| lap.time - time),
        });
    }
}

fn next_holder(previous: Option<FastestTime>, driver_id: i32, time: TimeSpan, lap_number: u32) -> FastestTime {
    FastestTime {
        driver_id: Some(driver_id),
        time,
        lap_number,
        delta: previous.map(|previous| time - previous.time),
    }
}

fn sector_slot(number: i32) -> Option<usize> {
    match number {
        1..=3 => usize::try_from(number - 1).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f64) -> TimeSpan {
        TimeSpan::from_secs_f64(value)
    }

    #[test]
    fn theoretical_best_needs_all_sectors() {
        let mut fastest = FastestTimes::new();
        fastest.set_sector(1, 7, secs(30.0), 1);
        fastest.set_sector(2, 8, secs(29.0), 1);
        assert_eq!(fastest.theoretical_best(), None);

        fastest.set_sector(3, 7, secs(31.0), 1);
        assert_eq!(fastest.theoretical_best(), Some(secs(90.0)));
        assert_eq!(fastest.best_lap_delta(), None);
        assert_eq!(fastest.possible().and_then(|p| p.driver_id), None);
    }

    #[test]
    fn lap_delta_tracks_every_component() {
        let mut fastest = FastestTimes::new();
        for (sector, time) in [(1, 30.0), (2, 29.0), (3, 31.0)] {
            fastest.set_sector(sector, 7, secs(time), 1);
        }
        fastest.set_lap(7, secs(91.0), 1);
        assert_eq!(fastest.best_lap_delta(), Some(secs(1.0)));

        fastest.set_sector(2, 9, secs(28.5), 2);
        assert_eq!(fastest.theoretical_best(), Some(secs(89.5)));
        assert_eq!(fastest.best_lap_delta(), Some(secs(1.5)));
    }

    #[test]
    fn holder_delta_compares_with_the_previous_holder() {
        let mut fastest = FastestTimes::new();
        fastest.set_lap(7, secs(91.0), 3);
        assert_eq!(fastest.lap().and_then(|lap| lap.delta), None);

        fastest.set_lap(4, secs(90.25), 5);
        let lap = fastest.lap().copied().expect("fastest lap");
        assert_eq!(lap.driver_id, Some(4));
        assert_eq!(lap.lap_number, 5);
        assert_eq!(lap.delta, Some(secs(-0.75)));
    }

    #[test]
    fn theoretical_best_saturates_instead_of_overflowing() {
        let mut fastest = FastestTimes::new();
        for sector in 1..=3 {
            fastest.set_sector(sector, 7, TimeSpan::from_ticks(i64::MAX / 2), 1);
        }
        assert_eq!(fastest.theoretical_best(), Some(TimeSpan::from_ticks(i64::MAX)));

        fastest.set_lap(7, TimeSpan::from_ticks(i64::MIN + 1), 1);
        assert_eq!(fastest.best_lap_delta(), Some(TimeSpan::from_ticks(i64::MIN)));
    }

    #[test]
    fn sector_numbers_outside_range_are_ignored() {
        let mut fastest = FastestTimes::new();
        assert!(!fastest.set_sector(0, 7, secs(30.0), 1));
        assert!(!fastest.set_sector(4, 7, secs(30.0), 1));
        assert!(fastest.is_empty());

        assert!(fastest.set_sector(3, 7, secs(30.0), 1));
        assert!(!fastest.is_empty());
        fastest.reset();
        assert!(fastest.is_empty());
        assert_eq!(fastest.sector(3), None);
    }
}
