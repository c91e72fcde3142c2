//! The session aggregate and its message-driven builder.
//!
//! A [`Session`] is folded from the message stream one message at a time with
//! [`Session::process`]. It holds the drivers (ordered by position), the grid
//! for the current session type, the session-wide fastest times and the
//! weather readings.
//!
//! # Consistency
//!
//! A session has a single writer. Callers must not read a session while a
//! `process` call is running; the engine publishes cloned snapshots between
//! messages for that reason.
//!
//! ```rust
//! use livetiming::messages::{Message, SetDriverLapTime, SetSessionType};
//! use livetiming::model::Session;
//! use livetiming::types::{Rank, SessionType, TimeSpan, TimedResult};
//!
//! let mut session = Session::default();
//! session.process(&SetSessionType::new(SessionType::Race, "race".into())?.into())?;
//!
//! let lap = TimedResult::new(TimeSpan::from_secs(91), Rank::SessionBest, 1)?;
//! session.process(&Message::from(SetDriverLapTime::new(7, lap)?))?;
//!
//! assert_eq!(session.fastest().lap().and_then(|lap| lap.driver_id), Some(7));
//! assert_eq!(session.feed().message_count, 2);
//! # Ok::<(), livetiming::TimingError>(())
//! ```

mod builder;

use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, trace};

use super::driver::Driver;
use super::fastest::FastestTimes;
use super::grid::{Grid, GridKind};
use super::series::NumericSeries;
use super::sortable::SortableRows;
use crate::Result;
use crate::messages::Message;
use crate::types::{SessionStatus, SessionType, TimeSpan, Timestamp};

use builder::SessionBuilder;

/// Weather readings over the session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Weather {
    pub air_temperature: NumericSeries,
    pub track_temperature: NumericSeries,
    pub humidity: NumericSeries,
    pub pressure: NumericSeries,
    pub wind_speed: NumericSeries,
    pub wind_angle: NumericSeries,
    pub is_wet: bool,
}

/// Feed housekeeping values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feed {
    /// Messages processed since the session began.
    pub message_count: u64,
    pub keyframe: Option<i32>,
    pub copyright: Option<String>,
    pub ping_interval: Option<TimeSpan>,
    pub stream_valid: bool,
    pub stream_timestamp: Option<Timestamp>,
}

/// Commentary and the system banner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Messages {
    pub commentary: String,
    pub system: Option<String>,
}

/// Elapsed and remaining session time.
///
/// The clock only moves through [`Session::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionClock {
    pub elapsed: TimeSpan,
    pub remaining: TimeSpan,
    /// Whether elapsed time advances on a tick.
    pub running: bool,
    /// Whether remaining time counts down on a tick.
    pub counting_down: bool,
}

fn by_position(a: &Driver, b: &Driver) -> Ordering {
    a.position.cmp(&b.position)
}

/// The live state of one timing session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    session_type: SessionType,
    session_id: String,
    status: SessionStatus,
    race_lap_number: i32,
    min_required_qually_time: Option<TimeSpan>,
    clock: SessionClock,
    drivers: SortableRows<Driver>,
    grid: Grid,
    fastest: FastestTimes,
    weather: Weather,
    messages: Messages,
    feed: Feed,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionType::None)
    }
}

impl Session {
    pub fn new(session_type: SessionType) -> Self {
        Self {
            session_type,
            session_id: String::new(),
            status: SessionStatus::Finished,
            race_lap_number: 0,
            min_required_qually_time: None,
            clock: SessionClock::default(),
            drivers: SortableRows::new(by_position),
            grid: Grid::new(GridKind::for_session(session_type)),
            fastest: FastestTimes::new(),
            weather: Weather::default(),
            messages: Messages::default(),
            feed: Feed::default(),
        }
    }

    /// Applies one message.
    ///
    /// The message counter moves even when the message is rejected, so the
    /// count always matches the number of messages seen.
    pub fn process(&mut self, message: &Message) -> Result<()> {
        trace!("Processing {}", message.name());
        let result = message.accept(&mut SessionBuilder::new(self));
        self.feed.message_count += 1;
        result
    }

    /// Advances the session clock by `elapsed`.
    pub fn tick(&mut self, elapsed: TimeSpan) {
        if self.clock.running {
            self.clock.elapsed += elapsed;
        }
        if self.clock.counting_down {
            self.clock.remaining = (self.clock.remaining - elapsed).max(TimeSpan::ZERO);
        }
    }

    /// Starts a blank session of another type.
    fn reset(&mut self, session_type: SessionType) {
        debug!("Session type changed from {:?} to {:?}, resetting", self.session_type, session_type);
        *self = Self::new(session_type);
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn race_lap_number(&self) -> i32 {
        self.race_lap_number
    }

    pub fn min_required_qually_time(&self) -> Option<TimeSpan> {
        self.min_required_qually_time
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Drivers in position order.
    pub fn drivers(&self) -> &SortableRows<Driver> {
        &self.drivers
    }

    pub fn driver(&self, driver_id: i32) -> Option<&Driver> {
        self.drivers.find(|driver| driver.id == driver_id)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fastest(&self) -> &FastestTimes {
        &self.fastest
    }

    /// Sum of the fastest sector times, once all three are known.
    pub fn theoretical_best(&self) -> Option<TimeSpan> {
        self.fastest.theoretical_best()
    }

    /// Fastest lap minus the theoretical best.
    pub fn best_lap_delta(&self) -> Option<TimeSpan> {
        self.fastest.best_lap_delta()
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Looks up a driver, creating it on first reference.
    fn driver_mut(&mut self, driver_id: i32) -> &mut Driver {
        let index = match self.drivers.position(|driver| driver.id == driver_id) {
            Some(index) => index,
            None => {
                debug!("New driver {}", driver_id);
                self.drivers.push(Driver::new(driver_id))
            }
        };
        &mut self.drivers[index]
    }
}
