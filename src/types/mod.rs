//! Core value types for live timing.
//!
//! This module provides the scalar building blocks shared by the codec, the
//! message catalogue and the state model.
//!
//! ## Contents
//!
//! - [`TimeSpan`] and [`Timestamp`] carry times as 100ns tick counts
//! - [`TimedResult`] is a posted lap or sector time with its [`Rank`]
//! - [`Gap`] is either a time gap or a lap gap, with lap gaps ordering last
//! - [`Value`] is the dynamically typed unit the codec reads and writes
//! - Wire-stable enums such as [`SessionType`] and [`GridColumn`]
//!
//! ## Usage Example
//!
//! ```rust
//! use livetiming::types::{Rank, TimeSpan, TimedResult};
//!
//! let best = TimedResult::new(TimeSpan::from_millis(89_512), Rank::SessionBest, 12)?;
//! let slower = TimedResult::new(TimeSpan::from_millis(90_001), Rank::Normal, 13)?;
//! assert!(best < slower);
//! assert_eq!(best.time().to_string(), "1:29.512");
//! # Ok::<(), livetiming::TimingError>(())
//! ```

mod enums;
mod time;
mod timing;
mod update_rate;
mod value;

pub use enums::{DriverStatus, GridColumn, GridColumnColour, SessionStatus, SessionType};
pub use time::{TICKS_PER_MILLISECOND, TICKS_PER_SECOND, TimeSpan, Timestamp};
pub use timing::{Gap, LapGap, Rank, TimeGap, TimedResult};
pub use update_rate::UpdateRate;
pub use value::{Decimal, Value};
