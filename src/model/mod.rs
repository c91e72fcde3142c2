//! Timing state built incrementally from messages.
//!
//! - [`Session`] is the aggregate root fed by [`Session::process`]
//! - [`Driver`] carries per-driver lap and sector [`TimedResultSeries`]
//! - [`Grid`] is the session-type specific tabular view
//! - [`FastestTimes`] tracks session bests and the theoretical best lap
//! - [`NumericSeries`] holds weather readings with running statistics
//! - [`SortableRows`] re-sorts rows with minimal moves

pub mod driver;
pub mod fastest;
pub mod grid;
pub mod series;
pub mod session;
pub mod sortable;

pub use driver::{Driver, LapHistoryEntry, LapTimes, PitTime, QuallyTimes};
pub use fastest::{FastestTime, FastestTimes};
pub use grid::{Grid, GridCell, GridKind, GridRow};
pub use series::{DeltaKind, NumericSeries, TimedResultSeries};
pub use session::{Feed, Messages, Session, SessionClock, Weather};
pub use sortable::{RowMove, SortableRows};
