//! Stream combinators for snapshot subscribers.

mod coalesce;

pub use coalesce::{Coalesce, CoalesceExt};
