//! Running statistics over numeric readings and posted times.
//!
//! Both series update their statistics incrementally on every append: the sum
//! and sum of squares are carried along so mean and standard deviation never
//! rescan the items.

use serde::Serialize;
use tracing::trace;

use crate::types::{Rank, TimeSpan, TimedResult};
use crate::{Result, TimingError};

/// Direction of the latest change in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum DeltaKind {
    #[default]
    None,
    Increase,
    Decrease,
}

impl DeltaKind {
    fn between<T: PartialOrd>(previous: T, current: T) -> Self {
        if current > previous {
            DeltaKind::Increase
        } else if current < previous {
            DeltaKind::Decrease
        } else {
            DeltaKind::None
        }
    }
}

/// Append-only series of readings with running statistics.
///
/// The standard deviation is the population form `sqrt(sum_sq / n - mean^2)`
/// computed from running sums.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NumericSeries {
    items: Vec<f64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    sum: f64,
    sum_of_squares: f64,
    current_delta: DeltaKind,
}

impl NumericSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reading. NaN would poison every statistic, so it is rejected.
    pub fn add(&mut self, value: f64) -> Result<()> {
        if value.is_nan() {
            return Err(TimingError::domain("reading", "must be a number"));
        }

        self.current_delta = self.current().map_or(DeltaKind::None, |c| DeltaKind::between(c, value));
        if self.minimum.is_none_or(|min| value < min) {
            self.minimum = Some(value);
        }
        if self.maximum.is_none_or(|max| value > max) {
            self.maximum = Some(value);
        }
        self.sum += value;
        self.sum_of_squares += value * value;
        self.items.push(value);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn items(&self) -> &[f64] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<f64> {
        self.items.last().copied()
    }

    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    pub fn range(&self) -> Option<f64> {
        Some(self.maximum? - self.minimum?)
    }

    pub fn mean(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.sum / self.count() as f64)
    }

    pub fn standard_deviation(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self.sum_of_squares / self.count() as f64 - mean * mean;
        // Rounding can push a zero variance slightly negative.
        Some(variance.max(0.0).sqrt())
    }

    pub fn current_delta(&self) -> DeltaKind {
        self.current_delta
    }
}

/// Append-only series of posted times with best-of tracking.
///
/// Minimum and maximum follow [`TimedResult`] ordering, so equal times resolve
/// in favour of the more special rank. The most recent item can be corrected
/// with [`TimedResultSeries::replace_last`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimedResultSeries {
    items: Vec<TimedResult>,
    minimum: Option<TimedResult>,
    maximum: Option<TimedResult>,
    total_ticks: i128,
    personal_best_count: usize,
    session_best_count: usize,
}

impl TimedResultSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: TimedResult) {
        self.widen_extremes(result);
        self.total_ticks += i128::from(result.time().ticks());
        self.count_rank(result.rank(), 1);
        self.items.push(result);
    }

    /// Replaces the most recent item and returns the one it displaced.
    ///
    /// When the displaced item held an extreme and the replacement does not
    /// reach it, that extreme is recomputed from the remaining items. Rank
    /// counts change only when the rank differs.
    pub fn replace_last(&mut self, replacement: TimedResult) -> Result<TimedResult> {
        let Some(slot) = self.items.last_mut() else {
            return Err(TimingError::EmptySeries { operation: "replace the last item of" });
        };
        let previous = std::mem::replace(slot, replacement);
        trace!("Replacing {} with {}", previous, replacement);

        if self.minimum == Some(previous) && replacement > previous {
            self.minimum = self.items.iter().min().copied();
        }
        if self.maximum == Some(previous) && replacement < previous {
            self.maximum = self.items.iter().max().copied();
        }
        self.widen_extremes(replacement);
        self.total_ticks += i128::from(replacement.time().ticks()) - i128::from(previous.time().ticks());
        if previous.rank() != replacement.rank() {
            self.count_rank(previous.rank(), -1);
            self.count_rank(replacement.rank(), 1);
        }
        Ok(previous)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn widen_extremes(&mut self, result: TimedResult) {
        if self.minimum.is_none_or(|min| result < min) {
            self.minimum = Some(result);
        }
        if self.maximum.is_none_or(|max| result > max) {
            self.maximum = Some(result);
        }
    }

    fn count_rank(&mut self, rank: Rank, change: isize) {
        let bucket = match rank {
            Rank::PersonalBest => &mut self.personal_best_count,
            Rank::SessionBest => &mut self.session_best_count,
            Rank::Normal => return,
        };
        *bucket = bucket.saturating_add_signed(change);
    }

    pub fn items(&self) -> &[TimedResult] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<TimedResult> {
        self.items.last().copied()
    }

    pub fn previous(&self) -> Option<TimedResult> {
        self.items.len().checked_sub(2).map(|index| self.items[index])
    }

    /// `current - previous`, once there are two items.
    pub fn current_delta(&self) -> Option<TimeSpan> {
        Some(self.current()?.time() - self.previous()?.time())
    }

    pub fn current_delta_kind(&self) -> DeltaKind {
        match (self.previous(), self.current()) {
            (Some(previous), Some(current)) => DeltaKind::between(previous.time(), current.time()),
            _ => DeltaKind::None,
        }
    }

    pub fn minimum(&self) -> Option<TimedResult> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<TimedResult> {
        self.maximum
    }

    pub fn range(&self) -> Option<TimeSpan> {
        Some(self.maximum?.time() - self.minimum?.time())
    }

    /// Mean time, truncated to whole ticks.
    pub fn mean(&self) -> Option<TimeSpan> {
        let count = i128::try_from(self.count()).ok().filter(|count| *count > 0)?;
        i64::try_from(self.total_ticks / count).ok().map(TimeSpan::from_ticks)
    }

    pub fn personal_best_count(&self) -> usize {
        self.personal_best_count
    }

    pub fn session_best_count(&self) -> usize {
        self.session_best_count
    }
}
