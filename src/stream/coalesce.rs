//! Latest-wins rate limiting

use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to coalesce any Stream to a maximum rate
pub trait CoalesceExt: Stream {
    /// Emit at most once per `period`
    ///
    /// Items arriving between emissions replace each other, so a slow
    /// subscriber always receives the newest item. The last item before the
    /// stream ends is always delivered.
    fn coalesce(self, period: Duration) -> Coalesce<Self>
    where
        Self: Sized,
    {
        Coalesce::new(self, period)
    }
}

impl<T: Stream> CoalesceExt for T {}

pin_project! {
    /// A stream combinator that limits emission rate, keeping the latest item
    pub struct Coalesce<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        exhausted: bool,
    }
}

impl<S: Stream> Coalesce<S> {
    pub fn new(stream: S, period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { stream, interval, pending: None, exhausted: false }
    }
}

impl<S: Stream> Stream for Coalesce<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain whatever is ready, keeping only the latest
        while !*this.exhausted {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.exhausted = true,
                Poll::Pending => break,
            }
        }

        if this.pending.is_none() {
            return if *this.exhausted { Poll::Ready(None) } else { Poll::Pending };
        }
        if *this.exhausted {
            return Poll::Ready(this.pending.take());
        }

        match this.interval.poll_tick(cx) {
            Poll::Ready(_) => Poll::Ready(this.pending.take()),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    #[tokio::test(start_paused = true)]
    async fn bursts_collapse_to_the_latest_item() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut stream = UnboundedReceiverStream::new(rx).coalesce(Duration::from_millis(100));

        tx.send(1).expect("send");
        assert_eq!(stream.next().await, Some(1));

        for value in 2..=5 {
            tx.send(value).expect("send");
        }
        assert_eq!(stream.next().await, Some(5));

        tx.send(6).expect("send");
        drop(tx);
        assert_eq!(stream.next().await, Some(6));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn emissions_are_spaced_by_the_period() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut stream = UnboundedReceiverStream::new(rx).coalesce(Duration::from_millis(100));
        let start = tokio::time::Instant::now();

        tx.send(1).expect("send");
        assert_eq!(stream.next().await, Some(1));
        tx.send(2).expect("send");
        assert_eq!(stream.next().await, Some(2));
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn empty_streams_end_immediately() {
        let mut stream = futures::stream::empty::<u8>().coalesce(Duration::from_secs(1));
        assert_eq!(stream.next().await, None);
    }
}
