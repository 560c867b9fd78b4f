//! Latest-wins rate limiting for snapshot streams

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to add throttling to any Stream
pub trait ThrottleExt: Stream {
    /// Emit at most once per `duration`.
    ///
    /// Items that arrive within one interval collapse into the newest one.
    /// When the inner stream ends, a pending item is still delivered before
    /// the throttled stream ends.
    fn throttle(self, duration: Duration) -> Throttle<Self>
    where
        Self: Sized,
    {
        Throttle::new(self, duration)
    }
}

impl<T: Stream> ThrottleExt for T {}

pin_project! {
    /// Stream returned by [`ThrottleExt::throttle`].
    pub struct Throttle<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        exhausted: bool,
    }
}

impl<S: Stream> Throttle<S> {
    pub fn new(stream: S, duration: Duration) -> Self {
        let mut interval = interval(duration);
        // Late ticks are delayed rather than fired in a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { stream, interval, pending: None, exhausted: false }
    }
}

impl<S: Stream> Stream for Throttle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.exhausted {
            return Poll::Ready(this.pending.take());
        }

        loop {
            ready!(this.interval.poll_tick(cx));

            // Keep only the newest item that is ready right now.
            loop {
                match this.stream.as_mut().poll_next(cx) {
                    Poll::Ready(Some(item)) => *this.pending = Some(item),
                    Poll::Ready(None) => {
                        *this.exhausted = true;
                        return Poll::Ready(this.pending.take());
                    }
                    Poll::Pending => break,
                }
            }

            if let Some(item) = this.pending.take() {
                return Poll::Ready(Some(item));
            }
            // Nothing arrived during this interval. The inner stream has
            // registered the waker; wait for the next tick instead of ending.
        }
    }
}
