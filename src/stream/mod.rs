//! Snapshot streams built on the aggregator's watch channel.

mod throttle;

pub use throttle::{Throttle, ThrottleExt};

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::snapshot::RaceSnapshot;
use crate::types::UpdateRate;

/// Stream of published snapshots at no more than `rate`.
///
/// The empty snapshot that exists before the first packet is skipped, so the
/// first item always carries data. The stream ends when the publishing side
/// is dropped.
pub fn snapshot_updates(
    receiver: watch::Receiver<Arc<RaceSnapshot>>,
    rate: UpdateRate,
    source_hz: f64,
) -> impl Stream<Item = Arc<RaceSnapshot>> + Send + 'static {
    let snapshots = WatchStream::new(receiver).filter(|snapshot| {
        let has_data = snapshot.revision() > 0;
        async move { has_data }
    });

    match rate.throttle_interval(source_hz) {
        None => snapshots.boxed(),
        Some(interval) => snapshots.throttle(interval).boxed(),
    }
}
