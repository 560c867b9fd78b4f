//! Live UDP connection: listener thread plus consumer-side drain loop

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::Result;
use crate::config::IngestConfig;
use crate::listener::UdpListener;
use crate::pump::{PacketPump, PumpStats, TickReport};
use crate::queue::handoff;
use crate::snapshot::RaceSnapshot;
use crate::stream::snapshot_updates;
use crate::types::UpdateRate;

/// Shortest tick period [`LiveConnection::run`] will use.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Live connection to a simulator's UDP telemetry.
///
/// Datagrams are received on a background thread as soon as the connection
/// is open, but they are only decoded when [`tick`](Self::tick) is called,
/// either by the owner's frame loop or by [`run`](Self::run).
pub struct LiveConnection {
    /// Background receiver; dropped before the pump so the socket closes first.
    listener: UdpListener,

    /// Drain loop and aggregator.
    pump: PacketPump,

    /// Expected send rate of the simulator.
    source_hz: f64,
}

impl LiveConnection {
    /// Bind the configured socket and start receiving.
    pub fn open(config: &IngestConfig) -> Result<Self> {
        config.validate()?;

        let (sender, receiver) = handoff();
        let listener = UdpListener::bind(config, sender)?;
        let pump = PacketPump::new(receiver, config.format_policy);

        info!(
            local_addr = %listener.local_addr(),
            policy = ?config.format_policy,
            "Live connection established ({}Hz) - waiting for packets",
            config.source_hz
        );

        Ok(Self { listener, pump, source_hz: config.source_hz })
    }

    /// Decode everything received since the previous tick.
    pub fn tick(&mut self) -> TickReport {
        self.pump.tick()
    }

    /// Current state, including packets applied but not yet published.
    pub fn snapshot(&self) -> &RaceSnapshot {
        self.pump.aggregator().snapshot()
    }

    pub fn stats(&self) -> PumpStats {
        self.pump.stats()
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Receiver holding the latest published snapshot.
    pub fn watch(&self) -> watch::Receiver<Arc<RaceSnapshot>> {
        self.pump.aggregator().subscribe()
    }

    /// Subscribe to published snapshots at no more than `rate`.
    ///
    /// Snapshots are only published by ticks, so the stream stays idle unless
    /// something drives [`tick`](Self::tick) or [`run`](Self::run).
    pub fn subscribe(
        &self,
        rate: UpdateRate,
    ) -> impl Stream<Item = Arc<RaceSnapshot>> + Send + 'static {
        snapshot_updates(self.watch(), rate, self.source_hz)
    }

    /// Tick every `interval` until `cancel` fires. Returns the final stats.
    ///
    /// Intervals shorter than [`MIN_TICK_INTERVAL`] are raised to it.
    pub async fn run(&mut self, interval: Duration, cancel: CancellationToken) -> PumpStats {
        let mut ticker = tokio::time::interval(interval.max(MIN_TICK_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Drain loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        // Pick up anything that arrived after the last tick.
        self.tick();
        self.stats()
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        debug!(stats = ?self.pump.stats(), "Dropping live connection");
    }
}
