//! Per-tick drain loop: queue -> decode -> aggregate -> publish.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::packets::{Dispatcher, FormatPolicy, PacketFormat, PacketHeader};
use crate::queue::DatagramReceiver;
use crate::snapshot::SnapshotAggregator;

/// Outcome of a single [`PacketPump::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TickReport {
    /// Datagrams taken from the queue.
    pub drained: usize,
    /// Datagrams decoded and applied.
    pub decoded: usize,
    /// Datagrams dropped because they failed to decode.
    pub failed: usize,
}

/// Totals since the pump was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PumpStats {
    pub ticks: u64,
    pub datagrams: u64,
    pub decoded: u64,
    pub failed: u64,
    /// Decoded datagrams whose format year was not recognised.
    pub unknown_format: u64,
}

impl PumpStats {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.datagrams += report.drained as u64;
        self.decoded += report.decoded as u64;
        self.failed += report.failed as u64;
    }
}

/// Drains the hand-off queue and feeds the aggregator.
#[derive(Debug)]
pub struct PacketPump {
    receiver: DatagramReceiver,
    dispatcher: Dispatcher,
    aggregator: SnapshotAggregator,
    stats: PumpStats,
    last_format: Option<PacketFormat>,
}

impl PacketPump {
    pub fn new(receiver: DatagramReceiver, policy: FormatPolicy) -> Self {
        Self {
            receiver,
            dispatcher: Dispatcher::new(policy),
            aggregator: SnapshotAggregator::new(),
            stats: PumpStats::default(),
            last_format: None,
        }
    }

    /// Process everything queued since the previous tick.
    ///
    /// A datagram that fails to decode is logged and dropped; the rest of the
    /// batch is still applied. Subscribers are notified once, and only when at
    /// least one packet was applied.
    pub fn tick(&mut self) -> TickReport {
        let batch = self.receiver.drain();
        let mut report = TickReport { drained: batch.len(), ..TickReport::default() };

        for datagram in batch {
            match self.dispatcher.decode(datagram.bytes()) {
                Ok(packet) => {
                    self.note_format(packet.header());
                    trace!(packet_type = ?packet.packet_type(), "Applying packet");
                    self.aggregator.apply(packet);
                    report.decoded += 1;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        len = datagram.len(),
                        source = %datagram.source(),
                        "Dropping undecodable datagram"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.decoded > 0 {
            self.aggregator.publish();
        }
        if report.drained > 0 {
            debug!(
                drained = report.drained,
                decoded = report.decoded,
                failed = report.failed,
                "Tick processed"
            );
        }
        self.stats.record(&report);
        report
    }

    pub fn aggregator(&self) -> &SnapshotAggregator {
        &self.aggregator
    }

    pub fn stats(&self) -> PumpStats {
        self.stats
    }

    fn note_format(&mut self, header: &PacketHeader) {
        let format = header.packet_format;
        if !format.is_known() {
            self.stats.unknown_format += 1;
        }
        if self.last_format != Some(format) {
            debug!(%format, game_version = %header.game_version(), "Packet format changed");
            self.last_format = Some(format);
        }
    }
}
