//! Type-safe ingestion of F1 UDP telemetry.
//!
//! Trackside receives the binary packets an F1 simulator broadcasts over UDP,
//! decodes them into structured records, and keeps the latest value of each
//! category in a [`RaceSnapshot`] for presentation layers to read.
//!
//! # Features
//!
//! - **Bounds-checked decoding**: every read goes through a [`Cursor`] that
//!   reports the offending decoder, offset and length instead of panicking
//! - **All ten packet kinds**: motion, session, lap data, events,
//!   participants, car setups, car telemetry, car status, final
//!   classification and lobby info, using the 2020 layouts
//! - **Isolated failures**: a malformed datagram is logged and dropped while
//!   the rest of the batch is applied
//! - **Snapshot streams**: rate-limited updates for async consumers
//!
//! # Pipeline
//!
//! ```text
//! UDP socket ─► listener thread ─► hand-off queue ─► tick: decode ─► aggregator ─► snapshot
//! ```
//!
//! The listener runs on its own OS thread and only copies bytes. All decoding
//! happens on the consumer side, once per [`LiveConnection::tick`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use trackside::Trackside;
//!
//! fn main() -> trackside::Result<()> {
//!     let mut connection = Trackside::listen()?;
//!     loop {
//!         connection.tick();
//!         if let Some(lap) = connection.snapshot().player_lap() {
//!             println!("P{} lap {}", lap.car_position, lap.current_lap_num);
//!         }
//!         std::thread::sleep(Duration::from_millis(16));
//!     }
//! }
//! ```
//!
//! ## Decoding a single datagram
//!
//! ```rust
//! use trackside::packets::decode_packet;
//! use trackside::TelemetryError;
//!
//! let err = decode_packet(&[0u8; 10]).unwrap_err();
//! assert!(matches!(err, TelemetryError::IndexOutOfRange { label: "packet header", .. }));
//! ```

// Core types and error handling
pub mod config;
pub mod cursor;
mod error;
pub mod packets;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Ingestion pipeline
pub mod connection;
pub mod datagram;
pub mod listener;
pub mod pump;
pub mod queue;
pub mod snapshot;
pub mod stream;

// Core exports
pub use error::*;
pub use types::*;

pub use config::IngestConfig;
pub use cursor::{Cursor, WireEnum};
pub use packets::{
    Dispatcher, FormatPolicy, Packet, PacketFormat, PacketHeader, PacketType, decode_packet,
};
pub use pump::{PumpStats, TickReport};
pub use snapshot::{RaceSnapshot, SnapshotAggregator};

pub use connection::live::LiveConnection;

/// Unified entry point for Trackside connections.
///
/// # Examples
///
/// ## Default port
/// ```rust,no_run
/// use trackside::Trackside;
///
/// # fn main() -> trackside::Result<()> {
/// let connection = Trackside::listen()?;
/// println!("listening on {}", connection.local_addr());
/// # Ok(())
/// # }
/// ```
///
/// ## Custom configuration
/// ```rust,no_run
/// use trackside::{IngestConfig, Trackside};
///
/// # fn main() -> trackside::Result<()> {
/// let config = IngestConfig::load("trackside.yaml")?.with_env_overrides()?;
/// let connection = Trackside::listen_with(&config)?;
/// # Ok(())
/// # }
/// ```
pub struct Trackside;

impl Trackside {
    /// Listen on `0.0.0.0:20777`, honouring `TRACKSIDE_UDP_PORT` and
    /// `TRACKSIDE_BIND_ADDRESS`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An environment override is malformed
    /// - The port is already bound by another process
    /// - The listener thread cannot be spawned
    pub fn listen() -> Result<LiveConnection> {
        let config = IngestConfig::default().with_env_overrides()?;
        LiveConnection::open(&config)
    }

    /// Listen with an explicit configuration. Environment variables are not
    /// consulted.
    pub fn listen_with(config: &IngestConfig) -> Result<LiveConnection> {
        LiveConnection::open(config)
    }
}
