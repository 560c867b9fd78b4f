//! Owned copy of one received UDP payload.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Bytes of a single datagram, copied out of the receive buffer.
///
/// The bytes are shared and immutable, so cloning a datagram is cheap and
/// never aliases the socket buffer.
#[derive(Debug, Clone)]
pub struct RawDatagram {
    bytes: Arc<[u8]>,
    source: SocketAddr,
    received_at: Instant,
}

impl RawDatagram {
    /// Copy `bytes` into a new datagram stamped with the current instant.
    pub fn new(bytes: &[u8], source: SocketAddr) -> Self {
        Self { bytes: Arc::from(bytes), source, received_at: Instant::now() }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Address of the sender.
    pub fn source(&self) -> SocketAddr {
        self.source
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}
