//! Test utilities for building wire-format datagrams.
//!
//! Used by unit tests, integration tests and the decode benchmarks so that
//! fixture bytes are produced the same way everywhere.

#![cfg(any(test, feature = "benchmark"))]

use crate::packets::participants::NAME_SIZE;
use crate::packets::{EventPacket, HEADER_SIZE, PacketType};

/// Session uid written by [`PacketBuilder::header`].
pub const TEST_SESSION_UID: u64 = 0x5EED_0000_2020_0001;

/// Little-endian byte builder for hand-made packets.
#[derive(Debug, Default, Clone)]
pub struct PacketBuilder {
    bytes: Vec<u8>,
}

impl PacketBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a complete 24-byte header for `packet_type`.
    pub fn header(format: u16, packet_type: PacketType) -> Self {
        Self::new()
            .u16(format)
            .u8(1)
            .u8(0)
            .u8(1)
            .u8(packet_type.id())
            .u64(TEST_SESSION_UID)
            .f32(0.0)
            .u32(0)
            .u8(0)
            .u8(255)
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn i8(self, value: i8) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u16(self, value: u16) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i16(self, value: i16) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32(self, value: u32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u64(self, value: u64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f32(self, value: f32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f64(self, value: f64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.bytes.extend_from_slice(value);
        self
    }

    /// A NUL-padded name field.
    pub fn name(self, value: &str) -> Self {
        let mut field = [0u8; NAME_SIZE];
        let len = value.len().min(NAME_SIZE);
        field[..len].copy_from_slice(&value.as_bytes()[..len]);
        self.bytes(&field)
    }

    /// Zero-fill up to `len` bytes. Never truncates.
    pub fn pad_to(mut self, len: usize) -> Self {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A full-size packet of `packet_type` with a valid header and zeroed payload.
pub fn sized_packet(format: u16, packet_type: PacketType) -> Vec<u8> {
    PacketBuilder::header(format, packet_type).pad_to(packet_type.packet_size()).build()
}

/// An event packet with `code` and `details` starting right after the code.
pub fn event_packet(format: u16, code: &[u8; 4], details: &[u8]) -> Vec<u8> {
    PacketBuilder::header(format, PacketType::Event)
        .bytes(code)
        .bytes(details)
        .pad_to(EventPacket::SIZE)
        .build()
}

/// A packet with `frame` written into the header, for ordering checks.
pub fn with_frame(mut bytes: Vec<u8>, frame: u32) -> Vec<u8> {
    if bytes.len() >= HEADER_SIZE {
        bytes[18..22].copy_from_slice(&frame.to_le_bytes());
    }
    bytes
}
