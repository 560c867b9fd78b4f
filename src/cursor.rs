//! Position-tracking binary reader over a borrowed byte buffer.
//!
//! Every packet decoder owns its own [`Cursor`], so a failed decode can never
//! disturb another one. All multi-byte reads are little-endian.
//!
//! ```rust
//! use trackside::Cursor;
//!
//! let bytes = [0xE4, 0x07, 1, 24];
//! let mut cursor = Cursor::new(&bytes, "header");
//! assert_eq!(cursor.read_u16()?, 2020);
//! assert_eq!(cursor.read_u8()?, 1);
//! assert_eq!(cursor.read_u8()?, 24);
//! assert!(cursor.read_u8().is_err());
//! # Ok::<(), trackside::TelemetryError>(())
//! ```

use crate::{Result, TelemetryError};

/// A closed set of values decoded from a single wire byte.
///
/// Unrecognised values are preserved rather than rejected, so implementors
/// carry an `Unknown(raw)` variant.
pub trait WireEnum: Sized + Copy {
    /// Map a raw wire value to the enumeration.
    fn from_wire(raw: i16) -> Self;

    /// The raw wire value this member was decoded from.
    fn to_wire(self) -> i16;
}

/// Sequential and random-access reader over an immutable byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
    label: &'static str,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `data`.
    ///
    /// `label` identifies the decoder in bounds errors.
    pub fn new(data: &'a [u8], label: &'static str) -> Self {
        Self { data, position: 0, label }
    }

    /// Create a cursor positioned at `offset`.
    ///
    /// Fails if `offset` is beyond the end of `data`.
    pub fn at(data: &'a [u8], offset: usize, label: &'static str) -> Result<Self> {
        let mut cursor = Self::new(data, label);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Debug label reported in bounds errors.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Jump to an absolute position without consuming the bytes in between.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(TelemetryError::out_of_range(self.label, position, 0, self.data.len()));
        }
        self.position = position;
        Ok(())
    }

    /// Advance past `count` bytes without decoding them.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// Read the byte at an absolute offset without moving the cursor.
    pub fn byte_at(&self, offset: usize) -> Result<u8> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| TelemetryError::out_of_range(self.label, offset, 1, self.data.len()))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take_array::<1>()?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.take_array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.take_array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.take_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.take_array().map(i32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.take_array().map(u64::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.take_array().map(f32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.take_array().map(f64::from_le_bytes)
    }

    /// Read a boolean byte. Only the literal value `1` is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? == 1)
    }

    /// Read `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    /// Read exactly `count` bytes as UTF-8 text.
    ///
    /// Invalid sequences are replaced; padding is kept as-is.
    pub fn read_string(&mut self, count: usize) -> Result<String> {
        let bytes = self.take(count)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read an unsigned byte as a member of `E`.
    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E> {
        Ok(E::from_wire(i16::from(self.read_u8()?)))
    }

    /// Read a signed byte as a member of `E`.
    pub fn read_signed_enum<E: WireEnum>(&mut self) -> Result<E> {
        Ok(E::from_wire(i16::from(self.read_i8()?)))
    }

    /// Read `N` consecutive unsigned bytes as members of `E`.
    pub fn read_enum_array<E: WireEnum, const N: usize>(&mut self) -> Result<[E; N]> {
        let bytes = self.take_array::<N>()?;
        Ok(bytes.map(|b| E::from_wire(i16::from(b))))
    }

    /// Read `N` consecutive signed bytes as members of `E`.
    pub fn read_signed_enum_array<E: WireEnum, const N: usize>(&mut self) -> Result<[E; N]> {
        let bytes = self.take_array::<N>()?;
        Ok(bytes.map(|b| E::from_wire(i16::from(b as i8))))
    }

    pub fn read_u8_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.take_array()
    }

    pub fn read_u16_array<const N: usize>(&mut self) -> Result<[u16; N]> {
        self.ensure(N * 2)?;
        let mut values = [0u16; N];
        for value in &mut values {
            *value = self.read_u16()?;
        }
        Ok(values)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        self.ensure(N * 4)?;
        let mut values = [0f32; N];
        for value in &mut values {
            *value = self.read_f32()?;
        }
        Ok(values)
    }

    /// Check that `count` bytes are available without consuming them.
    fn ensure(&self, count: usize) -> Result<()> {
        match self.position.checked_add(count) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(TelemetryError::out_of_range(
                self.label,
                self.position,
                count,
                self.data.len(),
            )),
        }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }
}
