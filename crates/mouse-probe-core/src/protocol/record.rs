//! Native `struct input_event` codec.
//!
//! Wire format (host byte order, no padding):
//! ```text
//! [tv_sec: c_long][tv_usec: c_long][type: u16][code: u16][value: i32]
//! ```
//! 24 bytes on 64-bit targets, 16 bytes on 32-bit targets.  An evdev node
//! only ever hands out whole records, so a read that returns fewer bytes
//! than [`RECORD_SIZE`] is a broken stream, not a partial record to buffer.

use std::ffi::c_long;
use std::mem::size_of;

use thiserror::Error;

const LONG_SIZE: usize = size_of::<c_long>();

/// Size in bytes of one event record on this host.
pub const RECORD_SIZE: usize = 2 * LONG_SIZE + 8;

const TYPE_OFFSET: usize = 2 * LONG_SIZE;
const CODE_OFFSET: usize = TYPE_OFFSET + 2;
const VALUE_OFFSET: usize = CODE_OFFSET + 2;

/// Errors produced while decoding a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Fewer bytes than one full record.
    #[error("truncated event record: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },
}

/// Kernel timestamp attached to every record.  Carried through but not
/// interpreted by the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub microseconds: i64,
}

/// One decoded `input_event`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputRecord {
    pub time: Timestamp,
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl InputRecord {
    /// Builds a record with a zero timestamp.
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            time: Timestamp::default(),
            event_type,
            code,
            value,
        }
    }

    /// Decodes the first [`RECORD_SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Truncated`] if `bytes` is shorter than one record.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() < RECORD_SIZE {
            return Err(RecordError::Truncated {
                needed: RECORD_SIZE,
                available: bytes.len(),
            });
        }

        Ok(Self {
            time: Timestamp {
                seconds: read_long(&bytes[..LONG_SIZE]),
                microseconds: read_long(&bytes[LONG_SIZE..TYPE_OFFSET]),
            },
            event_type: u16::from_ne_bytes([bytes[TYPE_OFFSET], bytes[TYPE_OFFSET + 1]]),
            code: u16::from_ne_bytes([bytes[CODE_OFFSET], bytes[CODE_OFFSET + 1]]),
            value: i32::from_ne_bytes([
                bytes[VALUE_OFFSET],
                bytes[VALUE_OFFSET + 1],
                bytes[VALUE_OFFSET + 2],
                bytes[VALUE_OFFSET + 3],
            ]),
        })
    }

    /// Encodes the record in the host's native layout.
    ///
    /// Timestamps outside the `c_long` range are truncated on 32-bit hosts.
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[..LONG_SIZE].copy_from_slice(&(self.time.seconds as c_long).to_ne_bytes());
        buf[LONG_SIZE..TYPE_OFFSET]
            .copy_from_slice(&(self.time.microseconds as c_long).to_ne_bytes());
        buf[TYPE_OFFSET..CODE_OFFSET].copy_from_slice(&self.event_type.to_ne_bytes());
        buf[CODE_OFFSET..VALUE_OFFSET].copy_from_slice(&self.code.to_ne_bytes());
        buf[VALUE_OFFSET..].copy_from_slice(&self.value.to_ne_bytes());
        buf
    }
}

fn read_long(bytes: &[u8]) -> i64 {
    let mut raw = [0u8; LONG_SIZE];
    raw.copy_from_slice(bytes);
    c_long::from_ne_bytes(raw) as i64
}
