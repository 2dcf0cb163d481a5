//! Fixed-size record codecs
//!
//! Every record is packed little-endian with bit fields allocated LSB first,
//! matching the on-disk layout radios already read. Mode-specific payloads
//! are tagged enums here and only become overlapping bytes at the encode and
//! decode boundary.

pub mod bank;
pub mod channel;
pub mod contact;

pub use bank::{BankHeader, BANK_HEADER_SIZE, BANK_MEMBER_SIZE};
pub use channel::{
    ctcss_frequency, Admit, Bandwidth, Channel, DmrInfo, FmInfo, GeoLocation, M17Crypto,
    M17Gps, M17Info, M17Mode, ModeInfo, Squelch, CHANNEL_SIZE, CTCSS_TONES, NO_CONTACT,
};
pub use contact::{CallType, Contact, ContactInfo, DmrContact, M17Contact, CONTACT_SIZE};

use crate::error::{CodeplugError, Result};
use serde::{Deserialize, Serialize};

/// Width of every fixed string field
pub const STR_SIZE: usize = 32;

/// Operating mode tag shared by contacts and channels
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpMode {
    None = 0,
    Fm = 1,
    Dmr = 2,
    M17 = 3,
}

impl OpMode {
    /// Parse a mode tag
    ///
    /// The tag selects the layout of the trailing payload, so unknown values
    /// are a format error rather than a silent default.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(OpMode::None),
            1 => Ok(OpMode::Fm),
            2 => Ok(OpMode::Dmr),
            3 => Ok(OpMode::M17),
            other => Err(CodeplugError::InvalidMode(other)),
        }
    }
}

/// Encode a string into a NUL-filled fixed field
///
/// A value may use all 32 bytes, in which case it is not NUL terminated.
pub fn encode_fixed_str(field: &'static str, value: &str) -> Result<[u8; STR_SIZE]> {
    let raw = value.as_bytes();
    if raw.len() > STR_SIZE {
        return Err(CodeplugError::StringTooLong {
            field,
            len: raw.len(),
            max: STR_SIZE,
        });
    }

    let mut out = [0u8; STR_SIZE];
    out[..raw.len()].copy_from_slice(raw);
    Ok(out)
}

/// Decode a fixed field up to its first NUL
pub fn decode_fixed_str(field: &'static str, bytes: &[u8]) -> Result<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end])
        .map(|s| s.to_string())
        .map_err(|_| CodeplugError::InvalidString { field })
}

pub(crate) fn le_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn le_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}

/// Reject buffers shorter than the record being decoded
pub(crate) fn ensure_len(bytes: &[u8], needed: usize, what: &str) -> Result<()> {
    if bytes.len() < needed {
        return Err(CodeplugError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("Insufficient bytes for {}: {} < {}", what, bytes.len(), needed),
        )));
    }
    Ok(())
}
