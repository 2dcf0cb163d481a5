use crate::error::{CodeplugError, Result};
use crate::record::{decode_fixed_str, encode_fixed_str, le_u16, le_u64};
use serde::{Deserialize, Serialize};

/// "RTXC" read as a little-endian integer
pub const MAGIC: u64 = 0x4358_5452;
pub const VERSION_MAJOR: u8 = 0;
pub const VERSION_MINOR: u8 = 1;
pub const HEADER_SIZE: usize = 88;

pub const DEFAULT_AUTHOR: &str = "Codeplug author.";
pub const DEFAULT_DESCRIPTION: &str = "Codeplug description.";

/// Codeplug header (first 88 bytes of the store)
///
/// The header is the single source of truth for table sizes. Every structural
/// edit rewrites it in the same logical step as the edit itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeplugHeader {
    /// Magic number: "RTXC"
    pub magic: u64,

    /// Format version (major)
    pub version_major: u8,

    /// Format version (minor)
    pub version_minor: u8,

    /// Author of the codeplug
    pub author: String,

    /// Free-text description
    pub description: String,

    /// Creation time, Unix seconds
    pub timestamp: u64,

    /// Number of stored contacts
    pub contact_count: u16,

    /// Number of stored channels
    pub channel_count: u16,

    /// Number of stored banks
    pub bank_count: u16,
}

impl CodeplugHeader {
    /// Create an empty header stamped with the current time
    pub fn new() -> Self {
        CodeplugHeader {
            magic: MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            author: DEFAULT_AUTHOR.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            timestamp: chrono::Utc::now().timestamp().max(0) as u64,
            contact_count: 0,
            channel_count: 0,
            bank_count: 0,
        }
    }

    /// Packed version number as stored on disk
    pub fn version_number(&self) -> u16 {
        (self.version_major as u16) << 8 | self.version_minor as u16
    }

    /// Validate the header magic and version
    ///
    /// A codeplug is readable when its major version matches exactly and its
    /// minor version is not newer than the one this crate writes.
    pub fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(CodeplugError::InvalidMagic(self.magic));
        }

        if self.version_major != VERSION_MAJOR || self.version_minor > VERSION_MINOR {
            return Err(CodeplugError::UnsupportedVersion {
                major: self.version_major,
                minor: self.version_minor,
            });
        }

        Ok(())
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..8].copy_from_slice(&self.magic.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.version_number().to_le_bytes());
        bytes[10..42].copy_from_slice(&encode_fixed_str("author", &self.author)?);
        bytes[42..74].copy_from_slice(&encode_fixed_str("description", &self.description)?);
        bytes[74..82].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes[82..84].copy_from_slice(&self.contact_count.to_le_bytes());
        bytes[84..86].copy_from_slice(&self.channel_count.to_le_bytes());
        bytes[86..88].copy_from_slice(&self.bank_count.to_le_bytes());

        Ok(bytes)
    }

    /// Deserialize and validate a header
    ///
    /// Magic and version are checked before any other field is decoded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CodeplugError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Insufficient bytes for header",
            )));
        }

        let magic = le_u64(bytes, 0);
        let version = le_u16(bytes, 8);

        let mut header = CodeplugHeader {
            magic,
            version_major: (version >> 8) as u8,
            version_minor: (version & 0xff) as u8,
            author: String::new(),
            description: String::new(),
            timestamp: 0,
            contact_count: 0,
            channel_count: 0,
            bank_count: 0,
        };
        header.validate()?;

        header.author = decode_fixed_str("author", &bytes[10..42])?;
        header.description = decode_fixed_str("description", &bytes[42..74])?;
        header.timestamp = le_u64(bytes, 74);
        header.contact_count = le_u16(bytes, 82);
        header.channel_count = le_u16(bytes, 84);
        header.bank_count = le_u16(bytes, 86);

        Ok(header)
    }
}

impl Default for CodeplugHeader {
    fn default() -> Self {
        Self::new()
    }
}
