use super::{decode_fixed_str, encode_fixed_str, ensure_len, le_u16, STR_SIZE};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Bank header size on disk
pub const BANK_HEADER_SIZE: usize = STR_SIZE + 2;

/// Size of one member entry (a channel index)
pub const BANK_MEMBER_SIZE: usize = 4;

/// Fixed part of a bank (zone)
///
/// On disk the header is immediately followed by `member_count` u32 channel
/// indices, which is why banks live in a variable-length region instead of a
/// fixed-stride table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BankHeader {
    pub name: String,
    /// Number of channel indices following this header
    pub member_count: u16,
}

impl BankHeader {
    /// Header for a new, empty bank
    pub fn new(name: impl Into<String>) -> Self {
        BankHeader {
            name: name.into(),
            member_count: 0,
        }
    }

    /// Size of the whole bank blob (header + members)
    pub fn blob_size(&self) -> u64 {
        (BANK_HEADER_SIZE + self.member_count as usize * BANK_MEMBER_SIZE) as u64
    }

    pub fn to_bytes(&self) -> Result<[u8; BANK_HEADER_SIZE]> {
        let mut bytes = [0u8; BANK_HEADER_SIZE];
        bytes[..STR_SIZE].copy_from_slice(&encode_fixed_str("bank name", &self.name)?);
        bytes[STR_SIZE..].copy_from_slice(&self.member_count.to_le_bytes());
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len(bytes, BANK_HEADER_SIZE, "bank header")?;
        Ok(BankHeader {
            name: decode_fixed_str("bank name", &bytes[..STR_SIZE])?,
            member_count: le_u16(bytes, STR_SIZE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_header_layout() {
        let header = BankHeader {
            name: "Test Bank 1".to_string(),
            member_count: 3,
        };
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), 34);
        assert_eq!(&bytes[..11], b"Test Bank 1");
        assert_eq!(&bytes[32..34], &[3, 0]);
        assert_eq!(BankHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn test_blob_size() {
        assert_eq!(BankHeader::new("Empty").blob_size(), 34);
        let bank = BankHeader {
            name: "Five".to_string(),
            member_count: 5,
        };
        assert_eq!(bank.blob_size(), 34 + 20);
    }
}
