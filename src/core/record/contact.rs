use super::{decode_fixed_str, encode_fixed_str, ensure_len, le_u32, OpMode, STR_SIZE};
use crate::error::{CodeplugError, Result};
use serde::{Deserialize, Serialize};

/// Contact record size on disk
pub const CONTACT_SIZE: usize = 39;

const MODE_OFFSET: usize = STR_SIZE;
const INFO_OFFSET: usize = STR_SIZE + 1;

/// DMR call type
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallType {
    /// Talkgroup
    #[default]
    Group = 0,
    Private = 1,
    /// Broadcast call
    All = 2,
}

impl CallType {
    /// Unknown values default to `Group` for forward compatibility.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Private,
            2 => Self::All,
            _ => Self::Group,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DmrContact {
    /// DMR id
    pub id: u32,
    pub call_type: CallType,
    /// Play a tone on incoming calls
    pub rx_tone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct M17Contact {
    /// Base-40 encoded callsign
    pub address: [u8; 6],
}

/// Mode-specific contact payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactInfo {
    #[default]
    None,
    Dmr(DmrContact),
    M17(M17Contact),
}

impl ContactInfo {
    pub fn mode(&self) -> OpMode {
        match self {
            ContactInfo::None => OpMode::None,
            ContactInfo::Dmr(_) => OpMode::Dmr,
            ContactInfo::M17(_) => OpMode::M17,
        }
    }
}

/// Codeplug contact
///
/// Contacts carry no cross-references; channels refer to them by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    /// Display name
    pub name: String,
    pub info: ContactInfo,
}

impl Contact {
    pub fn new(name: impl Into<String>, info: ContactInfo) -> Self {
        Contact {
            name: name.into(),
            info,
        }
    }

    /// Shorthand for a DMR contact
    pub fn dmr(name: impl Into<String>, id: u32, call_type: CallType) -> Self {
        Self::new(
            name,
            ContactInfo::Dmr(DmrContact {
                id,
                call_type,
                rx_tone: false,
            }),
        )
    }

    pub fn to_bytes(&self) -> Result<[u8; CONTACT_SIZE]> {
        let mut bytes = [0u8; CONTACT_SIZE];
        bytes[..STR_SIZE].copy_from_slice(&encode_fixed_str("contact name", &self.name)?);
        bytes[MODE_OFFSET] = self.info.mode() as u8;

        let info = &mut bytes[INFO_OFFSET..];
        match &self.info {
            ContactInfo::None => {}
            ContactInfo::Dmr(dmr) => {
                info[0..4].copy_from_slice(&dmr.id.to_le_bytes());
                info[4] = (dmr.call_type as u8 & 0x03) | (dmr.rx_tone as u8) << 2;
            }
            ContactInfo::M17(m17) => info.copy_from_slice(&m17.address),
        }

        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len(bytes, CONTACT_SIZE, "contact")?;

        let name = decode_fixed_str("contact name", &bytes[..STR_SIZE])?;
        let info = &bytes[INFO_OFFSET..CONTACT_SIZE];
        let info = match OpMode::from_u8(bytes[MODE_OFFSET])? {
            OpMode::None => ContactInfo::None,
            OpMode::Dmr => ContactInfo::Dmr(DmrContact {
                id: le_u32(info, 0),
                call_type: CallType::from_u8(info[4] & 0x03),
                rx_tone: info[4] & 0x04 != 0,
            }),
            OpMode::M17 => {
                let mut address = [0u8; 6];
                address.copy_from_slice(info);
                ContactInfo::M17(M17Contact { address })
            }
            // Analog FM has no contacts
            OpMode::Fm => return Err(CodeplugError::InvalidMode(OpMode::Fm as u8)),
        };

        Ok(Contact { name, info })
    }
}
