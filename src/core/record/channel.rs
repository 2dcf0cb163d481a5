use super::{decode_fixed_str, encode_fixed_str, ensure_len, le_u16, le_u32, OpMode, STR_SIZE};
use crate::error::{CodeplugError, Result};
use serde::{Deserialize, Serialize};

/// Channel record size on disk
pub const CHANNEL_SIZE: usize = 94;

/// Contact index of a channel whose contact was deleted
pub const NO_CONTACT: u16 = u16::MAX;

// Field offsets within a channel record
const MODE: usize = 0;
const FLAGS: usize = 1;
const POWER: usize = 2;
const RX_FREQ: usize = 6;
const TX_FREQ: usize = 10;
const SCAN_LIST: usize = 14;
const GROUP_LIST: usize = 15;
const NAME: usize = 16;
const DESCR: usize = NAME + STR_SIZE;
const LOCATION: usize = DESCR + STR_SIZE;
const INFO: usize = LOCATION + 9;

/// Byte offset of the contact index within a channel record
///
/// Only DMR and M17 channels carry one.
pub(crate) fn contact_index_field(mode: OpMode) -> Option<usize> {
    match mode {
        OpMode::Dmr => Some(INFO + 2),
        OpMode::M17 => Some(INFO + 3),
        OpMode::None | OpMode::Fm => None,
    }
}

/// Reject values wider than their bit field
fn check_field(field: &'static str, value: u8, max: u8) -> Result<u8> {
    if value > max {
        return Err(CodeplugError::FieldOutOfRange {
            field,
            value: value.into(),
            max: max.into(),
        });
    }
    Ok(value)
}

/// Standard CTCSS tones in tenths of a hertz, indexed by FM tone number
pub const CTCSS_TONES: [u16; 50] = [
    670, 693, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148,
    1188, 1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1598, 1622, 1655, 1679, 1713, 1738,
    1773, 1799, 1835, 1862, 1899, 1928, 1966, 1995, 2035, 2065, 2107, 2181, 2257, 2291, 2336,
    2418, 2503, 2541,
];

/// Tone frequency (tenths of Hz) for an FM tone index
pub fn ctcss_frequency(index: u8) -> Option<u16> {
    CTCSS_TONES.get(index as usize).copied()
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Bandwidth {
    #[default]
    Bw12_5 = 0,
    Bw20 = 1,
    Bw25 = 2,
}

impl Bandwidth {
    /// Unknown values default to 12.5 kHz for forward compatibility.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Bw20,
            2 => Self::Bw25,
            _ => Self::Bw12_5,
        }
    }
}

/// Transmit admission criterion
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Admit {
    /// Always transmit when PTT is pressed
    #[default]
    Always = 0,
    /// Only if the channel is free
    Free = 1,
    /// On matching tone
    Tone = 2,
    /// Only if the color code is not in use
    Color = 3,
}

impl Admit {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x03 {
            1 => Self::Free,
            2 => Self::Tone,
            3 => Self::Color,
            _ => Self::Always,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Squelch {
    #[default]
    Tight = 0,
    Normal = 1,
}

/// Transmitter geolocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat_int: i8,
    pub lat_dec: u16,
    pub lon_int: i16,
    pub lon_dec: u16,
    /// Metres MSL, stored +500
    pub altitude: u16,
}

impl GeoLocation {
    fn encode(&self, out: &mut [u8]) {
        out[0] = self.lat_int as u8;
        out[1..3].copy_from_slice(&self.lat_dec.to_le_bytes());
        out[3..5].copy_from_slice(&self.lon_int.to_le_bytes());
        out[5..7].copy_from_slice(&self.lon_dec.to_le_bytes());
        out[7..9].copy_from_slice(&self.altitude.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        GeoLocation {
            lat_int: bytes[0] as i8,
            lat_dec: le_u16(bytes, 1),
            lon_int: le_u16(bytes, 3) as i16,
            lon_dec: le_u16(bytes, 5),
            altitude: le_u16(bytes, 7),
        }
    }
}

/// Analog FM tone settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FmInfo {
    pub rx_tone_enabled: bool,
    /// Index into [`CTCSS_TONES`]
    pub rx_tone: u8,
    pub tx_tone_enabled: bool,
    pub tx_tone: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DmrInfo {
    pub rx_color_code: u8,
    pub tx_color_code: u8,
    /// Either 1 or 2
    pub timeslot: u8,
    /// Position in the contact table
    pub contact_index: u16,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum M17Mode {
    #[default]
    Voice = 1,
    Data = 2,
    VoiceData = 3,
}

impl M17Mode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            2 => Self::Data,
            3 => Self::VoiceData,
            _ => Self::Voice,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum M17Crypto {
    #[default]
    Plain = 0,
    Scrambler = 1,
    Aes = 2,
}

impl M17Crypto {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Scrambler,
            2 => Self::Aes,
            _ => Self::Plain,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum M17Gps {
    #[default]
    NoGps = 0,
    /// Position sent along with the payload
    Meta = 1,
}

impl M17Gps {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Meta,
            _ => Self::NoGps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct M17Info {
    /// Channel access number, 0-15
    pub rx_can: u8,
    pub tx_can: u8,
    pub mode: M17Mode,
    pub encryption: M17Crypto,
    pub gps: M17Gps,
    /// Position in the contact table
    pub contact_index: u16,
}

/// Mode-specific channel payload, keyed by the channel's mode tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeInfo {
    #[default]
    None,
    Fm(FmInfo),
    Dmr(DmrInfo),
    M17(M17Info),
}

impl ModeInfo {
    pub fn mode(&self) -> OpMode {
        match self {
            ModeInfo::None => OpMode::None,
            ModeInfo::Fm(_) => OpMode::Fm,
            ModeInfo::Dmr(_) => OpMode::Dmr,
            ModeInfo::M17(_) => OpMode::M17,
        }
    }

    /// Contact reference embedded in digital modes
    pub fn contact_index(&self) -> Option<u16> {
        match self {
            ModeInfo::Dmr(dmr) => Some(dmr.contact_index),
            ModeInfo::M17(m17) => Some(m17.contact_index),
            ModeInfo::None | ModeInfo::Fm(_) => None,
        }
    }

    /// Replace the contact reference; no-op for modes without one
    pub fn set_contact_index(&mut self, index: u16) {
        match self {
            ModeInfo::Dmr(dmr) => dmr.contact_index = index,
            ModeInfo::M17(m17) => m17.contact_index = index,
            ModeInfo::None | ModeInfo::Fm(_) => {}
        }
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        match self {
            ModeInfo::None => {}
            ModeInfo::Fm(fm) => {
                out[0] = fm.rx_tone_enabled as u8 | check_field("FM RX tone", fm.rx_tone, 0x7f)? << 1;
                out[1] = fm.tx_tone_enabled as u8 | check_field("FM TX tone", fm.tx_tone, 0x7f)? << 1;
            }
            ModeInfo::Dmr(dmr) => {
                out[0] = check_field("DMR RX color code", dmr.rx_color_code, 0x0f)?
                    | check_field("DMR TX color code", dmr.tx_color_code, 0x0f)? << 4;
                out[1] = dmr.timeslot;
                out[2..4].copy_from_slice(&dmr.contact_index.to_le_bytes());
            }
            ModeInfo::M17(m17) => {
                out[0] = check_field("M17 RX CAN", m17.rx_can, 0x0f)?
                    | check_field("M17 TX CAN", m17.tx_can, 0x0f)? << 4;
                out[1] = m17.mode as u8 | (m17.encryption as u8) << 4;
                out[2] = m17.gps as u8;
                out[3..5].copy_from_slice(&m17.contact_index.to_le_bytes());
            }
        }
        Ok(())
    }

    fn decode(mode: OpMode, bytes: &[u8]) -> Self {
        match mode {
            OpMode::None => ModeInfo::None,
            OpMode::Fm => ModeInfo::Fm(FmInfo {
                rx_tone_enabled: bytes[0] & 0x01 != 0,
                rx_tone: bytes[0] >> 1,
                tx_tone_enabled: bytes[1] & 0x01 != 0,
                tx_tone: bytes[1] >> 1,
            }),
            OpMode::Dmr => ModeInfo::Dmr(DmrInfo {
                rx_color_code: bytes[0] & 0x0f,
                tx_color_code: bytes[0] >> 4,
                timeslot: bytes[1],
                contact_index: le_u16(bytes, 2),
            }),
            OpMode::M17 => ModeInfo::M17(M17Info {
                rx_can: bytes[0] & 0x0f,
                tx_can: bytes[0] >> 4,
                mode: M17Mode::from_u8(bytes[1] & 0x0f),
                encryption: M17Crypto::from_u8(bytes[1] >> 4),
                gps: M17Gps::from_u8(bytes[2]),
                contact_index: le_u16(bytes, 3),
            }),
        }
    }
}

/// Codeplug channel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub bandwidth: Bandwidth,
    /// Receive only, PTT disabled
    pub rx_only: bool,
    pub admit: Admit,
    pub squelch: Squelch,
    pub vox: bool,
    /// Transmit power in mW
    pub power: u32,
    /// RX frequency in Hz
    pub rx_frequency: u32,
    /// TX frequency in Hz
    pub tx_frequency: u32,
    pub scan_list_index: u8,
    pub group_list_index: u8,
    pub name: String,
    pub description: String,
    pub location: GeoLocation,
    pub info: ModeInfo,
}

impl Channel {
    /// Analog FM channel without tones
    pub fn fm(name: impl Into<String>, rx_frequency: u32, tx_frequency: u32) -> Self {
        Channel {
            name: name.into(),
            rx_frequency,
            tx_frequency,
            info: ModeInfo::Fm(FmInfo::default()),
            ..Default::default()
        }
    }

    /// DMR channel on timeslot 1, color code 1
    pub fn dmr(name: impl Into<String>, rx_frequency: u32, tx_frequency: u32, contact_index: u16) -> Self {
        Channel {
            name: name.into(),
            rx_frequency,
            tx_frequency,
            info: ModeInfo::Dmr(DmrInfo {
                rx_color_code: 1,
                tx_color_code: 1,
                timeslot: 1,
                contact_index,
            }),
            ..Default::default()
        }
    }

    pub fn mode(&self) -> OpMode {
        self.info.mode()
    }

    pub fn to_bytes(&self) -> Result<[u8; CHANNEL_SIZE]> {
        let mut bytes = [0u8; CHANNEL_SIZE];

        bytes[MODE] = self.info.mode() as u8;
        bytes[FLAGS] = self.bandwidth as u8
            | (self.rx_only as u8) << 2
            | (self.admit as u8) << 3
            | (self.squelch as u8) << 5
            | (self.vox as u8) << 6;
        bytes[POWER..POWER + 4].copy_from_slice(&self.power.to_le_bytes());
        bytes[RX_FREQ..RX_FREQ + 4].copy_from_slice(&self.rx_frequency.to_le_bytes());
        bytes[TX_FREQ..TX_FREQ + 4].copy_from_slice(&self.tx_frequency.to_le_bytes());
        bytes[SCAN_LIST] = self.scan_list_index;
        bytes[GROUP_LIST] = self.group_list_index;
        bytes[NAME..DESCR].copy_from_slice(&encode_fixed_str("channel name", &self.name)?);
        bytes[DESCR..LOCATION]
            .copy_from_slice(&encode_fixed_str("channel description", &self.description)?);
        self.location.encode(&mut bytes[LOCATION..INFO]);
        self.info.encode(&mut bytes[INFO..])?;

        Ok(bytes)
    }

    /// Decode a channel record
    ///
    /// Decoding normalises what the model cannot represent: flag bit 7,
    /// unknown sub-enumeration values (which become their default) and the
    /// unused tail of the mode payload are not kept. Encoding the result
    /// again writes them as zero or default values. Engine-side reference
    /// fix-ups patch the contact index in place and never rewrite a record
    /// this way.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure_len(bytes, CHANNEL_SIZE, "channel")?;

        let mode = OpMode::from_u8(bytes[MODE])?;
        let flags = bytes[FLAGS];

        Ok(Channel {
            bandwidth: Bandwidth::from_u8(flags & 0x03),
            rx_only: flags & 0x04 != 0,
            admit: Admit::from_u8(flags >> 3),
            squelch: if flags & 0x20 != 0 {
                Squelch::Normal
            } else {
                Squelch::Tight
            },
            vox: flags & 0x40 != 0,
            power: le_u32(bytes, POWER),
            rx_frequency: le_u32(bytes, RX_FREQ),
            tx_frequency: le_u32(bytes, TX_FREQ),
            scan_list_index: bytes[SCAN_LIST],
            group_list_index: bytes[GROUP_LIST],
            name: decode_fixed_str("channel name", &bytes[NAME..DESCR])?,
            description: decode_fixed_str("channel description", &bytes[DESCR..LOCATION])?,
            location: GeoLocation::decode(&bytes[LOCATION..INFO]),
            info: ModeInfo::decode(mode, &bytes[INFO..CHANNEL_SIZE]),
        })
    }
}
