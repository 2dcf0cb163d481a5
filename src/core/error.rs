use std::fmt;
use thiserror::Error;

/// Record table addressed by a positional operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Contacts,
    Channels,
    Banks,
    BankMembers,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Contacts => write!(f, "contact"),
            Table::Channels => write!(f, "channel"),
            Table::Banks => write!(f, "bank"),
            Table::BankMembers => write!(f, "bank member"),
        }
    }
}

/// Coarse error classification
///
/// Callers that only care whether a failure was a bad position, a bad file or
/// a failing store can match on this instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Position outside the valid bounds of the addressed table
    Range,
    /// Bad magic, unsupported version, or a record that cannot be encoded or decoded
    Format,
    /// The underlying store could not be read, written or resized
    Io,
    /// Operation not valid in the current open/closed state
    State,
}

#[derive(Error, Debug)]
pub enum CodeplugError {
    #[error("Invalid magic number in header: {0:#018x}")]
    InvalidMagic(u64),

    #[error("Unsupported codeplug version: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("Invalid operating mode tag: {0}")]
    InvalidMode(u8),

    #[error("Invalid {field} string: not valid UTF-8")]
    InvalidString { field: &'static str },

    #[error("String too long for {field}: {len} bytes (max {max})")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} value {value} does not fit its field (max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("{table} position {pos} out of range (limit {limit})")]
    OutOfRange { table: Table, pos: u32, limit: u32 },

    #[error("{0} table is full")]
    TableFull(Table),

    #[error("Corrupted codeplug: {0}")]
    Corrupted(String),

    #[error("No codeplug is open")]
    NotOpen,

    #[error("A codeplug is already open")]
    AlreadyOpen,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CodeplugError {
    pub(crate) fn out_of_range(table: Table, pos: impl Into<u32>, limit: impl Into<u32>) -> Self {
        CodeplugError::OutOfRange {
            table,
            pos: pos.into(),
            limit: limit.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodeplugError::OutOfRange { .. } | CodeplugError::TableFull(_) => ErrorKind::Range,
            CodeplugError::InvalidMagic(_)
            | CodeplugError::UnsupportedVersion { .. }
            | CodeplugError::InvalidMode(_)
            | CodeplugError::InvalidString { .. }
            | CodeplugError::StringTooLong { .. }
            | CodeplugError::FieldOutOfRange { .. }
            | CodeplugError::Corrupted(_)
            | CodeplugError::Serialization(_) => ErrorKind::Format,
            CodeplugError::Io(_) => ErrorKind::Io,
            CodeplugError::NotOpen | CodeplugError::AlreadyOpen => ErrorKind::State,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodeplugError>;
