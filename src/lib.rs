//! # rtxc - Editable Codeplug Storage
//!
//! `rtxc` stores a radio codeplug (contacts, channels and banks of channels)
//! in a single flat file that can be edited in place:
//!
//! - **Positional insert and delete** in every table, with the rest of the
//!   file shifted in fixed-size chunks
//! - **Cross-references kept valid**: channels follow their contact and
//!   banks follow their channels across edits
//! - **Byte-exact layout**, packed little-endian, readable by radios
//! - **Any backing store**: files, RAM buffers, flash partitions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rtxc::{CallType, Channel, Codeplug, Contact, Result};
//!
//! # fn main() -> Result<()> {
//! Codeplug::create("my.rtxc")?;
//! let mut cp = Codeplug::open("my.rtxc")?;
//!
//! cp.insert_contact(&Contact::dmr("TG 222", 222, CallType::Group), 0)?;
//! cp.insert_channel(&Channel::dmr("Repeater", 430_312_500, 435_312_500, 0), 0)?;
//!
//! let channel = cp.read_channel(0)?;
//! assert_eq!(channel.info.contact_index(), Some(0));
//!
//! cp.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Builder
//!
//! ```rust,no_run
//! use rtxc::{CodeplugBuilder, Result};
//!
//! # fn main() -> Result<()> {
//! let mut cp = CodeplugBuilder::new()
//!     .path("/data/club.rtxc")
//!     .author("IU2KWO")
//!     .description("Club repeaters")
//!     .create()?;
//!
//! assert_eq!(cp.contact_count()?, 0);
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{codeplug, error, header, integrity, io, layout, record, renumber, session, shift};

pub use crate::core::{
    codeplug::{Codeplug, DEFAULT_PATH},
    error::{CodeplugError, ErrorKind, Result, Table},
    header::CodeplugHeader,
    integrity::{Bank, CodeplugSnapshot},
    io::{CodeplugFile, MemoryStore, Store},
    record::{
        Admit, BankHeader, Bandwidth, CallType, Channel, Contact, ContactInfo, DmrContact,
        DmrInfo, FmInfo, GeoLocation, M17Contact, M17Crypto, M17Gps, M17Info, M17Mode,
        ModeInfo, OpMode, Squelch, NO_CONTACT,
    },
    session::CodeplugSession,
};

use tracing::info;

/// Builder for customizing codeplug creation
///
/// # Examples
///
/// ```rust,no_run
/// use rtxc::{CodeplugBuilder, MemoryStore};
///
/// let cp = CodeplugBuilder::new()
///     .author("N0CALL")
///     .timestamp(1_700_000_000)
///     .create_in(MemoryStore::new())?;
/// # Ok::<(), rtxc::CodeplugError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeplugBuilder {
    path: Option<String>,
    author: Option<String>,
    description: Option<String>,
    timestamp: Option<u64>,
}

impl CodeplugBuilder {
    /// Create a new CodeplugBuilder with default settings
    pub fn new() -> Self {
        CodeplugBuilder {
            path: None,
            author: None,
            description: None,
            timestamp: None,
        }
    }

    /// Set the file path (defaults to `default.rtxc` in the current directory)
    pub fn path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the author stored in the header
    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the free-text description stored in the header
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the creation time (Unix seconds)
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn header(&self) -> Result<CodeplugHeader> {
        let mut header = CodeplugHeader::new();
        if let Some(author) = &self.author {
            header.author = author.clone();
        }
        if let Some(description) = &self.description {
            header.description = description.clone();
        }
        if let Some(timestamp) = self.timestamp {
            header.timestamp = timestamp;
        }

        // Surface oversized strings before touching any file
        header.to_bytes()?;
        Ok(header)
    }

    /// Create the codeplug file and open it
    pub fn create(self) -> Result<Codeplug<CodeplugFile>> {
        let header = self.header()?;
        let path = self.path.unwrap_or_else(|| DEFAULT_PATH.to_string());

        info!("Building codeplug at '{}' by '{}'", path, header.author);
        Codeplug::create_with(&path, header)?;
        Codeplug::open(&path)
    }

    /// Initialize a codeplug in an arbitrary store
    pub fn create_in<S: Store>(self, store: S) -> Result<Codeplug<S>> {
        Codeplug::init(store, self.header()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() -> Result<()> {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("builder.rtxc");

        let mut cp = CodeplugBuilder::new()
            .path(path.to_str().unwrap())
            .author("IU2KWO")
            .description("Builder codeplug")
            .timestamp(1_600_000_000)
            .create()?;

        let header = cp.header()?;
        assert_eq!(header.author, "IU2KWO");
        assert_eq!(header.description, "Builder codeplug");
        assert_eq!(header.timestamp, 1_600_000_000);
        assert_eq!(cp.path(), path.as_path());

        Ok(())
    }

    #[test]
    fn test_builder_defaults() -> Result<()> {
        let mut cp = CodeplugBuilder::new().create_in(MemoryStore::new())?;
        let header = cp.header()?;
        assert_eq!(header.author, "Codeplug author.");
        assert_eq!(header.description, "Codeplug description.");
        assert!(header.timestamp > 0);
        Ok(())
    }

    #[test]
    fn test_builder_rejects_long_author() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("never.rtxc");

        let result = CodeplugBuilder::new()
            .path(path.to_str().unwrap())
            .author("an author name that is far too long for the field")
            .create();

        assert!(matches!(result, Err(CodeplugError::StringTooLong { .. })));
        assert!(!path.exists());
    }
}
