//! Codeplug handle and the contact/channel tables
//!
//! A [`Codeplug`] owns its store and nothing else: no counts or offsets are
//! cached between calls. Every operation re-reads the header, derives the
//! offsets it needs from it and touches only the bytes involved.

use crate::error::{CodeplugError, Result, Table};
use crate::header::{CodeplugHeader, HEADER_SIZE};
use crate::io::{CodeplugFile, Store};
use crate::layout::{channel_offset, check_insert_pos, check_pos, contact_offset};
use crate::record::{Channel, Contact, CHANNEL_SIZE, CONTACT_SIZE, NO_CONTACT};
use crate::renumber::Edit;
use crate::shift::{shift_backward, shift_forward};
use std::path::Path;
use tracing::{debug, info};

/// File name used by [`Codeplug::create_default`] and [`Codeplug::open_default`]
pub const DEFAULT_PATH: &str = "default.rtxc";

/// An open codeplug
#[derive(Debug)]
pub struct Codeplug<S: Store = CodeplugFile> {
    store: S,
}

impl Codeplug<CodeplugFile> {
    /// Create (or truncate) a codeplug file holding an empty codeplug
    ///
    /// The file is closed again afterwards; use [`Codeplug::open`] to edit it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::create_with(path, CodeplugHeader::new())
    }

    /// Create `default.rtxc` in the working directory
    pub fn create_default() -> Result<()> {
        Self::create(DEFAULT_PATH)
    }

    pub(crate) fn create_with<P: AsRef<Path>>(path: P, header: CodeplugHeader) -> Result<()> {
        info!("Creating codeplug at {}", path.as_ref().display());
        let file = CodeplugFile::create(&path)?;
        Codeplug::init(file, header)?.close()
    }

    /// Open an existing codeplug file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening codeplug at {}", path.as_ref().display());
        Codeplug::load(CodeplugFile::open(path)?)
    }

    /// Open `default.rtxc` in the working directory
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_PATH)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

impl<S: Store> Codeplug<S> {
    /// Write an empty codeplug into `store`, discarding its contents
    ///
    /// Counts in `header` are ignored: a fresh codeplug holds no records.
    pub fn init(mut store: S, mut header: CodeplugHeader) -> Result<Self> {
        header.contact_count = 0;
        header.channel_count = 0;
        header.bank_count = 0;
        header.validate()?;
        let bytes = header.to_bytes()?;

        store.set_len(0)?;
        store.write_at(0, &bytes)?;
        store.flush()?;

        debug!("Initialized codeplug '{}'", header.description);
        Ok(Codeplug { store })
    }

    /// Take over a store that already holds a codeplug
    ///
    /// Fails with a format error if the header magic or version is wrong.
    pub fn load(mut store: S) -> Result<Self> {
        let header = read_header(&mut store)?;
        debug!(
            "Loaded codeplug v{}.{}: {} contacts, {} channels, {} banks",
            header.version_major,
            header.version_minor,
            header.contact_count,
            header.channel_count,
            header.bank_count
        );
        Ok(Codeplug { store })
    }

    /// Flush and release the store
    pub fn close(mut self) -> Result<()> {
        self.store.flush()?;
        info!("Closed codeplug");
        Ok(())
    }

    /// Release the store without flushing
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Re-read the header from the store
    pub fn header(&mut self) -> Result<CodeplugHeader> {
        read_header(&mut self.store)
    }

    pub(crate) fn write_header(&mut self, header: &CodeplugHeader) -> Result<()> {
        self.store.write_at(0, &header.to_bytes()?)
    }

    /// Replace author and description, keeping counts and timestamp
    pub fn set_metadata(&mut self, author: &str, description: &str) -> Result<()> {
        let mut header = self.header()?;
        header.author = author.to_string();
        header.description = description.to_string();
        self.write_header(&header)
    }

    pub fn contact_count(&mut self) -> Result<u16> {
        Ok(self.header()?.contact_count)
    }

    pub fn channel_count(&mut self) -> Result<u16> {
        Ok(self.header()?.channel_count)
    }

    pub fn bank_count(&mut self) -> Result<u16> {
        Ok(self.header()?.bank_count)
    }

    // Contacts

    pub fn read_contact(&mut self, pos: u16) -> Result<Contact> {
        let header = self.header()?;
        check_pos(Table::Contacts, pos, header.contact_count)?;

        let mut bytes = [0u8; CONTACT_SIZE];
        self.store.read_at(contact_offset(&header, pos), &mut bytes)?;
        Contact::from_bytes(&bytes)
    }

    /// Overwrite the contact at `pos`
    pub fn write_contact(&mut self, contact: &Contact, pos: u16) -> Result<()> {
        let header = self.header()?;
        check_pos(Table::Contacts, pos, header.contact_count)?;
        let bytes = contact.to_bytes()?;

        debug!("Writing contact {} '{}'", pos, contact.name);
        self.store.write_at(contact_offset(&header, pos), &bytes)
    }

    /// Insert a contact so that it ends up at `pos`
    ///
    /// Contacts at `pos` and after move up by one, and channel references
    /// to them follow.
    pub fn insert_contact(&mut self, contact: &Contact, pos: u16) -> Result<()> {
        let mut header = self.header()?;
        check_insert_pos(Table::Contacts, pos, header.contact_count)?;
        let bytes = contact.to_bytes()?;

        debug!("Inserting contact '{}' at {}", contact.name, pos);
        let offset = contact_offset(&header, pos);
        shift_forward(&mut self.store, offset, CONTACT_SIZE as u64)?;
        self.store.write_at(offset, &bytes)?;

        header.contact_count += 1;
        self.write_header(&header)?;

        self.renumber_contact_references(pos, Edit::Insert)
    }

    /// Remove the contact at `pos`
    ///
    /// Channels referencing it are left pointing at [`crate::record::NO_CONTACT`].
    pub fn delete_contact(&mut self, pos: u16) -> Result<()> {
        let mut header = self.header()?;
        check_pos(Table::Contacts, pos, header.contact_count)?;

        debug!("Deleting contact {}", pos);
        self.renumber_contact_references(pos, Edit::Delete)?;

        shift_backward(&mut self.store, contact_offset(&header, pos), CONTACT_SIZE as u64)?;

        header.contact_count -= 1;
        self.write_header(&header)
    }

    // Channels

    pub fn read_channel(&mut self, pos: u16) -> Result<Channel> {
        let header = self.header()?;
        check_pos(Table::Channels, pos, header.channel_count)?;

        let mut bytes = [0u8; CHANNEL_SIZE];
        self.store.read_at(channel_offset(&header, pos), &mut bytes)?;
        Channel::from_bytes(&bytes)
    }

    /// Overwrite the channel at `pos`
    ///
    /// A DMR or M17 channel must reference an existing contact or
    /// [`NO_CONTACT`].
    pub fn write_channel(&mut self, channel: &Channel, pos: u16) -> Result<()> {
        let header = self.header()?;
        check_pos(Table::Channels, pos, header.channel_count)?;
        check_contact_ref(&header, channel)?;
        let bytes = channel.to_bytes()?;

        debug!("Writing channel {} '{}'", pos, channel.name);
        self.store.write_at(channel_offset(&header, pos), &bytes)
    }

    /// Insert a channel so that it ends up at `pos`
    ///
    /// Bank members referring to channels at `pos` and after follow the move.
    pub fn insert_channel(&mut self, channel: &Channel, pos: u16) -> Result<()> {
        let mut header = self.header()?;
        check_insert_pos(Table::Channels, pos, header.channel_count)?;
        check_contact_ref(&header, channel)?;
        let bytes = channel.to_bytes()?;

        debug!("Inserting channel '{}' at {}", channel.name, pos);
        let offset = channel_offset(&header, pos);
        shift_forward(&mut self.store, offset, CHANNEL_SIZE as u64)?;
        self.store.write_at(offset, &bytes)?;

        header.channel_count += 1;
        self.write_header(&header)?;

        self.renumber_channel_references(pos, Edit::Insert)
    }

    /// Remove the channel at `pos`, dropping it from every bank
    pub fn delete_channel(&mut self, pos: u16) -> Result<()> {
        check_pos(Table::Channels, pos, self.channel_count()?)?;

        debug!("Deleting channel {}", pos);
        self.renumber_channel_references(pos, Edit::Delete)?;

        // Member removal moved the bank region, re-read before shifting
        let mut header = self.header()?;
        shift_backward(&mut self.store, channel_offset(&header, pos), CHANNEL_SIZE as u64)?;

        header.channel_count -= 1;
        self.write_header(&header)
    }
}

fn check_contact_ref(header: &CodeplugHeader, channel: &Channel) -> Result<()> {
    match channel.info.contact_index() {
        Some(index) if index != NO_CONTACT && index >= header.contact_count => Err(
            CodeplugError::out_of_range(Table::Contacts, index, header.contact_count),
        ),
        _ => Ok(()),
    }
}

fn read_header<S: Store + ?Sized>(store: &mut S) -> Result<CodeplugHeader> {
    let mut bytes = [0u8; HEADER_SIZE];
    store.read_at(0, &mut bytes)?;
    CodeplugHeader::from_bytes(&bytes)
}
