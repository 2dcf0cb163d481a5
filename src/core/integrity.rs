//! Whole-codeplug checks and JSON snapshots
//!
//! Structural edits take several writes and are not atomic, so an
//! interrupted edit can leave a store whose counts, offset table and
//! references disagree. [`Codeplug::check_integrity`] re-derives the layout
//! from scratch and reports the first inconsistency it finds.

use crate::codeplug::Codeplug;
use crate::error::{CodeplugError, Result};
use crate::header::CodeplugHeader;
use crate::io::Store;
use crate::layout::bank_region_offset;
use crate::record::{BankHeader, Channel, Contact, BANK_HEADER_SIZE, NO_CONTACT};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A bank with its member list resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub header: BankHeader,
    /// Channel indices, in order
    pub members: Vec<u32>,
}

/// Decoded copy of a whole codeplug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeplugSnapshot {
    pub header: CodeplugHeader,
    pub contacts: Vec<Contact>,
    pub channels: Vec<Channel>,
    pub banks: Vec<Bank>,
}

impl CodeplugSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn corrupted(what: String, err: CodeplugError) -> CodeplugError {
    CodeplugError::Corrupted(format!("{}: {}", what, err))
}

impl<S: Store> Codeplug<S> {
    /// Verify that the store is a consistent codeplug
    ///
    /// Checks that the store length matches the header counts and bank
    /// sizes, that bank offsets are contiguous, that every record decodes
    /// and that every cross-reference points at an existing record.
    pub fn check_integrity(&mut self) -> Result<()> {
        let result = self.verify_layout();
        match &result {
            Ok(()) => debug!("Integrity check passed"),
            Err(e) => warn!("Integrity check failed: {}", e),
        }
        result
    }

    fn verify_layout(&mut self) -> Result<()> {
        let header = self.header()?;
        let len = self.store_mut().len()?;
        let region = bank_region_offset(&header);
        if len < region {
            return Err(CodeplugError::Corrupted(format!(
                "store is {} bytes but fixed tables end at {}",
                len, region
            )));
        }

        for pos in 0..header.contact_count {
            self.read_contact(pos)
                .map_err(|e| corrupted(format!("contact {}", pos), e))?;
        }

        for pos in 0..header.channel_count {
            let channel = self
                .read_channel(pos)
                .map_err(|e| corrupted(format!("channel {}", pos), e))?;
            if let Some(index) = channel.info.contact_index() {
                if index != NO_CONTACT && index >= header.contact_count {
                    return Err(CodeplugError::Corrupted(format!(
                        "channel {} references contact {} of {}",
                        pos, index, header.contact_count
                    )));
                }
            }
        }

        let mut expected: u64 = 0;
        for pos in 0..header.bank_count {
            let relative = self.bank_relative_offset(&header, pos)? as u64;
            if relative != expected {
                return Err(CodeplugError::Corrupted(format!(
                    "bank {} at offset {}, expected {}",
                    pos, relative, expected
                )));
            }
            if region + expected + BANK_HEADER_SIZE as u64 > len {
                return Err(CodeplugError::Corrupted(format!(
                    "bank {} header past end of store",
                    pos
                )));
            }

            let bank = self
                .read_bank_header(pos)
                .map_err(|e| corrupted(format!("bank {}", pos), e))?;
            expected += bank.blob_size();
            if region + expected > len {
                return Err(CodeplugError::Corrupted(format!(
                    "bank {} members past end of store",
                    pos
                )));
            }

            let members = self.bank_members(pos)?;
            if let Some(bad) = members.iter().find(|&&m| m >= header.channel_count as u32) {
                return Err(CodeplugError::Corrupted(format!(
                    "bank {} references channel {} of {}",
                    pos, bad, header.channel_count
                )));
            }
        }

        if region + expected != len {
            return Err(CodeplugError::Corrupted(format!(
                "store is {} bytes, layout accounts for {}",
                len,
                region + expected
            )));
        }

        Ok(())
    }

    /// Decode the whole codeplug
    pub fn snapshot(&mut self) -> Result<CodeplugSnapshot> {
        let header = self.header()?;

        let contacts = (0..header.contact_count)
            .map(|pos| self.read_contact(pos))
            .collect::<Result<Vec<_>>>()?;
        let channels = (0..header.channel_count)
            .map(|pos| self.read_channel(pos))
            .collect::<Result<Vec<_>>>()?;
        let mut banks = Vec::with_capacity(header.bank_count as usize);
        for pos in 0..header.bank_count {
            banks.push(Bank {
                header: self.read_bank_header(pos)?,
                members: self.bank_members(pos)?,
            });
        }

        Ok(CodeplugSnapshot {
            header,
            contacts,
            channels,
            banks,
        })
    }

    /// Build a codeplug in `store` from a snapshot
    ///
    /// Records are appended through the regular insert operations, so the
    /// result has the same bytes as one edited by hand into that state. The
    /// snapshot's counts are ignored in favour of its record lists.
    pub fn import_snapshot(store: S, snapshot: &CodeplugSnapshot) -> Result<Self> {
        let mut codeplug = Codeplug::init(store, snapshot.header.clone())?;

        for (pos, contact) in snapshot.contacts.iter().enumerate() {
            codeplug.insert_contact(contact, table_pos(pos)?)?;
        }
        for (pos, channel) in snapshot.channels.iter().enumerate() {
            codeplug.insert_channel(channel, table_pos(pos)?)?;
        }
        for (pos, bank) in snapshot.banks.iter().enumerate() {
            let bank_pos = table_pos(pos)?;
            codeplug.insert_bank_header(&bank.header, bank_pos)?;
            for (member_pos, &channel) in bank.members.iter().enumerate() {
                codeplug.insert_bank_member(channel, bank_pos, table_pos(member_pos)?)?;
            }
        }

        debug!(
            "Imported {} contacts, {} channels, {} banks",
            snapshot.contacts.len(),
            snapshot.channels.len(),
            snapshot.banks.len()
        );
        Ok(codeplug)
    }
}

fn table_pos(pos: usize) -> Result<u16> {
    u16::try_from(pos)
        .map_err(|_| CodeplugError::Corrupted(format!("snapshot holds more than {} records", u16::MAX)))
}
