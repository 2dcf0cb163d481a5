//! Byte offsets of every table in a codeplug
//!
//! ```text
//! ┌──────────────────────────────┐ 0
//! │ Header (88 B)                │
//! ├──────────────────────────────┤ CONTACTS_START
//! │ Contacts  (count × 39 B)     │
//! ├──────────────────────────────┤
//! │ Channels  (count × 94 B)     │
//! ├──────────────────────────────┤
//! │ Bank offsets (count × u32)   │
//! ├──────────────────────────────┤ bank_region_offset
//! │ Bank 0 header + members      │
//! │ Bank 1 header + members      │
//! │ ...                          │
//! └──────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of the header, so it can be tested
//! without a store.

use crate::error::{CodeplugError, Result, Table};
use crate::header::{CodeplugHeader, HEADER_SIZE};
use crate::record::{CHANNEL_SIZE, CONTACT_SIZE};

/// Size of one bank offset table entry
pub const BANK_SLOT_SIZE: u64 = 4;

/// Start of the contact table
pub const CONTACTS_START: u64 = HEADER_SIZE as u64;

pub fn contact_offset(_header: &CodeplugHeader, pos: u16) -> u64 {
    CONTACTS_START + pos as u64 * CONTACT_SIZE as u64
}

pub fn channel_offset(header: &CodeplugHeader, pos: u16) -> u64 {
    contact_offset(header, header.contact_count) + pos as u64 * CHANNEL_SIZE as u64
}

pub fn bank_table_offset(header: &CodeplugHeader, pos: u16) -> u64 {
    channel_offset(header, header.channel_count) + pos as u64 * BANK_SLOT_SIZE
}

/// Start of the bank data region, where offset table entries are measured from
pub fn bank_region_offset(header: &CodeplugHeader) -> u64 {
    bank_table_offset(header, header.bank_count)
}

/// Validate a position for read, write or delete (`pos < limit`)
pub fn check_pos(table: Table, pos: u16, limit: u16) -> Result<()> {
    if pos >= limit {
        return Err(CodeplugError::out_of_range(table, pos, limit));
    }
    Ok(())
}

/// Validate a position for insert (`pos <= limit`, table not full)
pub fn check_insert_pos(table: Table, pos: u16, limit: u16) -> Result<()> {
    if pos > limit {
        return Err(CodeplugError::out_of_range(table, pos, limit));
    }
    if limit == u16::MAX {
        return Err(CodeplugError::TableFull(table));
    }
    Ok(())
}
