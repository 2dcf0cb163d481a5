//! Banks (zones) and their member lists
//!
//! Banks are variable length, so they live in a region after the fixed
//! tables and are located through an offset table holding one u32 per bank.
//! Each entry is the distance from the end of the offset table to the bank
//! header. Entries are relative so that growing the fixed tables, or the
//! offset table itself, never invalidates them; only edits inside the bank
//! region need to patch the entries of the banks that follow.

use crate::codeplug::Codeplug;
use crate::error::{CodeplugError, Result, Table};
use crate::header::CodeplugHeader;
use crate::io::Store;
use crate::layout::{bank_region_offset, bank_table_offset, check_insert_pos, check_pos, BANK_SLOT_SIZE};
use crate::record::{le_u32, BankHeader, BANK_HEADER_SIZE, BANK_MEMBER_SIZE};
use crate::shift::{shift_backward, shift_forward};
use tracing::{debug, trace};

impl<S: Store> Codeplug<S> {
    fn read_slot(&mut self, header: &CodeplugHeader, pos: u16) -> Result<u32> {
        let mut raw = [0u8; 4];
        self.store_mut().read_at(bank_table_offset(header, pos), &mut raw)?;
        Ok(le_u32(&raw, 0))
    }

    fn write_slot(&mut self, header: &CodeplugHeader, pos: u16, value: u32) -> Result<()> {
        self.store_mut()
            .write_at(bank_table_offset(header, pos), &value.to_le_bytes())
    }

    /// Add `delta` to the offset entries of banks `from..bank_count`
    fn adjust_slots(&mut self, header: &CodeplugHeader, from: u16, delta: i64) -> Result<()> {
        for pos in from..header.bank_count {
            let old = self.read_slot(header, pos)?;
            let new = u32::try_from(old as i64 + delta).map_err(|_| {
                CodeplugError::Corrupted(format!("bank {} offset {} cannot move by {}", pos, old, delta))
            })?;
            trace!("Bank {} offset {} -> {}", pos, old, new);
            self.write_slot(header, pos, new)?;
        }
        Ok(())
    }

    /// Position of bank `pos` relative to the start of the bank region
    ///
    /// `pos == bank_count` resolves to the end of the last bank, which is
    /// where an appended bank goes.
    pub(crate) fn bank_relative_offset(&mut self, header: &CodeplugHeader, pos: u16) -> Result<u32> {
        if pos < header.bank_count {
            return self.read_slot(header, pos);
        }
        if header.bank_count == 0 {
            return Ok(0);
        }

        let last = header.bank_count - 1;
        let start = self.read_slot(header, last)?;
        let bank = self.read_bank_at(bank_region_offset(header) + start as u64)?;
        start
            .checked_add(bank.blob_size() as u32)
            .ok_or_else(|| CodeplugError::Corrupted(format!("bank {} offset {} overflows", last, start)))
    }

    /// Absolute store offset of the header of bank `pos`
    pub(crate) fn bank_data_offset(&mut self, header: &CodeplugHeader, pos: u16) -> Result<u64> {
        Ok(bank_region_offset(header) + self.bank_relative_offset(header, pos)? as u64)
    }

    fn read_bank_at(&mut self, offset: u64) -> Result<BankHeader> {
        let mut bytes = [0u8; BANK_HEADER_SIZE];
        self.store_mut().read_at(offset, &mut bytes)?;
        BankHeader::from_bytes(&bytes)
    }

    /// Locate an existing bank, returning its offset and header
    fn locate_bank(&mut self, bank: u16) -> Result<(CodeplugHeader, u64, BankHeader)> {
        let header = self.header()?;
        check_pos(Table::Banks, bank, header.bank_count)?;
        let offset = self.bank_data_offset(&header, bank)?;
        let bank_header = self.read_bank_at(offset)?;
        Ok((header, offset, bank_header))
    }

    pub fn read_bank_header(&mut self, pos: u16) -> Result<BankHeader> {
        let (_, _, bank) = self.locate_bank(pos)?;
        Ok(bank)
    }

    /// Rename bank `pos`
    ///
    /// The member count stored on disk is kept; members are only changed
    /// through the member operations.
    pub fn write_bank_header(&mut self, bank: &BankHeader, pos: u16) -> Result<()> {
        let (_, offset, stored) = self.locate_bank(pos)?;
        let updated = BankHeader {
            name: bank.name.clone(),
            member_count: stored.member_count,
        };

        debug!("Writing bank {} '{}'", pos, updated.name);
        self.store_mut().write_at(offset, &updated.to_bytes()?)
    }

    /// Insert an empty bank so that it ends up at `pos`
    pub fn insert_bank_header(&mut self, bank: &BankHeader, pos: u16) -> Result<()> {
        let mut header = self.header()?;
        check_insert_pos(Table::Banks, pos, header.bank_count)?;
        let bytes = BankHeader::new(bank.name.clone()).to_bytes()?;

        debug!("Inserting bank '{}' at {}", bank.name, pos);
        let relative = self.bank_relative_offset(&header, pos)?;

        // New slot: the region moves back by one entry, relative offsets stay valid
        shift_forward(self.store_mut(), bank_table_offset(&header, pos), BANK_SLOT_SIZE)?;
        header.bank_count += 1;
        self.write_slot(&header, pos, relative)?;
        self.adjust_slots(&header, pos + 1, BANK_HEADER_SIZE as i64)?;
        self.write_header(&header)?;

        let offset = bank_region_offset(&header) + relative as u64;
        shift_forward(self.store_mut(), offset, BANK_HEADER_SIZE as u64)?;
        self.store_mut().write_at(offset, &bytes)
    }

    /// Remove bank `pos` together with its member list
    pub fn delete_bank_header(&mut self, pos: u16) -> Result<()> {
        let (mut header, offset, bank) = self.locate_bank(pos)?;

        debug!("Deleting bank {} '{}' ({} members)", pos, bank.name, bank.member_count);
        shift_backward(self.store_mut(), offset, bank.blob_size())?;
        self.adjust_slots(&header, pos + 1, -(bank.blob_size() as i64))?;

        shift_backward(self.store_mut(), bank_table_offset(&header, pos), BANK_SLOT_SIZE)?;
        header.bank_count -= 1;
        self.write_header(&header)
    }

    pub fn bank_member_count(&mut self, bank: u16) -> Result<u16> {
        Ok(self.read_bank_header(bank)?.member_count)
    }

    fn member_offset(bank_offset: u64, pos: u16) -> u64 {
        bank_offset + BANK_HEADER_SIZE as u64 + pos as u64 * BANK_MEMBER_SIZE as u64
    }

    /// Channel index stored at position `pos` of bank `bank`
    pub fn read_bank_member(&mut self, bank: u16, pos: u16) -> Result<u32> {
        let (_, offset, bank_header) = self.locate_bank(bank)?;
        check_pos(Table::BankMembers, pos, bank_header.member_count)?;

        let mut raw = [0u8; 4];
        self.store_mut().read_at(Self::member_offset(offset, pos), &mut raw)?;
        Ok(le_u32(&raw, 0))
    }

    /// Replace the channel at position `pos` of bank `bank`
    pub fn write_bank_member(&mut self, channel: u32, bank: u16, pos: u16) -> Result<()> {
        let (header, offset, bank_header) = self.locate_bank(bank)?;
        check_pos(Table::BankMembers, pos, bank_header.member_count)?;
        check_channel(&header, channel)?;

        debug!("Writing bank {} member {} = channel {}", bank, pos, channel);
        self.store_mut()
            .write_at(Self::member_offset(offset, pos), &channel.to_le_bytes())
    }

    /// Add `channel` to bank `bank` so that it ends up at `pos`
    pub fn insert_bank_member(&mut self, channel: u32, bank: u16, pos: u16) -> Result<()> {
        let (header, offset, mut bank_header) = self.locate_bank(bank)?;
        check_insert_pos(Table::BankMembers, pos, bank_header.member_count)?;
        check_channel(&header, channel)?;

        debug!("Inserting channel {} into bank {} at {}", channel, bank, pos);
        let member = Self::member_offset(offset, pos);
        shift_forward(self.store_mut(), member, BANK_MEMBER_SIZE as u64)?;
        self.store_mut().write_at(member, &channel.to_le_bytes())?;

        bank_header.member_count += 1;
        self.store_mut().write_at(offset, &bank_header.to_bytes()?)?;
        self.adjust_slots(&header, bank + 1, BANK_MEMBER_SIZE as i64)
    }

    /// Remove position `pos` from bank `bank`
    pub fn delete_bank_member(&mut self, bank: u16, pos: u16) -> Result<()> {
        let (header, offset, mut bank_header) = self.locate_bank(bank)?;
        check_pos(Table::BankMembers, pos, bank_header.member_count)?;

        debug!("Deleting member {} of bank {}", pos, bank);
        shift_backward(
            self.store_mut(),
            Self::member_offset(offset, pos),
            BANK_MEMBER_SIZE as u64,
        )?;

        bank_header.member_count -= 1;
        self.store_mut().write_at(offset, &bank_header.to_bytes()?)?;
        self.adjust_slots(&header, bank + 1, -(BANK_MEMBER_SIZE as i64))
    }

    /// All members of bank `bank`, in order
    pub fn bank_members(&mut self, bank: u16) -> Result<Vec<u32>> {
        let (_, offset, bank_header) = self.locate_bank(bank)?;
        let mut raw = vec![0u8; bank_header.member_count as usize * BANK_MEMBER_SIZE];
        self.store_mut()
            .read_at(offset + BANK_HEADER_SIZE as u64, &mut raw)?;
        Ok(raw
            .chunks_exact(BANK_MEMBER_SIZE)
            .map(|chunk| le_u32(chunk, 0))
            .collect())
    }
}

/// Members must name an existing channel
fn check_channel(header: &CodeplugHeader, channel: u32) -> Result<()> {
    if channel >= header.channel_count as u32 {
        return Err(CodeplugError::out_of_range(
            Table::Channels,
            channel,
            header.channel_count,
        ));
    }
    Ok(())
}
