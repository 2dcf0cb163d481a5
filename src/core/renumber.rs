//! Cross-reference maintenance
//!
//! Records refer to each other by position, so a structural edit to one
//! table has to be mirrored in every reference into it: channels hold a
//! contact index and banks hold channel indices.

use crate::codeplug::Codeplug;
use crate::error::Result;
use crate::header::CodeplugHeader;
use crate::io::Store;
use crate::layout::channel_offset;
use crate::record::channel::contact_index_field;
use crate::record::{OpMode, NO_CONTACT};
use tracing::trace;

/// Kind of structural edit being mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edit {
    /// A record was inserted at the position, later records moved up
    Insert,
    /// The record at the position is about to be removed
    Delete,
}

/// New value of a reference after an edit at `pos`, `None` when it dangles
fn renumber(index: u32, pos: u32, edit: Edit) -> Option<u32> {
    match edit {
        Edit::Insert if index >= pos => Some(index + 1),
        Edit::Delete if index == pos => None,
        Edit::Delete if index > pos => Some(index - 1),
        _ => Some(index),
    }
}

impl<S: Store> Codeplug<S> {
    /// Fix up channel contact indices after a contact edit at `pos`
    ///
    /// References to a deleted contact become [`NO_CONTACT`]. Only the two
    /// index bytes of channels whose reference changes are rewritten; the
    /// rest of each record stays byte for byte as it was.
    pub(crate) fn renumber_contact_references(&mut self, pos: u16, edit: Edit) -> Result<()> {
        // The channel table does not move while indices are patched
        let header = self.header()?;
        for channel_pos in 0..header.channel_count {
            let (offset, index) = match self.channel_contact_ref(&header, channel_pos)? {
                Some((_, NO_CONTACT)) | None => continue,
                Some(found) => found,
            };

            let updated = renumber(index as u32, pos as u32, edit)
                .map(|i| i as u16)
                .unwrap_or(NO_CONTACT);
            if updated != index {
                trace!("Channel {} contact {} -> {}", channel_pos, index, updated);
                self.store_mut().write_at(offset, &updated.to_le_bytes())?;
            }
        }
        Ok(())
    }

    /// Store offset and value of the contact index held by a channel
    fn channel_contact_ref(
        &mut self,
        header: &CodeplugHeader,
        pos: u16,
    ) -> Result<Option<(u64, u16)>> {
        let record = channel_offset(header, pos);
        let mut mode = [0u8; 1];
        self.store_mut().read_at(record, &mut mode)?;

        let field = match contact_index_field(OpMode::from_u8(mode[0])?) {
            Some(field) => field,
            None => return Ok(None),
        };
        let offset = record + field as u64;
        let mut index = [0u8; 2];
        self.store_mut().read_at(offset, &mut index)?;
        Ok(Some((offset, u16::from_le_bytes(index))))
    }

    /// Fix up bank members after a channel edit at `pos`
    ///
    /// On delete, members naming the removed channel are dropped from their
    /// bank, which shrinks the bank region.
    pub(crate) fn renumber_channel_references(&mut self, pos: u16, edit: Edit) -> Result<()> {
        for bank in 0..self.bank_count()? {
            let members = self.bank_members(bank)?;

            // Back to front so removals don't move the members still to visit
            for (member_pos, &channel) in members.iter().enumerate().rev() {
                let member_pos = member_pos as u16;
                match renumber(channel, pos as u32, edit) {
                    None => {
                        trace!("Bank {} drops member {} (channel {})", bank, member_pos, channel);
                        self.delete_bank_member(bank, member_pos)?;
                    }
                    Some(updated) if updated != channel => {
                        trace!("Bank {} member {} channel {} -> {}", bank, member_pos, channel, updated);
                        self.write_bank_member(updated, bank, member_pos)?;
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}
