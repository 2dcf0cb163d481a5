//! In-place relocation of the store tail
//!
//! Insertions open a gap by pushing everything after the insertion point
//! towards the end of the store; deletions close one by pulling the tail
//! back. Both copy in fixed-size chunks so the store is never loaded whole.

use crate::error::{CodeplugError, Result};
use crate::io::Store;
use tracing::trace;

/// Chunk size used when moving data around
pub const CHUNK_SIZE: usize = 1024;

fn out_of_bounds(offset: u64, len: u64) -> CodeplugError {
    CodeplugError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("shift offset {} beyond end of store ({})", offset, len),
    ))
}

/// Open `amount` free bytes at `offset`
///
/// Chunks are processed from the tail towards `offset`, each read and then
/// written `amount` bytes further on. A chunk's destination only ever covers
/// bytes that were already read, so no second buffer is needed. The contents
/// of the opened gap are unspecified until the caller writes it.
pub fn shift_forward<S: Store + ?Sized>(store: &mut S, offset: u64, amount: u64) -> Result<()> {
    let len = store.len()?;
    if offset > len {
        return Err(out_of_bounds(offset, len));
    }
    if amount == 0 || offset == len {
        return Ok(());
    }

    trace!("Shifting {} bytes at {} forward by {}", len - offset, offset, amount);

    let mut buffer = [0u8; CHUNK_SIZE];
    let mut end = len;
    while end > offset {
        let start = end.saturating_sub(CHUNK_SIZE as u64).max(offset);
        let chunk = &mut buffer[..(end - start) as usize];
        store.read_at(start, chunk)?;
        store.write_at(start + amount, chunk)?;
        end = start;
    }

    Ok(())
}

/// Remove the `amount` bytes at `offset`
///
/// The tail is moved back head first, then the store is truncated.
pub fn shift_backward<S: Store + ?Sized>(store: &mut S, offset: u64, amount: u64) -> Result<()> {
    let len = store.len()?;
    let removed_end = offset
        .checked_add(amount)
        .filter(|&end| end <= len)
        .ok_or_else(|| out_of_bounds(offset.saturating_add(amount), len))?;
    if amount == 0 {
        return Ok(());
    }

    trace!("Shifting {} bytes at {} back by {}", len - removed_end, removed_end, amount);

    let mut buffer = [0u8; CHUNK_SIZE];
    let mut start = removed_end;
    while start < len {
        let end = (start + CHUNK_SIZE as u64).min(len);
        let chunk = &mut buffer[..(end - start) as usize];
        store.read_at(start, chunk)?;
        store.write_at(start - amount, chunk)?;
        start = end;
    }

    store.set_len(len - amount)
}
