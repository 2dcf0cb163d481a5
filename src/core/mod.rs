//! Codeplug storage engine
//!
//! - [`error`] - Error types and classification
//! - [`io`] - Byte stores a codeplug can live in
//! - [`shift`] - Chunked in-place relocation used by inserts and deletes
//! - [`header`] - The 88 byte header holding format version and table counts
//! - [`record`] - Contact, channel and bank header codecs
//! - [`layout`] - Offsets of every table, derived from the header
//! - [`codeplug`] - The [`Codeplug`] handle, contacts and channels
//! - `banks` - Banks and bank members
//! - `renumber` - Keeping cross-references valid across edits
//! - [`integrity`] - Consistency checks and JSON snapshots
//! - [`session`] - Shared open/closed codeplug state

mod banks;
pub mod codeplug;
pub mod error;
pub mod header;
pub mod integrity;
pub mod io;
pub mod layout;
pub mod record;
pub(crate) mod renumber;
pub mod session;
pub mod shift;

pub use codeplug::{Codeplug, DEFAULT_PATH};
