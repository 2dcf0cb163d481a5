#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rtxc::{BankHeader, CallType, Channel, CodeplugBuilder, Contact, MemoryStore, NO_CONTACT};

#[derive(Arbitrary, Debug)]
enum Edit {
    InsertContact(u16),
    DeleteContact(u16),
    InsertChannel(u16, Option<u16>),
    DeleteChannel(u16),
    InsertBank(u16),
    DeleteBank(u16),
    InsertMember(u32, u16, u16),
    DeleteMember(u16, u16),
}

// Any sequence of edits, valid or not, leaves a consistent codeplug:
// rejected edits must not have touched the store
fuzz_target!(|edits: Vec<Edit>| {
    let mut cp = match CodeplugBuilder::new().create_in(MemoryStore::new()) {
        Ok(cp) => cp,
        Err(_) => return,
    };

    for edit in edits.iter().take(64) {
        let _ = match *edit {
            Edit::InsertContact(pos) => {
                cp.insert_contact(&Contact::dmr("Fuzz", 1, CallType::Group), pos % 8)
            }
            Edit::DeleteContact(pos) => cp.delete_contact(pos % 8),
            Edit::InsertChannel(pos, Some(contact)) => {
                let contacts = cp.contact_count().unwrap_or(0);
                let index = if contacts == 0 { NO_CONTACT } else { contact % contacts };
                cp.insert_channel(&Channel::dmr("Fuzz", 1, 1, index), pos % 8)
            }
            Edit::InsertChannel(pos, None) => cp.insert_channel(&Channel::fm("Fuzz", 1, 1), pos % 8),
            Edit::DeleteChannel(pos) => cp.delete_channel(pos % 8),
            Edit::InsertBank(pos) => cp.insert_bank_header(&BankHeader::new("Fuzz"), pos % 4),
            Edit::DeleteBank(pos) => cp.delete_bank_header(pos % 4),
            Edit::InsertMember(channel, bank, pos) => {
                cp.insert_bank_member(channel % 8, bank % 4, pos % 8)
            }
            Edit::DeleteMember(bank, pos) => cp.delete_bank_member(bank % 4, pos % 8),
        };
    }

    cp.check_integrity().expect("edits left an inconsistent codeplug");
});
