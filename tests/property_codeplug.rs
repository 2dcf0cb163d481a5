//! Property-based tests for codeplug edits
//!
//! Random sequences of inserts and deletes are applied both to a codeplug
//! and to a plain in-memory model where references are held by name. After
//! every step the codeplug must pass its integrity check, and at the end
//! its decoded contents must match the model.

use proptest::prelude::*;
use rtxc::{
    BankHeader, CallType, Channel, Codeplug, CodeplugBuilder, CodeplugSnapshot, Contact,
    MemoryStore, NO_CONTACT,
};

#[derive(Debug, Clone)]
enum Op {
    InsertContact(u16),
    DeleteContact(u16),
    InsertChannel { pos: u16, contact: Option<u16> },
    DeleteChannel(u16),
    InsertBank(u16),
    DeleteBank(u16),
    InsertMember { bank: u16, pos: u16, channel: u16 },
    DeleteMember { bank: u16, pos: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u16>().prop_map(Op::InsertContact),
        1 => any::<u16>().prop_map(Op::DeleteContact),
        3 => (any::<u16>(), proptest::option::of(any::<u16>()))
            .prop_map(|(pos, contact)| Op::InsertChannel { pos, contact }),
        1 => any::<u16>().prop_map(Op::DeleteChannel),
        2 => any::<u16>().prop_map(Op::InsertBank),
        1 => any::<u16>().prop_map(Op::DeleteBank),
        3 => (any::<u16>(), any::<u16>(), any::<u16>())
            .prop_map(|(bank, pos, channel)| Op::InsertMember { bank, pos, channel }),
        1 => (any::<u16>(), any::<u16>()).prop_map(|(bank, pos)| Op::DeleteMember { bank, pos }),
    ]
}

/// Channel in the model: a name plus the name of the contact it calls
#[derive(Debug, Clone)]
struct ModelChannel {
    name: String,
    contact: Option<Option<String>>,
}

#[derive(Debug, Default)]
struct Model {
    contacts: Vec<String>,
    channels: Vec<ModelChannel>,
    banks: Vec<(String, Vec<String>)>,
    next_id: u32,
}

impl Model {
    fn fresh_name(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{} {}", prefix, self.next_id)
    }

    /// Apply `op` to both the model and the codeplug
    fn apply(&mut self, cp: &mut Codeplug<MemoryStore>, op: &Op) {
        match *op {
            Op::InsertContact(seed) => {
                let pos = seed % (self.contacts.len() as u16 + 1);
                let name = self.fresh_name("ct");
                cp.insert_contact(&Contact::dmr(name.clone(), self.next_id, CallType::Group), pos)
                    .unwrap();
                self.contacts.insert(pos as usize, name);
            }
            Op::DeleteContact(seed) => {
                if self.contacts.is_empty() {
                    return;
                }
                let pos = seed % self.contacts.len() as u16;
                cp.delete_contact(pos).unwrap();
                let gone = self.contacts.remove(pos as usize);
                for channel in &mut self.channels {
                    if channel.contact == Some(Some(gone.clone())) {
                        channel.contact = Some(None);
                    }
                }
            }
            Op::InsertChannel { pos, contact } => {
                let pos = pos % (self.channels.len() as u16 + 1);
                let name = self.fresh_name("ch");
                let (channel, model) = match contact {
                    Some(seed) if !self.contacts.is_empty() => {
                        let index = seed % self.contacts.len() as u16;
                        (
                            Channel::dmr(name.clone(), 1, 1, index),
                            Some(Some(self.contacts[index as usize].clone())),
                        )
                    }
                    _ => (Channel::fm(name.clone(), 1, 1), None),
                };
                cp.insert_channel(&channel, pos).unwrap();
                self.channels.insert(pos as usize, ModelChannel { name, contact: model });
            }
            Op::DeleteChannel(seed) => {
                if self.channels.is_empty() {
                    return;
                }
                let pos = seed % self.channels.len() as u16;
                cp.delete_channel(pos).unwrap();
                let gone = self.channels.remove(pos as usize).name;
                for (_, members) in &mut self.banks {
                    members.retain(|m| *m != gone);
                }
            }
            Op::InsertBank(seed) => {
                let pos = seed % (self.banks.len() as u16 + 1);
                let name = self.fresh_name("bank");
                cp.insert_bank_header(&BankHeader::new(name.clone()), pos).unwrap();
                self.banks.insert(pos as usize, (name, Vec::new()));
            }
            Op::DeleteBank(seed) => {
                if self.banks.is_empty() {
                    return;
                }
                let pos = seed % self.banks.len() as u16;
                cp.delete_bank_header(pos).unwrap();
                self.banks.remove(pos as usize);
            }
            Op::InsertMember { bank, pos, channel } => {
                if self.banks.is_empty() || self.channels.is_empty() {
                    return;
                }
                let bank = bank % self.banks.len() as u16;
                let channel = channel % self.channels.len() as u16;
                let members = &mut self.banks[bank as usize].1;
                let pos = pos % (members.len() as u16 + 1);
                cp.insert_bank_member(channel as u32, bank, pos).unwrap();
                members.insert(pos as usize, self.channels[channel as usize].name.clone());
            }
            Op::DeleteMember { bank, pos } => {
                if self.banks.is_empty() {
                    return;
                }
                let bank = bank % self.banks.len() as u16;
                let members = &mut self.banks[bank as usize].1;
                if members.is_empty() {
                    return;
                }
                let pos = pos % members.len() as u16;
                cp.delete_bank_member(bank, pos).unwrap();
                members.remove(pos as usize);
            }
        }
    }

    fn assert_matches(&self, snapshot: &CodeplugSnapshot) {
        let contacts: Vec<&str> = snapshot.contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(contacts, self.contacts);

        assert_eq!(snapshot.channels.len(), self.channels.len());
        for (stored, model) in snapshot.channels.iter().zip(&self.channels) {
            assert_eq!(stored.name, model.name);
            let resolved = stored.info.contact_index().map(|index| {
                if index == NO_CONTACT {
                    None
                } else {
                    Some(snapshot.contacts[index as usize].name.clone())
                }
            });
            assert_eq!(resolved, model.contact, "channel {}", model.name);
        }

        assert_eq!(snapshot.banks.len(), self.banks.len());
        for (stored, (name, members)) in snapshot.banks.iter().zip(&self.banks) {
            assert_eq!(&stored.header.name, name);
            assert_eq!(stored.header.member_count as usize, members.len());
            let resolved: Vec<&str> = stored
                .members
                .iter()
                .map(|&m| snapshot.channels[m as usize].name.as_str())
                .collect();
            assert_eq!(&resolved, members, "bank {}", name);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_edits_preserve_integrity(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut cp = CodeplugBuilder::new().create_in(MemoryStore::new()).unwrap();
        let mut model = Model::default();

        for op in &ops {
            model.apply(&mut cp, op);
            prop_assert!(cp.check_integrity().is_ok(), "integrity lost after {:?}", op);
        }

        let snapshot = cp.snapshot().unwrap();
        model.assert_matches(&snapshot);
    }

    #[test]
    fn prop_snapshot_import_is_byte_exact(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let mut cp = CodeplugBuilder::new().create_in(MemoryStore::new()).unwrap();
        let mut model = Model::default();
        for op in &ops {
            model.apply(&mut cp, op);
        }

        let snapshot = cp.snapshot().unwrap();
        let copy = Codeplug::import_snapshot(MemoryStore::new(), &snapshot).unwrap();
        prop_assert_eq!(copy.store().as_bytes(), cp.store().as_bytes());
    }

    #[test]
    fn prop_insert_delete_symmetry(
        ops in prop::collection::vec(op_strategy(), 0..20),
        seed in any::<u16>(),
    ) {
        let mut cp = CodeplugBuilder::new().create_in(MemoryStore::new()).unwrap();
        let mut model = Model::default();
        for op in &ops {
            model.apply(&mut cp, op);
        }
        let before = cp.store().as_bytes().to_vec();

        let pos = seed % (model.contacts.len() as u16 + 1);
        cp.insert_contact(&Contact::dmr("Temporary", 1, CallType::Group), pos).unwrap();
        cp.delete_contact(pos).unwrap();
        prop_assert_eq!(cp.store().as_bytes(), &before[..]);

        let pos = seed % (model.channels.len() as u16 + 1);
        cp.insert_channel(&Channel::fm("Temporary", 1, 1), pos).unwrap();
        cp.delete_channel(pos).unwrap();
        prop_assert_eq!(cp.store().as_bytes(), &before[..]);
    }
}
