//! Bank region layout under different edit orders
//!
//! Two banks over five channels, built once channel-first and once with
//! banks created up front and channels pushed in at position 0. Both must
//! converge on the same bytes.

use rtxc::{
    BankHeader, Channel, Codeplug, CodeplugBuilder, Contact, ContactInfo, MemoryStore, Result,
};

const STAMP: u64 = 1_700_000_000;

fn memory() -> Codeplug<MemoryStore> {
    CodeplugBuilder::new()
        .timestamp(STAMP)
        .create_in(MemoryStore::new())
        .unwrap()
}

fn contact(i: u32) -> Contact {
    Contact::new(format!("Test contact {}", i), ContactInfo::None)
}

fn channel(i: u32) -> Channel {
    Channel::dmr(format!("Test channel {}", i), 0, 0, 0)
}

fn complex() -> Result<Codeplug<MemoryStore>> {
    let mut cp = memory();
    cp.insert_contact(&contact(2), 0)?;
    cp.insert_contact(&contact(1), 0)?;
    for i in 0..5u16 {
        cp.insert_channel(&channel(i as u32 + 1), i)?;
    }
    cp.insert_bank_header(&BankHeader::new("Test Bank 2"), 0)?;
    cp.insert_bank_header(&BankHeader::new("Test Bank 1"), 0)?;
    cp.insert_bank_member(0, 0, 0)?;
    cp.insert_bank_member(1, 0, 1)?;
    cp.insert_bank_member(2, 1, 0)?;
    cp.insert_bank_member(3, 1, 1)?;
    cp.insert_bank_member(4, 1, 2)?;
    Ok(cp)
}

fn out_of_order() -> Result<Codeplug<MemoryStore>> {
    let mut cp = memory();
    cp.insert_contact(&contact(1), 0)?;
    cp.insert_contact(&contact(2), 1)?;
    cp.insert_bank_header(&BankHeader::new("Test Bank 1"), 0)?;
    cp.insert_bank_header(&BankHeader::new("Test Bank 2"), 1)?;
    cp.insert_channel(&channel(5), 0)?;
    cp.insert_bank_member(0, 1, 0)?;
    cp.insert_channel(&channel(4), 0)?;
    cp.insert_bank_member(0, 1, 0)?;
    cp.insert_channel(&channel(3), 0)?;
    cp.insert_bank_member(0, 1, 0)?;
    cp.insert_channel(&channel(2), 0)?;
    cp.insert_bank_member(0, 0, 0)?;
    cp.insert_channel(&channel(1), 0)?;
    cp.insert_bank_member(0, 0, 0)?;
    Ok(cp)
}

fn assert_expected_layout(cp: &mut Codeplug<MemoryStore>) -> Result<()> {
    assert_eq!(cp.contact_count()?, 2);
    assert_eq!(cp.channel_count()?, 5);
    assert_eq!(cp.bank_count()?, 2);

    assert_eq!(cp.read_bank_header(0)?.name, "Test Bank 1");
    assert_eq!(cp.read_bank_header(1)?.name, "Test Bank 2");
    assert_eq!(cp.bank_members(0)?, vec![0, 1]);
    assert_eq!(cp.bank_members(1)?, vec![2, 3, 4]);

    for (bank, members) in [(0u16, 2u16), (1, 3)] {
        for pos in 0..members {
            let index = cp.read_bank_member(bank, pos)?;
            let name = cp.read_channel(index as u16)?.name;
            assert_eq!(name, format!("Test channel {}", index + 1));
        }
    }

    // header, 2 contacts, 5 channels, 2 slots, then the two bank blobs
    let expected = 88 + 2 * 39 + 5 * 94 + 2 * 4 + (34 + 2 * 4) + (34 + 3 * 4);
    assert_eq!(cp.store().as_bytes().len(), expected);
    cp.check_integrity()
}

#[test]
fn test_complex_codeplug_creation() -> Result<()> {
    let mut cp = complex()?;
    assert_expected_layout(&mut cp)
}

#[test]
fn test_out_of_order_codeplug_creation() -> Result<()> {
    let mut cp = out_of_order()?;
    assert_expected_layout(&mut cp)
}

#[test]
fn test_edit_orders_converge() -> Result<()> {
    let a = complex()?;
    let b = out_of_order()?;
    assert_eq!(a.store().as_bytes(), b.store().as_bytes());
    Ok(())
}

#[test]
fn test_offset_table_bytes() -> Result<()> {
    let cp = complex()?;
    let bytes = cp.store().as_bytes();
    let table = 88 + 2 * 39 + 5 * 94;

    assert_eq!(&bytes[table..table + 4], &0u32.to_le_bytes());
    assert_eq!(&bytes[table + 4..table + 8], &42u32.to_le_bytes());

    let region = table + 8;
    assert_eq!(&bytes[region..region + 11], b"Test Bank 1");
    assert_eq!(&bytes[region + 32..region + 34], &[2, 0]);
    assert_eq!(&bytes[region + 42..region + 53], b"Test Bank 2");
    Ok(())
}

#[test]
fn test_delete_banks_in_any_order() -> Result<()> {
    let mut cp = complex()?;
    cp.delete_bank_member(1, 1)?;
    assert_eq!(cp.bank_members(1)?, vec![2, 4]);

    cp.delete_bank_header(0)?;
    assert_eq!(cp.bank_count()?, 1);
    assert_eq!(cp.read_bank_header(0)?.name, "Test Bank 2");
    assert_eq!(cp.bank_members(0)?, vec![2, 4]);
    cp.check_integrity()?;

    cp.delete_bank_header(0)?;
    assert_eq!(cp.bank_count()?, 0);
    assert_eq!(cp.store().as_bytes().len(), 88 + 2 * 39 + 5 * 94);
    cp.check_integrity()
}

#[test]
fn test_rename_bank_preserves_members() -> Result<()> {
    let mut cp = complex()?;
    cp.write_bank_header(&BankHeader::new("Renamed"), 1)?;
    assert_eq!(cp.read_bank_header(1)?.name, "Renamed");
    assert_eq!(cp.bank_members(1)?, vec![2, 3, 4]);

    cp.check_integrity()
}
