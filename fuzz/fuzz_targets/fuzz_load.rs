#![no_main]
use libfuzzer_sys::fuzz_target;
use rtxc::{Codeplug, MemoryStore};

// Arbitrary bytes must never panic: load, read and check either succeed or
// return an error.
fuzz_target!(|data: &[u8]| {
    let mut cp = match Codeplug::load(MemoryStore::from_bytes(data.to_vec())) {
        Ok(cp) => cp,
        Err(_) => return,
    };

    let _ = cp.check_integrity();

    let header = match cp.header() {
        Ok(h) => h,
        Err(_) => return,
    };
    for pos in 0..header.contact_count.min(64) {
        let _ = cp.read_contact(pos);
    }
    for pos in 0..header.channel_count.min(64) {
        let _ = cp.read_channel(pos);
    }
    for pos in 0..header.bank_count.min(16) {
        let _ = cp.read_bank_header(pos);
        let _ = cp.bank_members(pos);
    }
});
