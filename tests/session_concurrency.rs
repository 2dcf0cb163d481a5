//! Shared session access from several threads

use rtxc::{CallType, Channel, Codeplug, CodeplugError, CodeplugSession, Contact};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_concurrent_appends() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.rtxc");

    let session = Arc::new(CodeplugSession::new());
    session.create(&path).unwrap();
    session.open(&path).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for i in 0..10u32 {
                    session
                        .with(|cp| {
                            let count = cp.contact_count()?;
                            let contact =
                                Contact::dmr(format!("T{} C{}", t, i), t * 100 + i, CallType::Private);
                            cp.insert_contact(&contact, count)
                        })
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(session.with(|cp| cp.contact_count()).unwrap(), 40);
    session.with(|cp| cp.check_integrity()).unwrap();
    session.close().unwrap();

    let mut cp = Codeplug::open(&path).unwrap();
    assert_eq!(cp.contact_count().unwrap(), 40);
}

#[test]
fn test_readers_see_complete_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("readers.rtxc");

    let session = Arc::new(CodeplugSession::new());
    session.create(&path).unwrap();
    session.open(&path).unwrap();
    session
        .with(|cp| cp.insert_contact(&Contact::dmr("Target", 1, CallType::Group), 0))
        .unwrap();

    let writer = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            for i in 0..20u16 {
                session
                    .with(|cp| {
                        let target = cp.contact_count()? - 1;
                        cp.insert_channel(&Channel::dmr(format!("Ch {}", i), 1, 1, target), 0)
                    })
                    .unwrap();
                session
                    .with(|cp| cp.insert_contact(&Contact::dmr("Filler", 2, CallType::Group), 0))
                    .unwrap();
            }
        })
    };

    let reader = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            for _ in 0..50 {
                session.with(|cp| cp.check_integrity()).unwrap();
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    // Every channel still points at the original contact, now at the end
    session
        .with(|cp| {
            let last = cp.contact_count()? - 1;
            assert_eq!(cp.read_contact(last)?.name, "Target");
            for pos in 0..cp.channel_count()? {
                let channel = cp.read_channel(pos)?;
                let index = channel.info.contact_index().unwrap();
                assert_eq!(cp.read_contact(index)?.name, "Target", "channel {}", pos);
            }
            Ok(())
        })
        .unwrap();
    session.close().unwrap();
}

#[test]
fn test_closed_session_rejects_operations() {
    let session = CodeplugSession::new();
    assert!(matches!(
        session.with(|cp| cp.channel_count()),
        Err(CodeplugError::NotOpen)
    ));
}
