mod common;

use bouncer::flash::MemoryFlash;
use bouncer::store::{EventCode, LogEntry, StorageContext, log};

fn entry(timestamp: u32) -> LogEntry {
    LogEntry {
        timestamp,
        fingerprint: "01".parse().unwrap(),
        event: EventCode::AccessGranted,
    }
}

#[test]
fn test_ring_keeps_newest_capacity_entries() {
    let mut store = common::small_store();
    let capacity = store.geometry().log.capacity();
    assert_eq!(capacity, 4);

    for i in 0..6 {
        let position = log::append(&mut store, &entry(1000 + i)).unwrap();
        assert_eq!(position, i as usize % capacity);
    }
    assert_eq!(store.config().log_entries, 6);
    assert_eq!(log::len(&store), 4);

    let kept: Vec<u32> = log::entries(&store)
        .unwrap()
        .iter()
        .map(|e| e.timestamp)
        .collect();
    assert_eq!(kept, vec![1002, 1003, 1004, 1005]);
}

#[test]
fn test_render_is_newest_first() {
    let mut store = common::small_store();
    for i in 0..3 {
        log::append(&mut store, &entry(1000 + i)).unwrap();
    }
    let text = log::render_recent(&store, 621).unwrap();
    assert_eq!(text, "1002;01;1\n1001;01;1\n1000;01;1\n");
}

#[test]
fn test_render_after_wrap_has_no_duplicates() {
    let mut store = common::small_store();
    for i in 0..9 {
        log::append(&mut store, &entry(1000 + i)).unwrap();
    }
    let text = log::render_recent(&store, 621).unwrap();
    assert_eq!(text, "1008;01;1\n1007;01;1\n1006;01;1\n1005;01;1\n");
}

#[test]
fn test_render_cuts_at_whole_lines() {
    let mut store = common::small_store();
    for i in 0..4 {
        log::append(&mut store, &entry(1000 + i)).unwrap();
    }
    // Each line is 10 bytes; 25 bytes fit two.
    let text = log::render_recent(&store, 25).unwrap();
    assert_eq!(text, "1003;01;1\n1002;01;1\n");
    // The output stays strictly below the budget.
    assert_eq!(log::render_recent(&store, 20).unwrap(), "1003;01;1\n");
    assert_eq!(log::render_recent(&store, 10).unwrap(), "");
}

#[test]
fn test_empty_log_renders_nothing() {
    let store = common::small_store();
    assert_eq!(log::render_recent(&store, 621).unwrap(), "");
    assert!(log::entries(&store).unwrap().is_empty());
}

#[test]
fn test_counter_survives_reopen() {
    let mut store = common::small_store();
    for i in 0..5 {
        log::append(&mut store, &entry(i)).unwrap();
    }
    let flash: MemoryFlash = store.into_flash();
    let mut store = StorageContext::open(flash, &common::small_layout()).unwrap();
    assert_eq!(store.config().log_entries, 5);
    assert_eq!(log::append(&mut store, &entry(5)).unwrap(), 1);
}

#[test]
fn test_failed_append_does_not_advance() {
    let mut store = common::small_store();
    log::append(&mut store, &entry(1)).unwrap();
    store.flash_mut().fail_after(0);
    assert!(log::append(&mut store, &entry(2)).is_err());
    assert_eq!(store.config().log_entries, 1);
}

#[test]
fn test_reset_forgets_keys_and_log() {
    let mut store = common::small_store();
    for uid in ["01", "02", "03"] {
        bouncer::store::key_index::append(&mut store, &uid.parse().unwrap()).unwrap();
    }
    for i in 0..5 {
        log::append(&mut store, &entry(i)).unwrap();
    }
    store.reset().unwrap();
    assert_eq!(store.config().stored_keys, 0);
    assert_eq!(store.config().log_entries, 0);
    assert_eq!(log::render_recent(&store, 621).unwrap(), "");
    assert_eq!(bouncer::store::key_index::find(&store, &"01".parse().unwrap()).unwrap(), None);
}
