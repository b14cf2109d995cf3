mod common;

use bouncer::flash::{FileFlash, Flash, MemoryFlash};
use bouncer::store::{Fingerprint, Layout, StorageContext, StoreError, UserRecord, key_index, user};

fn fp(s: &str) -> Fingerprint {
    s.parse().unwrap()
}

#[test]
fn test_append_assigns_consecutive_slots() {
    let mut store = common::small_store();
    assert_eq!(key_index::append(&mut store, &fp("01")).unwrap(), 0);
    assert_eq!(key_index::append(&mut store, &fp("02")).unwrap(), 1);
    assert_eq!(key_index::len(&store), 2);
    assert_eq!(key_index::find(&store, &fp("02")).unwrap(), Some(1));
    assert_eq!(key_index::find(&store, &fp("03")).unwrap(), None);
    assert_eq!(key_index::get(&store, 0).unwrap(), fp("01"));
    assert!(matches!(key_index::get(&store, 2), Err(StoreError::NotFound)));
}

#[test]
fn test_full_index_rejects_without_counting() {
    let mut store = common::small_store();
    for uid in ["01", "02", "03"] {
        key_index::append(&mut store, &fp(uid)).unwrap();
    }
    let res = key_index::append(&mut store, &fp("04"));
    assert!(matches!(res, Err(StoreError::StorageFull)));
    assert_eq!(store.config().stored_keys, 3);
    assert_eq!(key_index::find(&store, &fp("04")).unwrap(), None);
}

#[test]
fn test_register_never_duplicates_through_lookup() {
    let mut store = common::small_store();
    let record = UserRecord::default();
    let slot = user::register(&mut store, &fp("aa:bb"), &record).unwrap();
    assert_eq!(key_index::find(&store, &fp("aa:bb")).unwrap(), Some(slot));
    // Same bytes with explicit trailing zeros are the same fingerprint.
    assert_eq!(key_index::find(&store, &fp("aa:bb:00")).unwrap(), Some(slot));
}

#[test]
fn test_interrupted_append_stays_invisible() {
    let mut store = common::small_store();
    key_index::append(&mut store, &fp("01")).unwrap();

    // Key entry lands, configuration commit is rejected.
    store.flash_mut().fail_after(1);
    assert!(matches!(
        key_index::append(&mut store, &fp("02")),
        Err(StoreError::Flash(_))
    ));
    assert_eq!(key_index::len(&store), 1);

    let flash = store.into_flash();
    let mut reopened = StorageContext::open(flash, &common::small_layout()).unwrap();
    assert_eq!(key_index::len(&reopened), 1);
    assert_eq!(key_index::find(&reopened, &fp("02")).unwrap(), None);

    reopened.flash_mut().heal();
    assert_eq!(key_index::append(&mut reopened, &fp("03")).unwrap(), 1);
}

#[test]
fn test_interrupted_registration_leaves_no_user() {
    let mut store = common::small_store();
    let record = UserRecord {
        active: true,
        ..UserRecord::default()
    };
    // User record and key entry land, the count does not.
    store.flash_mut().fail_after(2);
    assert!(user::register(&mut store, &fp("0a"), &record).is_err());
    assert_eq!(store.config().stored_keys, 0);
    assert!(matches!(user::load(&store, 0), Err(StoreError::NotFound)));
}

#[test]
fn test_keys_survive_reopen_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flash.img");
    let size = 4096 * 96;

    {
        let flash = FileFlash::open(&path, size).unwrap();
        let mut store = StorageContext::open(flash, &Layout::for_device(size)).unwrap();
        assert_eq!(store.config().stored_keys, 0);
        key_index::append(&mut store, &fp("de:ad:be:ef")).unwrap();
        key_index::append(&mut store, &fp("ca:fe")).unwrap();
    }

    // Reopen from disk
    let flash = FileFlash::open(&path, size).unwrap();
    assert_eq!(flash.size(), size);
    let store = StorageContext::open(flash, &Layout::for_device(size)).unwrap();
    assert_eq!(key_index::len(&store), 2);
    assert_eq!(key_index::find(&store, &fp("ca:fe")).unwrap(), Some(1));
}

#[test]
fn test_corrupt_key_count_is_rejected() {
    let mut flash = MemoryFlash::new(271);
    flash.write(0, &[9, 0, 0, 0]).unwrap();
    let res = StorageContext::open(flash, &common::small_layout());
    assert!(matches!(res, Err(StoreError::Corrupt(_))));
}

#[test]
fn test_image_size_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flash.img");
    FileFlash::open(&path, 1024).unwrap();
    let res = FileFlash::open(&path, 2048);
    assert!(matches!(
        res,
        Err(bouncer::flash::FlashError::SizeMismatch { actual: 1024, expected: 2048 })
    ));
}
