#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bouncer::clock::FixedClock;
use bouncer::device::{Device, DeviceOptions, Publication, Relay, Reporter};
use bouncer::flash::MemoryFlash;
use bouncer::store::{Layout, StorageContext};
use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 3 keys, 4 log entries, 3 user records.
pub fn small_layout() -> Layout {
    Layout {
        config_begin: 0,
        keys_begin: 4,
        log_begin: 34,
        users_begin: 106,
        end: 271,
    }
}

pub fn small_store() -> StorageContext<MemoryFlash> {
    StorageContext::open(MemoryFlash::new(271), &small_layout()).unwrap()
}

/// Monday 2024-01-01 10:00 UTC, i.e. grid day 0 hour 12.
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Publication>>>);

impl Recorder {
    pub fn take(&self) -> Vec<Publication> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl Reporter for Recorder {
    fn publish(&mut self, publication: &Publication) {
        self.0.lock().unwrap().push(publication.clone());
    }
}

#[derive(Clone, Default)]
pub struct Probe(Arc<Mutex<Vec<bool>>>);

impl Probe {
    pub fn states(&self) -> Vec<bool> {
        self.0.lock().unwrap().clone()
    }
}

impl Relay for Probe {
    fn set(&mut self, energised: bool) {
        self.0.lock().unwrap().push(energised);
    }
}

pub struct Harness {
    pub device: Device<MemoryFlash>,
    pub published: Recorder,
    pub relay: Probe,
    pub clock: FixedClock,
}

pub fn harness() -> Harness {
    harness_with(
        small_store(),
        DeviceOptions {
            open_for: Duration::from_millis(2000),
            scan_interval: Duration::from_millis(250),
        },
    )
}

pub fn harness_with(store: StorageContext<MemoryFlash>, options: DeviceOptions) -> Harness {
    let published = Recorder::default();
    let relay = Probe::default();
    let clock = FixedClock::new(monday_morning());
    let device = Device::new(
        store,
        Box::new(published.clone()),
        Box::new(relay.clone()),
        Box::new(clock.clone()),
        options,
    )
    .with_rng(StdRng::seed_from_u64(7));
    Harness {
        device,
        published,
        relay,
        clock,
    }
}
