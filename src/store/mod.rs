//! Fixed-region access store.
//!
//! Four disjoint byte regions of one flash device: a configuration record, the
//! append-only key index, the audit ring log and one user record per key slot.
//! Every component takes the [`StorageContext`] that owns the region geometry
//! and the cached configuration counters.

pub mod config;
pub mod context;
pub mod fingerprint;
pub mod key_index;
pub mod layout;
pub mod log;
pub mod user;

pub use config::ConfigRecord;
pub use context::StorageContext;
pub use fingerprint::Fingerprint;
pub use layout::{Geometry, Layout, Region, RegionKind};
pub use log::{EventCode, LogEntry};
pub use user::UserRecord;

/// Stable position of a fingerprint in the key index.
pub type Slot = u16;

/// Seconds since the Unix epoch, as stored on flash.
pub type Timestamp = u32;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Flash: {0}")]
    Flash(#[from] crate::flash::FlashError),
    #[error("Layout: {0}")]
    Layout(String),
    #[error("{region} index {index} out of range (capacity {capacity})")]
    OutOfRange {
        region: RegionKind,
        index: usize,
        capacity: usize,
    },
    #[error("{region} record must be {expected} bytes, got {actual}")]
    RecordSize {
        region: RegionKind,
        expected: usize,
        actual: usize,
    },
    #[error("Storage full")]
    StorageFull,
    #[error("Not found")]
    NotFound,
    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),
    #[error("Corrupt: {0}")]
    Corrupt(String),
}
