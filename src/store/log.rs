//! Audit ring log.
//!
//! Entry `n` (counting every entry ever written) lives at position
//! `n % capacity`; once the ring is full each append overwrites the oldest
//! entry.

use std::fmt;

use super::{ConfigRecord, Fingerprint, RegionKind, StorageContext, StoreError, Timestamp};
use crate::flash::Flash;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventCode {
    UnknownCredential,
    AccessGranted,
    OutOfSchedule,
    AccountDisabled,
    MarkedLost,
    OtpMismatch,
    StorageFull,
    RecordUpdated,
}

impl EventCode {
    /// Numeric code written to flash and published.
    pub fn code(self) -> u32 {
        match self {
            Self::UnknownCredential => 0,
            Self::AccessGranted => 1,
            Self::OutOfSchedule => 2,
            Self::AccountDisabled => 3,
            Self::MarkedLost => 4,
            Self::OtpMismatch => 5,
            Self::StorageFull => 8,
            Self::RecordUpdated => 9,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::UnknownCredential,
            1 => Self::AccessGranted,
            2 => Self::OutOfSchedule,
            3 => Self::AccountDisabled,
            4 => Self::MarkedLost,
            5 => Self::OtpMismatch,
            8 => Self::StorageFull,
            9 => Self::RecordUpdated,
            _ => return None,
        })
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub fingerprint: Fingerprint,
    pub event: EventCode,
}

impl LogEntry {
    pub const SIZE: usize = 4 + Fingerprint::SIZE + 4;

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[4..14].copy_from_slice(self.fingerprint.as_bytes());
        buf[14..18].copy_from_slice(&self.event.code().to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8; Self::SIZE]) -> Result<Self, StoreError> {
        let mut fingerprint = [0u8; Fingerprint::SIZE];
        fingerprint.copy_from_slice(&buf[4..14]);
        let code = u32::from_le_bytes([buf[14], buf[15], buf[16], buf[17]]);
        let event = EventCode::from_code(code)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown event code {code}")))?;
        Ok(Self {
            timestamp: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            fingerprint: Fingerprint::from_bytes(fingerprint),
            event,
        })
    }
}

/// `timestamp;fingerprint;code`, the published and rendered form.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.timestamp, self.fingerprint, self.event)
    }
}

/// Successor of the on-flash entry counter. Past `u16::MAX` it folds back
/// to a value with the same ring position that still reads as wrapped.
fn next_total(total: u16, capacity: usize) -> u16 {
    match total.checked_add(1) {
        Some(next) => next,
        None => (capacity + (total as usize + 1) % capacity) as u16,
    }
}

/// Writes `entry` over the oldest slot and bumps the counter. Returns the ring
/// position used.
pub fn append<F: Flash>(ctx: &mut StorageContext<F>, entry: &LogEntry) -> Result<usize, StoreError> {
    let config = ctx.config();
    let capacity = ctx.geometry().log.capacity();
    let position = config.log_entries as usize % capacity;
    ctx.write_record(RegionKind::Log, position, &entry.encode())?;
    ctx.commit_config(ConfigRecord {
        log_entries: next_total(config.log_entries, capacity),
        ..config
    })?;
    tracing::debug!(position, event = %entry.event, "Log entry written");
    Ok(position)
}

/// Number of entries still held by the ring.
pub fn len<F: Flash>(ctx: &StorageContext<F>) -> usize {
    (ctx.config().log_entries as usize).min(ctx.geometry().log.capacity())
}

/// Entry at ring position `position`.
pub fn read<F: Flash>(ctx: &StorageContext<F>, position: usize) -> Result<LogEntry, StoreError> {
    let mut buf = [0u8; LogEntry::SIZE];
    ctx.read_record(RegionKind::Log, position, &mut buf)?;
    LogEntry::decode(&buf)
}

/// Ring positions of the retained entries, newest first.
fn positions_newest_first<F: Flash>(ctx: &StorageContext<F>) -> impl Iterator<Item = usize> {
    let total = ctx.config().log_entries as usize;
    let capacity = ctx.geometry().log.capacity();
    let oldest = total.saturating_sub(capacity);
    (oldest..total).rev().map(move |n| n % capacity)
}

/// Retained entries, oldest first.
pub fn entries<F: Flash>(ctx: &StorageContext<F>) -> Result<Vec<LogEntry>, StoreError> {
    let mut entries = positions_newest_first(ctx)
        .map(|position| read(ctx, position))
        .collect::<Result<Vec<_>, _>>()?;
    entries.reverse();
    Ok(entries)
}

/// Newest-first text view shorter than `max_bytes`, one entry per line.
///
/// Stops at the oldest retained entry or at the first line that no longer
/// fits; lines are never cut. Undecodable entries are skipped.
pub fn render_recent<F: Flash>(ctx: &StorageContext<F>, max_bytes: usize) -> Result<String, StoreError> {
    let mut out = String::new();
    for position in positions_newest_first(ctx) {
        let entry = match read(ctx, position) {
            Ok(entry) => entry,
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(position, error = %e, "Skipping corrupt log entry");
                continue;
            }
            Err(e) => return Err(e),
        };
        let line = format!("{entry}\n");
        if out.len() + line.len() >= max_bytes {
            break;
        }
        out.push_str(&line);
    }
    Ok(out)
}
