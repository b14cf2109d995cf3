//! Append-only table of fingerprints. A slot, once handed out, belongs to its
//! fingerprint until the configuration is reset.

use super::{ConfigRecord, Fingerprint, RegionKind, Slot, StorageContext, StoreError};
use crate::flash::Flash;

/// Linear scan over the confirmed slots, lowest slot first.
pub fn find<F: Flash>(
    ctx: &StorageContext<F>,
    fingerprint: &Fingerprint,
) -> Result<Option<Slot>, StoreError> {
    let mut buf = [0u8; Fingerprint::SIZE];
    for slot in 0..ctx.config().stored_keys {
        ctx.read_record(RegionKind::Keys, slot as usize, &mut buf)?;
        if buf == *fingerprint.as_bytes() {
            tracing::debug!(slot, "Key found");
            return Ok(Some(slot));
        }
    }
    tracing::debug!(fingerprint = %fingerprint, "Key not found");
    Ok(None)
}

/// Fingerprint stored at a confirmed slot.
pub fn get<F: Flash>(ctx: &StorageContext<F>, slot: Slot) -> Result<Fingerprint, StoreError> {
    if slot >= ctx.config().stored_keys {
        return Err(StoreError::NotFound);
    }
    let mut buf = [0u8; Fingerprint::SIZE];
    ctx.read_record(RegionKind::Keys, slot as usize, &mut buf)?;
    Ok(Fingerprint::from_bytes(buf))
}

/// Stores `fingerprint` in the next free slot.
///
/// Callers check [`find`] first; this does not deduplicate. The entry is
/// written before the count that exposes it, so an interrupted append leaves
/// an invisible entry rather than a visible garbage one.
pub fn append<F: Flash>(
    ctx: &mut StorageContext<F>,
    fingerprint: &Fingerprint,
) -> Result<Slot, StoreError> {
    let config = ctx.config();
    if config.stored_keys as usize >= ctx.geometry().keys.capacity() {
        tracing::warn!(fingerprint = %fingerprint, "Key index full");
        return Err(StoreError::StorageFull);
    }
    let slot = config.stored_keys;
    ctx.write_record(RegionKind::Keys, slot as usize, fingerprint.as_bytes())?;
    ctx.commit_config(ConfigRecord {
        stored_keys: slot + 1,
        ..config
    })?;
    tracing::info!(slot, fingerprint = %fingerprint, "Key added");
    Ok(slot)
}

/// Number of confirmed slots.
pub fn len<F: Flash>(ctx: &StorageContext<F>) -> usize {
    ctx.config().stored_keys as usize
}
