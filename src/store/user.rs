use super::{Fingerprint, RegionKind, Slot, StorageContext, StoreError, Timestamp, key_index};
use crate::access::Schedule;
use crate::config::OTP_SIZE;
use crate::flash::Flash;
use crate::otp::Otp;

/// Per-slot credential state.
///
/// Byte layout (55 bytes, little-endian, packed):
/// `otp_enabled u8 | otp [u8; 16] | schedule [u32; 7] | last_updated u32 |
/// last_seen u32 | active u8 | lost u8`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub otp_enabled: bool,
    pub otp: Otp,
    pub schedule: Schedule,
    pub last_updated: Timestamp,
    pub last_seen: Timestamp,
    pub active: bool,
    pub lost: bool,
}

impl UserRecord {
    pub const SIZE: usize = 1 + OTP_SIZE + 7 * 4 + 4 + 4 + 1 + 1;

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0] = self.otp_enabled as u8;
        buf[1..17].copy_from_slice(self.otp.as_bytes());
        for (day, mask) in self.schedule.days().iter().enumerate() {
            let at = 17 + day * 4;
            buf[at..at + 4].copy_from_slice(&mask.to_le_bytes());
        }
        buf[45..49].copy_from_slice(&self.last_updated.to_le_bytes());
        buf[49..53].copy_from_slice(&self.last_seen.to_le_bytes());
        buf[53] = self.active as u8;
        buf[54] = self.lost as u8;
        buf
    }

    pub fn decode(buf: &[u8; Self::SIZE]) -> Self {
        let u32_at = |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let mut otp = [0u8; OTP_SIZE];
        otp.copy_from_slice(&buf[1..17]);
        let mut days = [0u32; 7];
        for (day, mask) in days.iter_mut().enumerate() {
            *mask = u32_at(17 + day * 4);
        }
        Self {
            otp_enabled: buf[0] != 0,
            otp: Otp::from_bytes(otp),
            schedule: Schedule::new(days),
            last_updated: u32_at(45),
            last_seen: u32_at(49),
            active: buf[53] != 0,
            lost: buf[54] != 0,
        }
    }
}

pub fn load<F: Flash>(ctx: &StorageContext<F>, slot: Slot) -> Result<UserRecord, StoreError> {
    if slot >= ctx.config().stored_keys {
        return Err(StoreError::NotFound);
    }
    let mut buf = [0u8; UserRecord::SIZE];
    ctx.read_record(RegionKind::Users, slot as usize, &mut buf)?;
    Ok(UserRecord::decode(&buf))
}

/// Overwrites the record of a confirmed slot, or stages the record of the
/// slot about to be registered.
pub fn save<F: Flash>(
    ctx: &mut StorageContext<F>,
    slot: Slot,
    record: &UserRecord,
) -> Result<(), StoreError> {
    if slot > ctx.config().stored_keys {
        return Err(StoreError::NotFound);
    }
    ctx.write_record(RegionKind::Users, slot as usize, &record.encode())
}

/// Allocates a slot for an unknown fingerprint with `record` as its initial
/// state: user record first, then key entry, then the count exposing both.
pub fn register<F: Flash>(
    ctx: &mut StorageContext<F>,
    fingerprint: &Fingerprint,
    record: &UserRecord,
) -> Result<Slot, StoreError> {
    let next = ctx.config().stored_keys;
    if next as usize >= ctx.geometry().keys.capacity() {
        return Err(StoreError::StorageFull);
    }
    save(ctx, next, record)?;
    key_index::append(ctx, fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_layout() {
        let record = UserRecord {
            otp_enabled: true,
            otp: Otp::from_bytes([0x11; OTP_SIZE]),
            schedule: Schedule::new([0xFFFF_FFFF, 0, 0x0000_0F00, 0, 0, 0, 0x8000_0001]),
            last_updated: 0x0102_0304,
            last_seen: 0x0A0B_0C0D,
            active: true,
            lost: false,
        };
        let buf = record.encode();
        assert_eq!(buf.len(), 55);
        assert_eq!(buf[0], 1);
        assert_eq!(&buf[1..17], &[0x11; 16]);
        assert_eq!(&buf[17..21], &[0xFF; 4]);
        assert_eq!(&buf[25..29], &[0x00, 0x0F, 0x00, 0x00]);
        assert_eq!(&buf[41..45], &[0x01, 0x00, 0x00, 0x80]);
        assert_eq!(&buf[45..49], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&buf[49..53], &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(&buf[53..], &[1, 0]);
        assert_eq!(UserRecord::decode(&buf), record);
    }

    #[test]
    fn test_blank_record_is_unprovisioned() {
        let record = UserRecord::decode(&[0u8; UserRecord::SIZE]);
        assert_eq!(record, UserRecord::default());
        assert!(record.otp.is_sentinel());
        assert!(!record.active);
    }

    #[test]
    fn test_nonzero_flag_bytes_decode_as_true() {
        let mut buf = [0u8; UserRecord::SIZE];
        buf[0] = 0xFF;
        buf[54] = 7;
        let record = UserRecord::decode(&buf);
        assert!(record.otp_enabled);
        assert!(record.lost);
    }
}
