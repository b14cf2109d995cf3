/// Counters bounding the key index and the log. Lives at offset 0 of the
/// config region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    pub stored_keys: u16,
    pub log_entries: u16,
}

impl ConfigRecord {
    pub const SIZE: usize = 4;

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..2].copy_from_slice(&self.stored_keys.to_le_bytes());
        buf[2..4].copy_from_slice(&self.log_entries.to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8; Self::SIZE]) -> Self {
        Self {
            stored_keys: u16::from_le_bytes([buf[0], buf[1]]),
            log_entries: u16::from_le_bytes([buf[2], buf[3]]),
        }
    }
}
