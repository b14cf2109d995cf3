use std::fmt;

use super::{ConfigRecord, LogEntry, StoreError, UserRecord};
use crate::config::{CONFIG_BEGIN, KEYS_BEGIN, KEY_SIZE, LOG_BEGIN, USERS_BEGIN};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionKind {
    Config,
    Keys,
    Log,
    Users,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegionKind::Config => "config",
            RegionKind::Keys => "key index",
            RegionKind::Log => "log",
            RegionKind::Users => "user",
        })
    }
}

/// A byte range holding records of one fixed size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub record_size: usize,
}

impl Region {
    pub fn capacity(&self) -> usize {
        (self.end - self.start) / self.record_size
    }

    /// Byte offset of record `index`, if it lies inside the region.
    pub fn offset_of(&self, index: usize) -> Option<usize> {
        (index < self.capacity()).then(|| self.start + index * self.record_size)
    }
}

/// Region boundaries on the device. Each region ends where the next begins,
/// the user region ends at `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub config_begin: usize,
    pub keys_begin: usize,
    pub log_begin: usize,
    pub users_begin: usize,
    pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub config: Region,
    pub keys: Region,
    pub log: Region,
    pub users: Region,
}

impl Layout {
    /// The reader's fixed layout on a device of `size` bytes.
    pub fn for_device(size: usize) -> Self {
        Self {
            config_begin: CONFIG_BEGIN,
            keys_begin: KEYS_BEGIN,
            log_begin: LOG_BEGIN,
            users_begin: USERS_BEGIN,
            end: size,
        }
    }

    /// Derives and validates the region geometry.
    pub fn geometry(&self) -> Result<Geometry, StoreError> {
        let bounds = [
            self.config_begin,
            self.keys_begin,
            self.log_begin,
            self.users_begin,
            self.end,
        ];
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StoreError::Layout(format!(
                "region boundaries must be strictly increasing: {bounds:?}"
            )));
        }

        let geometry = Geometry {
            config: Region {
                start: self.config_begin,
                end: self.keys_begin,
                record_size: ConfigRecord::SIZE,
            },
            keys: Region {
                start: self.keys_begin,
                end: self.log_begin,
                record_size: KEY_SIZE,
            },
            log: Region {
                start: self.log_begin,
                end: self.users_begin,
                record_size: LogEntry::SIZE,
            },
            users: Region {
                start: self.users_begin,
                end: self.end,
                record_size: UserRecord::SIZE,
            },
        };

        if geometry.config.capacity() == 0 {
            return Err(StoreError::Layout("config region too small".into()));
        }
        let keys = geometry.keys.capacity();
        if keys == 0 || keys > u16::MAX as usize {
            return Err(StoreError::Layout(format!("key index capacity {keys} unusable")));
        }
        // The on-flash log counter is folded at u16::MAX; this needs two
        // full rings of headroom.
        let log = geometry.log.capacity();
        if log == 0 || log > (u16::MAX / 2) as usize {
            return Err(StoreError::Layout(format!("log capacity {log} unusable")));
        }
        if geometry.users.capacity() < keys {
            return Err(StoreError::Layout(format!(
                "user region holds {} records, key index holds {keys}",
                geometry.users.capacity()
            )));
        }
        Ok(geometry)
    }
}

impl Geometry {
    pub fn region(&self, kind: RegionKind) -> &Region {
        match kind {
            RegionKind::Config => &self.config,
            RegionKind::Keys => &self.keys,
            RegionKind::Log => &self.log,
            RegionKind::Users => &self.users,
        }
    }
}
