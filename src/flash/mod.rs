//! Byte-addressable non-volatile storage.
//!
//! The device is assumed to make each single `write` all-or-nothing; nothing
//! above this layer keeps a transaction log.

pub mod file;
pub mod memory;

pub use file::FileFlash;
pub use memory::MemoryFlash;

#[derive(Debug, thiserror::Error)]
pub enum FlashError {
    #[error("access {offset:#x}+{len} outside device of {size} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },
    #[error("flash image is {actual} bytes, expected {expected}")]
    SizeMismatch { actual: u64, expected: u64 },
    #[error("write rejected by device")]
    WriteRejected,
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Flash {
    /// Total addressable bytes.
    fn size(&self) -> usize;

    /// Fills `buf` from `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), FlashError>;

    /// Writes all of `data` at `offset`, or nothing.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), FlashError>;
}

pub(crate) fn check_bounds(offset: usize, len: usize, size: usize) -> Result<(), FlashError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(FlashError::OutOfBounds { offset, len, size }),
    }
}
