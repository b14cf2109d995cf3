//! File-backed flash image for running the reader on a host.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{Flash, FlashError, check_bounds};

pub struct FileFlash {
    size: usize,
    /// Every access seeks first, so sharing the cursor is harmless.
    file: RefCell<File>,
}

impl FileFlash {
    /// Opens an image of exactly `size` bytes, creating a zero-filled one if
    /// the file is missing or empty.
    pub fn open(path: &Path, size: usize) -> Result<Self, FlashError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            file.set_len(size as u64)?;
            file.sync_all()?;
            tracing::info!(path = %path.display(), size, "Created blank flash image");
        } else if len != size as u64 {
            return Err(FlashError::SizeMismatch {
                actual: len,
                expected: size as u64,
            });
        }
        Ok(Self {
            size,
            file: RefCell::new(file),
        })
    }
}

impl Flash for FileFlash {
    fn size(&self) -> usize {
        self.size
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), FlashError> {
        check_bounds(offset, buf.len(), self.size)?;
        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(offset as u64))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), FlashError> {
        check_bounds(offset, data.len(), self.size)?;
        let file = self.file.get_mut();
        file.seek(SeekFrom::Start(offset as u64))?;
        file.write_all(data)?;
        file.sync_data()?;
        Ok(())
    }
}
