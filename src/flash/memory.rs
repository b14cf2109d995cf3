use super::{Flash, FlashError, check_bounds};

/// Flash kept in RAM.
///
/// Used by tests and by the simulator when no image path is wanted. Writes can
/// be made to fail after a given count to exercise the ordering guarantees of
/// the store.
#[derive(Clone)]
pub struct MemoryFlash {
    bytes: Box<[u8]>,
    writes: usize,
    fail_after: Option<usize>,
}

impl MemoryFlash {
    /// Zero-filled device, i.e. an empty configuration.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0u8; size].into_boxed_slice(),
            writes: 0,
            fail_after: None,
        }
    }

    /// Lets `writes` more writes succeed, then rejects every write until
    /// [`MemoryFlash::heal`] is called.
    pub fn fail_after(&mut self, writes: usize) {
        self.fail_after = Some(self.writes + writes);
    }

    pub fn heal(&mut self) {
        self.fail_after = None;
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Flash for MemoryFlash {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), FlashError> {
        check_bounds(offset, buf.len(), self.bytes.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), FlashError> {
        check_bounds(offset, data.len(), self.bytes.len())?;
        if self.fail_after.is_some_and(|limit| self.writes >= limit) {
            return Err(FlashError::WriteRejected);
        }
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut flash = MemoryFlash::new(16);
        let res = flash.write(12, &[1, 2, 3, 4, 5]);
        assert!(matches!(res, Err(FlashError::OutOfBounds { offset: 12, len: 5, size: 16 })));
        assert!(flash.as_bytes().iter().all(|b| *b == 0), "no partial write");
    }

    #[test]
    fn test_fail_after_leaves_bytes_untouched() {
        let mut flash = MemoryFlash::new(8);
        flash.fail_after(1);
        flash.write(0, &[0xAA; 4]).unwrap();
        assert!(matches!(flash.write(4, &[0xBB; 4]), Err(FlashError::WriteRejected)));
        assert_eq!(&flash.as_bytes()[4..], &[0; 4]);

        flash.heal();
        flash.write(4, &[0xBB; 4]).unwrap();
        assert_eq!(flash.write_count(), 2);
    }
}
