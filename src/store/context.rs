use super::{ConfigRecord, Geometry, Layout, RegionKind, StoreError};
use crate::flash::Flash;

/// Storage context shared by the key index, user store and log.
///
/// Owns the device, the validated geometry and the cached configuration.
/// The cache only advances after the configuration record was persisted.
pub struct StorageContext<F> {
    flash: F,
    geometry: Geometry,
    config: ConfigRecord,
}

impl<F: Flash> StorageContext<F> {
    pub fn open(flash: F, layout: &Layout) -> Result<Self, StoreError> {
        let geometry = layout.geometry()?;
        if layout.end > flash.size() {
            return Err(StoreError::Layout(format!(
                "layout ends at {:#x}, device has {:#x} bytes",
                layout.end,
                flash.size()
            )));
        }

        let mut ctx = Self {
            flash,
            geometry,
            config: ConfigRecord::default(),
        };
        let mut buf = [0u8; ConfigRecord::SIZE];
        ctx.read_record(RegionKind::Config, 0, &mut buf)?;
        let config = ConfigRecord::decode(&buf);
        if config.stored_keys as usize > ctx.geometry.keys.capacity() {
            return Err(StoreError::Corrupt(format!(
                "config claims {} keys, index holds {}",
                config.stored_keys,
                ctx.geometry.keys.capacity()
            )));
        }
        ctx.config = config;
        tracing::debug!(
            stored_keys = config.stored_keys,
            log_entries = config.log_entries,
            "Storage context opened"
        );
        Ok(ctx)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn config(&self) -> ConfigRecord {
        self.config
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    pub fn into_flash(self) -> F {
        self.flash
    }

    /// Reads record `index` of `region` into `buf`, which must be exactly
    /// one record long.
    pub fn read_record(
        &self,
        region: RegionKind,
        index: usize,
        buf: &mut [u8],
    ) -> Result<(), StoreError> {
        let offset = self.locate(region, index, buf.len())?;
        self.flash.read(offset, buf)?;
        Ok(())
    }

    /// Writes one full record. Bounds are checked before the device is touched.
    pub fn write_record(
        &mut self,
        region: RegionKind,
        index: usize,
        data: &[u8],
    ) -> Result<(), StoreError> {
        let offset = self.locate(region, index, data.len())?;
        self.flash.write(offset, data)?;
        Ok(())
    }

    /// Persists `next` and only then exposes it through the cache.
    pub(crate) fn commit_config(&mut self, next: ConfigRecord) -> Result<(), StoreError> {
        self.write_record(RegionKind::Config, 0, &next.encode())?;
        self.config = next;
        Ok(())
    }

    /// Zeroes the configuration. Key, log and user bytes stay on flash but
    /// fall outside the counters and get overwritten by later appends.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.commit_config(ConfigRecord::default())?;
        tracing::info!("Configuration reset, all keys and log entries forgotten");
        Ok(())
    }

    fn locate(&self, kind: RegionKind, index: usize, len: usize) -> Result<usize, StoreError> {
        let region = self.geometry.region(kind);
        if len != region.record_size {
            return Err(StoreError::RecordSize {
                region: kind,
                expected: region.record_size,
                actual: len,
            });
        }
        region.offset_of(index).ok_or(StoreError::OutOfRange {
            region: kind,
            index,
            capacity: region.capacity(),
        })
    }
}
