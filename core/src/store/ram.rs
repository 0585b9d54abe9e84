//! RAM sector store.
//!
//! One contiguous zero-filled allocation of `total_sectors * 512` bytes,
//! made with fallible allocation so an oversized request surfaces as
//! `StoreError::Capacity` instead of aborting.

use alloc::vec::Vec;
use core::ops::Range;

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};

use super::{SectorStore, StoreError, StoreResult};
use crate::config::RamDiskConfig;
use crate::disk::SECTOR_SIZE;
use crate::log_info;

/// Partition entries address sectors with 32 bits.
pub const MAX_SECTORS: u64 = u32::MAX as u64;

pub struct RamSectorStore {
    requested_sectors: u64,
    total_sectors: u64,
    data: Vec<u8>,
}

impl RamSectorStore {
    /// Store that will allocate `total_sectors` on `init`.
    pub const fn new(total_sectors: u64) -> Self {
        Self {
            requested_sectors: total_sectors,
            total_sectors: 0,
            data: Vec::new(),
        }
    }

    pub fn from_config(config: &RamDiskConfig) -> Self {
        Self::new(config.total_sectors)
    }

    pub fn is_initialized(&self) -> bool {
        self.total_sectors != 0
    }

    /// Raw contents, for inspection and image dumps.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn byte_range(&self, sector: u64, count: u64, buffer_len: usize) -> StoreResult<Range<usize>> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized);
        }

        let out_of_bounds = StoreError::OutOfBounds {
            sector,
            count,
            total: self.total_sectors,
        };
        let end = sector.checked_add(count).ok_or(out_of_bounds)?;
        if end > self.total_sectors {
            return Err(out_of_bounds);
        }

        // end <= total_sectors, whose byte size fit in usize at init
        let start = sector as usize * SECTOR_SIZE;
        let needed = count as usize * SECTOR_SIZE;
        if buffer_len < needed {
            return Err(StoreError::BufferTooSmall {
                needed,
                actual: buffer_len,
            });
        }
        Ok(start..start + needed)
    }

    fn sectors_in(buffer_len: usize) -> StoreResult<u64> {
        if buffer_len % SECTOR_SIZE != 0 {
            return Err(StoreError::UnalignedBuffer { len: buffer_len });
        }
        Ok((buffer_len / SECTOR_SIZE) as u64)
    }
}

impl SectorStore for RamSectorStore {
    fn init(&mut self) -> StoreResult<u64> {
        if self.is_initialized() {
            return Ok(self.total_sectors);
        }

        let sectors = self.requested_sectors;
        let capacity = StoreError::Capacity { sectors };
        if sectors == 0 || sectors > MAX_SECTORS {
            return Err(capacity);
        }
        let bytes = sectors
            .checked_mul(SECTOR_SIZE as u64)
            .and_then(|b| usize::try_from(b).ok())
            .ok_or(capacity)?;

        let mut data = Vec::new();
        data.try_reserve_exact(bytes).map_err(|_| capacity)?;
        data.resize(bytes, 0);

        self.data = data;
        self.total_sectors = sectors;
        log_info!(
            "ramdisk store: {} sectors ({} bytes) allocated",
            sectors,
            bytes
        );
        Ok(sectors)
    }

    fn total_sectors(&self) -> u64 {
        self.total_sectors
    }

    fn read(&mut self, sector: u64, buffer: &mut [u8], count: u64) -> StoreResult<()> {
        let range = self.byte_range(sector, count, buffer.len())?;
        let len = range.len();
        buffer[..len].copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn write(&mut self, sector: u64, buffer: &[u8], count: u64) -> StoreResult<()> {
        let range = self.byte_range(sector, count, buffer.len())?;
        let len = range.len();
        self.data[range].copy_from_slice(&buffer[..len]);
        Ok(())
    }

    fn cleanup(&mut self) {
        if self.is_initialized() {
            log_info!("ramdisk store: released {} sectors", self.total_sectors);
        }
        self.data = Vec::new();
        self.total_sectors = 0;
    }
}

impl BlockIo for RamSectorStore {
    type Error = StoreError;

    fn block_size(&self) -> BlockSize {
        BlockSize::BS_512
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok(self.total_sectors)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let count = Self::sectors_in(dst.len())?;
        self.read(start_lba.0, dst, count)
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let count = Self::sectors_in(src.len())?;
        self.write(start_lba.0, src, count)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(()) // No-op for in-memory device
    }
}
