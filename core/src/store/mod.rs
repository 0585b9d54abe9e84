//! Sector stores.
//!
//! A sector store is a linearly addressable array of 512-byte sectors. The
//! dispatcher only ever talks to it through `SectorStore`; the RAM
//! implementation also speaks `gpt_disk_io::BlockIo` so LBA-level tooling
//! (boot record writer, partition scanner) can use it directly.

mod error;
mod ram;

pub use error::{StoreError, StoreResult};
pub use ram::RamSectorStore;

/// Backing storage for a block device.
pub trait SectorStore {
    /// Allocate backing memory. Returns the capacity in sectors.
    fn init(&mut self) -> StoreResult<u64>;

    /// Capacity in sectors; 0 before `init` and after `cleanup`.
    fn total_sectors(&self) -> u64;

    /// Copy `count` sectors starting at `sector` into `buffer`.
    fn read(&mut self, sector: u64, buffer: &mut [u8], count: u64) -> StoreResult<()>;

    /// Copy `count` sectors from `buffer` to the store starting at `sector`.
    fn write(&mut self, sector: u64, buffer: &[u8], count: u64) -> StoreResult<()>;

    /// Release backing memory. Safe to call more than once.
    fn cleanup(&mut self);
}
