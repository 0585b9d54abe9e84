//! Device shell.
//!
//! Owns one sector store and serves block requests against it. Bring-up
//! allocates the store and writes the partition layout before the device is
//! handed out, so every `RamDisk` in existence is already partitioned.

mod error;
mod queue;
mod shared;

pub use error::{DeviceError, DeviceResult};
pub use queue::{RequestId, RequestOutcome, RequestQueue};
pub use shared::SharedRamDisk;

use alloc::vec::Vec;

use gpt_disk_io::BlockIo;

use crate::block::{dispatch, BlockRequest, Completion, DispatchResult};
use crate::config::RamDiskConfig;
use crate::disk::{
    scan_partitions, write_boot_records, BootRecords, Geometry, PartitionList, ScanError,
    Timestamp,
};
use crate::store::SectorStore;
use crate::{log_error, log_info};

pub struct RamDisk<S: SectorStore + BlockIo> {
    store: S,
    config: RamDiskConfig,
    geometry: Geometry,
    records: BootRecords,
    open_count: u32,
}

impl<S: SectorStore + BlockIo> RamDisk<S> {
    /// Initialize `store` and lay down the boot records.
    ///
    /// On failure the store is cleaned up before the error is returned.
    pub fn bring_up(
        mut store: S,
        config: RamDiskConfig,
        timestamp: Timestamp,
    ) -> DeviceResult<Self> {
        let sectors = match store.init() {
            Ok(n) => n,
            Err(e) => {
                log_error!("{}: store init failed: {}", config.disk_name, e);
                store.cleanup();
                return Err(e.into());
            }
        };

        let records = match write_boot_records(&mut store, timestamp) {
            Ok(r) => r,
            Err(e) => {
                log_error!("{}: partitioning failed: {}", config.disk_name, e);
                store.cleanup();
                return Err(e.into());
            }
        };

        let geometry = Geometry::for_capacity(sectors);
        log_info!(
            "{}: {} sectors, {} cylinders, minors {}..{}",
            config.disk_name,
            sectors,
            geometry.cylinders,
            config.first_minor,
            config.first_minor.saturating_add(config.minor_count)
        );

        Ok(Self {
            store,
            config,
            geometry,
            records,
            open_count: 0,
        })
    }

    /// Bring up with boot records stamped from the wall clock.
    #[cfg(feature = "std")]
    pub fn bring_up_now(store: S, config: RamDiskConfig) -> DeviceResult<Self> {
        let timestamp = Timestamp::now(config.utc_offset_hours);
        Self::bring_up(store, config, timestamp)
    }

    pub fn submit(&mut self, request: BlockRequest<'_>) -> DispatchResult<Completion> {
        dispatch(&mut self.store, request)
    }

    /// Drain `queue` in order, one outcome per request.
    pub fn process(&mut self, queue: &mut RequestQueue<'_>) -> Vec<RequestOutcome> {
        let mut outcomes = Vec::with_capacity(queue.len());
        while let Some((id, request)) = queue.pop() {
            let result = self.submit(request);
            outcomes.push(RequestOutcome { id, result });
        }
        outcomes
    }

    /// Partitions as a reader of the device would see them.
    pub fn partitions(&mut self) -> Result<PartitionList, ScanError> {
        scan_partitions(&mut self.store)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn open(&mut self) -> u32 {
        self.open_count += 1;
        self.open_count
    }

    pub fn release(&mut self) -> DeviceResult<u32> {
        if self.open_count == 0 {
            return Err(DeviceError::NotOpen);
        }
        self.open_count -= 1;
        Ok(self.open_count)
    }

    pub fn open_count(&self) -> u32 {
        self.open_count
    }

    pub fn name(&self) -> &'static str {
        self.config.disk_name
    }

    pub fn first_minor(&self) -> u32 {
        self.config.first_minor
    }

    pub fn minor_count(&self) -> u32 {
        self.config.minor_count
    }

    pub fn config(&self) -> &RamDiskConfig {
        &self.config
    }

    /// Capacity in sectors.
    pub fn capacity(&self) -> u64 {
        self.store.total_sectors()
    }

    /// Boot sector images written at bring-up.
    pub fn boot_records(&self) -> &BootRecords {
        &self.records
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the backing memory and hand the store back.
    pub fn teardown(mut self) -> S {
        if self.open_count > 0 {
            log_info!(
                "{}: torn down with {} openers",
                self.config.disk_name,
                self.open_count
            );
        }
        self.store.cleanup();
        log_info!("{}: removed", self.config.disk_name);
        self.store
    }
}
