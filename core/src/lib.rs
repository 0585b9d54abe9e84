//! RamDisk Core Library
//!
//! A RAM-backed block device that comes up pre-partitioned: an MBR with
//! four primary slots, one of them an extended partition holding a chain
//! of three logical partitions behind their own EBRs.
//!
//! # Architecture
//!
//! ```text
//!   host / shell ──► RamDisk ──► block::dispatch ──► SectorStore
//!                        │                              ▲
//!                        └── disk::write_boot_records ──┘ (once, at bring-up)
//! ```
//!
//! Designed to be no_std compatible; the `std` feature only adds wall-clock
//! timestamps.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![allow(clippy::new_without_default)]

extern crate alloc;

pub mod logger;

pub mod block;
pub mod config;
pub mod device;
pub mod disk;
pub mod store;

pub use block::{dispatch, BlockRequest, Completion, Direction, DispatchError};
pub use config::RamDiskConfig;
pub use device::{DeviceError, RamDisk, RequestQueue, SharedRamDisk};
pub use disk::{
    build_boot_records, scan_partitions, write_boot_records, BootRecordError, Geometry,
    PartitionInfo, PartitionList, Timestamp,
};
pub use store::{RamSectorStore, SectorStore, StoreError};
