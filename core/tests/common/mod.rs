//! Common test utilities: an instrumented sector store and data patterns

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use ramdisk_core::store::StoreResult;
use ramdisk_core::{RamSectorStore, SectorStore, StoreError};

pub const SECTOR: usize = 512;

/// Call counters shared between a test and the store it hands away.
#[derive(Debug, Default)]
pub struct Counters {
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub cleanups: AtomicUsize,
}

impl Counters {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn cleanups(&self) -> usize {
        self.cleanups.load(Ordering::SeqCst)
    }

    pub fn accesses(&self) -> usize {
        self.reads() + self.writes()
    }
}

/// RAM store that counts every sector-level call.
pub struct CountingStore {
    inner: RamSectorStore,
    pub counters: Arc<Counters>,
}

impl CountingStore {
    pub fn new(sectors: u64) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let store = Self {
            inner: RamSectorStore::new(sectors),
            counters: Arc::clone(&counters),
        };
        (store, counters)
    }

    /// Already initialized, for dispatcher tests that skip bring-up.
    pub fn ready(sectors: u64) -> (Self, Arc<Counters>) {
        let (mut store, counters) = Self::new(sectors);
        store.init().expect("store init");
        (store, counters)
    }

    pub fn bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }
}

impl SectorStore for CountingStore {
    fn init(&mut self) -> StoreResult<u64> {
        self.inner.init()
    }

    fn total_sectors(&self) -> u64 {
        self.inner.total_sectors()
    }

    fn read(&mut self, sector: u64, buffer: &mut [u8], count: u64) -> StoreResult<()> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(sector, buffer, count)
    }

    fn write(&mut self, sector: u64, buffer: &[u8], count: u64) -> StoreResult<()> {
        self.counters.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(sector, buffer, count)
    }

    fn cleanup(&mut self) {
        self.counters.cleanups.fetch_add(1, Ordering::SeqCst);
        self.inner.cleanup()
    }
}

impl BlockIo for CountingStore {
    type Error = StoreError;

    fn block_size(&self) -> BlockSize {
        BlockSize::BS_512
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        self.inner.num_blocks()
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_blocks(start_lba, dst)
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        self.counters.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write_blocks(start_lba, src)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

/// `sectors` worth of bytes where every sector differs from its neighbours.
pub fn pattern(sectors: usize, seed: u8) -> Vec<u8> {
    (0..sectors * SECTOR)
        .map(|i| (i / SECTOR) as u8 ^ (i % 251) as u8 ^ seed)
        .collect()
}

pub fn sector_of(bytes: &[u8], sector: usize) -> &[u8] {
    &bytes[sector * SECTOR..(sector + 1) * SECTOR]
}
