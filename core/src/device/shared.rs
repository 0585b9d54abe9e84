// Lock-protected device for several submitters

use gpt_disk_io::BlockIo;
use spin::Mutex;

use super::{DeviceResult, RamDisk};
use crate::block::{BlockRequest, Completion, DispatchResult};
use crate::store::SectorStore;

/// A `RamDisk` behind a spinlock. Requests from different callers are
/// served one at a time, each to completion.
pub struct SharedRamDisk<S: SectorStore + BlockIo> {
    inner: Mutex<RamDisk<S>>,
}

impl<S: SectorStore + BlockIo> SharedRamDisk<S> {
    pub const fn new(disk: RamDisk<S>) -> Self {
        Self {
            inner: Mutex::new(disk),
        }
    }

    pub fn submit(&self, request: BlockRequest<'_>) -> DispatchResult<Completion> {
        self.inner.lock().submit(request)
    }

    pub fn open(&self) -> u32 {
        self.inner.lock().open()
    }

    pub fn release(&self) -> DeviceResult<u32> {
        self.inner.lock().release()
    }

    pub fn capacity(&self) -> u64 {
        self.inner.lock().capacity()
    }

    /// Run `f` with the device locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut RamDisk<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> RamDisk<S> {
        self.inner.into_inner()
    }
}
