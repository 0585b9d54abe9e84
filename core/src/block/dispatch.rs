//! Request dispatch.
//!
//! Linearizes a request's segments onto consecutive sector ranges: segment
//! N starts at `start_sector` plus the sector count of segments 0..N. All
//! storage access goes through the `SectorStore`.

use super::error::{DispatchError, DispatchResult};
use super::request::{BlockRequest, Direction, Segments};
use crate::disk::SECTOR_SIZE;
use crate::store::SectorStore;
use crate::{log_debug, log_warn};

/// Outcome of a fully transferred request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub direction: Direction,
    pub start_sector: u64,
    pub sectors: u64,
    pub segments: usize,
}

/// Sectors covered by a segment of `len` bytes.
pub fn segment_sectors(index: usize, len: usize) -> DispatchResult<u64> {
    if len % SECTOR_SIZE != 0 {
        return Err(DispatchError::MalformedSegment { index, len });
    }
    Ok((len / SECTOR_SIZE) as u64)
}

fn validate(lengths: impl Iterator<Item = usize>) -> DispatchResult<()> {
    for (index, len) in lengths.enumerate() {
        segment_sectors(index, len)?;
    }
    Ok(())
}

/// Transfer every segment of `request`, in order.
///
/// Segment shapes are checked up front, so a malformed segment fails the
/// request before the store is touched. A store error stops the request at
/// that segment; segments before it stay transferred.
pub fn dispatch<S: SectorStore>(
    store: &mut S,
    request: BlockRequest<'_>,
) -> DispatchResult<Completion> {
    let direction = request.direction();
    let start_sector = request.start_sector();
    let segments = request.segment_count();

    let mut offset = 0u64;
    let result = match request.into_segments() {
        Segments::Write(buffers) => {
            validate(buffers.iter().map(|b| b.len()))?;
            write_segments(store, start_sector, &buffers, &mut offset)
        }
        Segments::Read(mut buffers) => {
            validate(buffers.iter().map(|b| b.len()))?;
            read_segments(store, start_sector, &mut buffers, &mut offset)
        }
    };

    if let Err(err) = result {
        log_warn!("dispatch: {:?} at sector {} failed: {}", direction, start_sector, err);
        return Err(err);
    }

    Ok(Completion {
        direction,
        start_sector,
        sectors: offset,
        segments,
    })
}

fn write_segments<S: SectorStore>(
    store: &mut S,
    start_sector: u64,
    buffers: &[&[u8]],
    offset: &mut u64,
) -> DispatchResult<()> {
    for (index, buffer) in buffers.iter().enumerate() {
        let count = segment_sectors(index, buffer.len())?;
        transfer_trace(start_sector, *offset, count);
        if count > 0 {
            store
                .write(start_sector.saturating_add(*offset), buffer, count)
                .map_err(|error| DispatchError::Store { index, error })?;
        }
        *offset += count;
    }
    Ok(())
}

fn read_segments<S: SectorStore>(
    store: &mut S,
    start_sector: u64,
    buffers: &mut [&mut [u8]],
    offset: &mut u64,
) -> DispatchResult<()> {
    for (index, buffer) in buffers.iter_mut().enumerate() {
        let count = segment_sectors(index, buffer.len())?;
        transfer_trace(start_sector, *offset, count);
        if count > 0 {
            store
                .read(start_sector.saturating_add(*offset), buffer, count)
                .map_err(|error| DispatchError::Store { index, error })?;
        }
        *offset += count;
    }
    Ok(())
}

fn transfer_trace(start_sector: u64, offset: u64, count: u64) {
    log_debug!(
        "dispatch: start sector {}, sector offset {}, length {} sectors",
        start_sector,
        offset,
        count
    );
}
