//! Block I/O requests.
//!
//! A request is one logical transfer: a starting sector, a direction and an
//! ordered list of buffer segments. The buffers belong to the caller and are
//! only borrowed for the lifetime of the request; reads borrow them mutably,
//! writes shared, so the direction always matches what the buffers allow.

use alloc::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Segment buffers in transfer order.
pub enum Segments<'a> {
    Read(Vec<&'a mut [u8]>),
    Write(Vec<&'a [u8]>),
}

pub struct BlockRequest<'a> {
    start_sector: u64,
    segments: Segments<'a>,
}

impl<'a> BlockRequest<'a> {
    pub fn read(start_sector: u64, segments: Vec<&'a mut [u8]>) -> Self {
        Self {
            start_sector,
            segments: Segments::Read(segments),
        }
    }

    pub fn write(start_sector: u64, segments: Vec<&'a [u8]>) -> Self {
        Self {
            start_sector,
            segments: Segments::Write(segments),
        }
    }

    /// Single-buffer read.
    pub fn read_into(start_sector: u64, buffer: &'a mut [u8]) -> Self {
        let mut segments = Vec::with_capacity(1);
        segments.push(buffer);
        Self::read(start_sector, segments)
    }

    /// Single-buffer write.
    pub fn write_from(start_sector: u64, buffer: &'a [u8]) -> Self {
        let mut segments = Vec::with_capacity(1);
        segments.push(buffer);
        Self::write(start_sector, segments)
    }

    pub fn direction(&self) -> Direction {
        match self.segments {
            Segments::Read(_) => Direction::Read,
            Segments::Write(_) => Direction::Write,
        }
    }

    pub fn start_sector(&self) -> u64 {
        self.start_sector
    }

    pub fn segment_count(&self) -> usize {
        match &self.segments {
            Segments::Read(s) => s.len(),
            Segments::Write(s) => s.len(),
        }
    }

    /// Byte length of each segment, in order.
    pub fn segment_lengths(&self) -> Vec<usize> {
        match &self.segments {
            Segments::Read(s) => s.iter().map(|b| b.len()).collect(),
            Segments::Write(s) => s.iter().map(|b| b.len()).collect(),
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.segment_lengths().iter().sum()
    }

    pub(crate) fn into_segments(self) -> Segments<'a> {
        self.segments
    }
}
