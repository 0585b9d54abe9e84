// Common error type for block request dispatch

use core::fmt;

use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Segment length is not a whole number of sectors. Reported before any
    /// segment of the request is transferred.
    MalformedSegment { index: usize, len: usize },
    /// The store rejected a segment; later segments were not attempted.
    Store { index: usize, error: StoreError },
}

impl DispatchError {
    pub const fn segment(&self) -> usize {
        match self {
            Self::MalformedSegment { index, .. } | Self::Store { index, .. } => *index,
        }
    }

    pub const fn is_bounds(&self) -> bool {
        matches!(
            self,
            Self::Store {
                error: StoreError::OutOfBounds { .. },
                ..
            }
        )
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSegment { index, len } => {
                write!(f, "segment {}: {} bytes is not a whole number of sectors", index, len)
            }
            Self::Store { index, error } => write!(f, "segment {}: {}", index, error),
        }
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
