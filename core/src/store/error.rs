//! Sector store error types

use core::fmt;

/// Errors reported by a sector store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Backing memory could not be allocated for the requested capacity
    Capacity { sectors: u64 },
    /// Access past the last sector
    OutOfBounds { sector: u64, count: u64, total: u64 },
    /// Caller buffer shorter than `count` sectors
    BufferTooSmall { needed: usize, actual: usize },
    /// Buffer length is not a whole number of sectors
    UnalignedBuffer { len: usize },
    /// Store used before `init` or after `cleanup`
    NotInitialized,
}

impl StoreError {
    /// Get a human-readable description of the error
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Capacity { .. } => "Cannot allocate backing memory",
            Self::OutOfBounds { .. } => "Sector range beyond device capacity",
            Self::BufferTooSmall { .. } => "Buffer too small for sector count",
            Self::UnalignedBuffer { .. } => "Buffer is not a whole number of sectors",
            Self::NotInitialized => "Sector store not initialized",
        }
    }

    pub const fn is_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity { sectors } => write!(f, "{} ({} sectors)", self.as_str(), sectors),
            Self::OutOfBounds {
                sector,
                count,
                total,
            } => write!(
                f,
                "{}: {}+{} > {}",
                self.as_str(),
                sector,
                count,
                total
            ),
            Self::BufferTooSmall { needed, actual } => {
                write!(f, "{} ({} < {} bytes)", self.as_str(), actual, needed)
            }
            Self::UnalignedBuffer { len } => write!(f, "{} ({} bytes)", self.as_str(), len),
            Self::NotInitialized => f.write_str(self.as_str()),
        }
    }
}

/// Result type for sector store operations
pub type StoreResult<T> = Result<T, StoreError>;
