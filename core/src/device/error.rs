use core::fmt;

use crate::disk::BootRecordError;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Backing store could not be set up.
    Store(StoreError),
    /// Partition layout could not be written.
    BootRecord(BootRecordError),
    /// `release` without a matching `open`.
    NotOpen,
}

impl DeviceError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Store(_) => "Sector store error",
            Self::BootRecord(_) => "Boot record error",
            Self::NotOpen => "Device is not open",
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{}: {}", self.as_str(), e),
            Self::BootRecord(e) => write!(f, "{}: {}", self.as_str(), e),
            Self::NotOpen => f.write_str(self.as_str()),
        }
    }
}

impl From<StoreError> for DeviceError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<BootRecordError> for DeviceError {
    fn from(e: BootRecordError) -> Self {
        Self::BootRecord(e)
    }
}

pub type DeviceResult<T> = Result<T, DeviceError>;
