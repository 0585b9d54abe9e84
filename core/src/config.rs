//! RAM disk configuration.
//!
//! Runtime knobs for a device instance. The partition layout itself is
//! fixed at compile time (see `disk::layout`).

/// Capacity matching the fixed layout: 32 cylinders of 32 sectors.
pub const DEFAULT_TOTAL_SECTORS: u64 = 1024;

/// Hour adjustment applied to boot record timestamps.
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = -4;

pub const DEFAULT_DISK_NAME: &str = "mydisk";
pub const DEFAULT_FIRST_MINOR: u32 = 0;
pub const DEFAULT_MINOR_COUNT: u32 = 16;

/// Device configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamDiskConfig {
    /// Capacity of the backing store in 512-byte sectors.
    pub total_sectors: u64,
    /// Local time offset used when stamping boot records.
    pub utc_offset_hours: i8,
    /// Name the host sees for the disk node.
    pub disk_name: &'static str,
    /// First minor number of the disk node.
    pub first_minor: u32,
    /// Minor numbers reserved for the disk and its partitions.
    pub minor_count: u32,
}

impl Default for RamDiskConfig {
    fn default() -> Self {
        Self {
            total_sectors: DEFAULT_TOTAL_SECTORS,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            disk_name: DEFAULT_DISK_NAME,
            first_minor: DEFAULT_FIRST_MINOR,
            minor_count: DEFAULT_MINOR_COUNT,
        }
    }
}

impl RamDiskConfig {
    /// Create config with a specific capacity.
    pub fn with_sectors(total_sectors: u64) -> Self {
        Self {
            total_sectors,
            ..Default::default()
        }
    }

    /// Set capacity in sectors.
    pub fn sectors(mut self, total_sectors: u64) -> Self {
        self.total_sectors = total_sectors;
        self
    }

    /// Set the timestamp hour offset.
    pub fn utc_offset(mut self, hours: i8) -> Self {
        self.utc_offset_hours = hours;
        self
    }

    /// Set the disk node name.
    pub fn name(mut self, name: &'static str) -> Self {
        self.disk_name = name;
        self
    }

    /// Set the minor number range.
    pub fn minors(mut self, first: u32, count: u32) -> Self {
        self.first_minor = first;
        self.minor_count = count;
        self
    }

    /// Capacity in bytes, if it fits in a u64.
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_sectors.checked_mul(crate::disk::SECTOR_SIZE as u64)
    }
}
