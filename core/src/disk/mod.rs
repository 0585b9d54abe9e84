// Disk layout: geometry, partition records, boot sectors

pub mod boot_record;
pub mod chs;
pub mod entry;
pub mod geometry;
pub mod layout;
pub mod partition;
pub mod scan;

pub use boot_record::{
    build_boot_records, build_boot_sector, write_boot_records, BootRecordError, BootRecords,
    BootSector, Ebr, Timestamp,
};
pub use chs::Chs;
pub use entry::{PartitionEntry, PartitionTable, PartitionType};
pub use geometry::{Geometry, SECTORS_PER_CYLINDER, SECTOR_SIZE};
pub use partition::{PartitionInfo, PartitionList};
pub use scan::{scan_partitions, ScanError};
