// Partition information as seen by a partition-aware reader of the device

use super::entry::PartitionType;
use super::geometry::SECTOR_SIZE;

pub const MAX_PARTITIONS: usize = 16;

/// First index handed to logical partitions (1-4 are the primary slots).
pub const FIRST_LOGICAL_INDEX: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartitionInfo {
    /// 1-4 for primary slots, 5 and up for logical partitions in chain order.
    pub index: u32,
    pub partition_type: PartitionType,
    /// Disk-absolute first sector.
    pub start_lba: u64,
    pub sector_count: u64,
    pub logical: bool,
}

impl PartitionInfo {
    pub fn end_lba(&self) -> u64 {
        self.start_lba + self.sector_count.saturating_sub(1)
    }

    pub fn size_kb(&self) -> u64 {
        (self.sector_count * SECTOR_SIZE as u64) / 1024
    }

    pub fn type_name(&self) -> &'static str {
        self.partition_type.type_name()
    }
}

/// Partitions found on a disk
#[derive(Debug)]
pub struct PartitionList {
    partitions: [Option<PartitionInfo>; MAX_PARTITIONS],
    count: usize,
}

impl PartitionList {
    pub const fn new() -> Self {
        Self {
            partitions: [None; MAX_PARTITIONS],
            count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.partitions = [None; MAX_PARTITIONS];
        self.count = 0;
    }

    pub fn add_partition(&mut self, info: PartitionInfo) -> Result<(), PartitionInfo> {
        if self.count >= MAX_PARTITIONS {
            return Err(info);
        }

        self.partitions[self.count] = Some(info);
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get(&self, index: usize) -> Option<&PartitionInfo> {
        if index < self.count {
            self.partitions[index].as_ref()
        } else {
            None
        }
    }

    /// Look up by partition number (1-based, as in `PartitionInfo::index`).
    pub fn by_index(&self, index: u32) -> Option<&PartitionInfo> {
        self.iter().find(|p| p.index == index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartitionInfo> {
        self.partitions[..self.count]
            .iter()
            .filter_map(|p| p.as_ref())
    }

    pub fn logical(&self) -> impl Iterator<Item = &PartitionInfo> {
        self.iter().filter(|p| p.logical)
    }
}
