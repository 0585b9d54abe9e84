//! The fixed partition layout written at bring-up.
//!
//! 32 cylinders of 32 sectors (1024 sectors, 512 KiB):
//!
//! ```text
//! cyl  0- 9  FAT32    LBA   1..319  (sector 0 is the MBR)
//! cyl 10-19  extended LBA 320..639
//!   cyl 10-13  EBR @320, NTFS 321..447
//!   cyl 14-17  EBR @448, NTFS 449..575
//!   cyl 18-19  EBR @576, NTFS 577..639
//! cyl 20-23  FAT32    LBA 640..767
//! cyl 24-31  FAT32    LBA 768..1023
//! ```
//!
//! Logical entries are relative to their own EBR; link entries are relative
//! to the start of the extended partition.

use super::chs::Chs;
use super::entry::{PartitionEntry, PartitionTable, PartitionType};
use super::geometry::cylinder_lba;

pub const LOGICAL_PARTITIONS: usize = 3;

/// Cylinder holding each EBR, in chain order.
pub const EBR_CYLINDERS: [u32; LOGICAL_PARTITIONS] = [0x0A, 0x0E, 0x12];

/// Slot of the extended partition in the primary table.
pub const EXTENDED_SLOT: usize = 1;

pub const PRIMARY_TABLE: PartitionTable = PartitionTable::new([
    PartitionEntry::new(
        PartitionType::Fat32Lba,
        Chs::new(0x00, 0, 0x02),
        Chs::new(0x09, 0, 0x20),
        0x0000_0001,
        0x0000_013F,
    ),
    PartitionEntry::new(
        PartitionType::ExtendedLba,
        Chs::new(0x0A, 0, 0x01),
        Chs::new(0x13, 0, 0x20),
        0x0000_0140,
        0x0000_0140,
    ),
    PartitionEntry::new(
        PartitionType::Fat32Lba,
        Chs::new(0x14, 0, 0x01),
        Chs::new(0x17, 0, 0x20),
        0x0000_0280,
        0x0000_0080,
    ),
    PartitionEntry::new(
        PartitionType::Fat32Lba,
        Chs::new(0x18, 0, 0x01),
        Chs::new(0x1F, 0, 0x20),
        0x0000_0300,
        0x0000_0100,
    ),
]);

pub const LOGICAL_TABLES: [PartitionTable; LOGICAL_PARTITIONS] = [
    PartitionTable::new([
        PartitionEntry::new(
            PartitionType::Ntfs,
            Chs::new(0x0A, 0, 0x02),
            Chs::new(0x0D, 0, 0x20),
            0x0000_0001,
            0x0000_007F,
        ),
        PartitionEntry::new(
            PartitionType::ExtendedChs,
            Chs::new(0x0E, 0, 0x01),
            Chs::new(0x11, 0, 0x20),
            0x0000_0080,
            0x0000_0080,
        ),
        PartitionEntry::EMPTY,
        PartitionEntry::EMPTY,
    ]),
    PartitionTable::new([
        PartitionEntry::new(
            PartitionType::Ntfs,
            Chs::new(0x0E, 0, 0x02),
            Chs::new(0x11, 0, 0x20),
            0x0000_0001,
            0x0000_007F,
        ),
        PartitionEntry::new(
            PartitionType::ExtendedChs,
            Chs::new(0x12, 0, 0x01),
            Chs::new(0x13, 0, 0x20),
            0x0000_0100,
            0x0000_0040,
        ),
        PartitionEntry::EMPTY,
        PartitionEntry::EMPTY,
    ]),
    PartitionTable::new([
        PartitionEntry::new(
            PartitionType::Ntfs,
            Chs::new(0x12, 0, 0x02),
            Chs::new(0x13, 0, 0x20),
            0x0000_0001,
            0x0000_003F,
        ),
        PartitionEntry::EMPTY,
        PartitionEntry::EMPTY,
        PartitionEntry::EMPTY,
    ]),
];

/// Disk-absolute LBA of the extended partition.
pub const fn extended_base() -> u32 {
    PRIMARY_TABLE.entries[EXTENDED_SLOT].lba_start
}

/// Disk-absolute LBA of each EBR.
pub const fn ebr_lba(chain_index: usize) -> u64 {
    cylinder_lba(EBR_CYLINDERS[chain_index])
}

/// Smallest device, in sectors, that holds every boot sector and every
/// partition of the layout.
pub fn required_sectors() -> u64 {
    let primary_end = PRIMARY_TABLE
        .used()
        .map(|(_, e)| e.lba_start as u64 + e.sector_count as u64)
        .max()
        .unwrap_or(1);
    let ebr_end = EBR_CYLINDERS
        .iter()
        .map(|&cyl| cylinder_lba(cyl) + 1)
        .max()
        .unwrap_or(1);
    primary_end.max(ebr_end)
}
