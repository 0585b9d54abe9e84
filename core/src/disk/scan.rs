// MBR/EBR partition scanning

use core::fmt;

use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

use super::boot_record::{has_boot_signature, read_partition_table, BootSector, BOOT_RECORD_SIZE};
use super::entry::PartitionEntry;
use super::partition::{PartitionInfo, PartitionList, FIRST_LOGICAL_INDEX};
use crate::log_warn;

/// Upper bound on EBRs followed, so a looping chain terminates.
pub const MAX_CHAIN_LENGTH: usize = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanError {
    IoError,
    /// Sector 0 does not end in 0xAA55.
    NoBootSignature,
    /// An EBR link points at a sector without a boot signature.
    BrokenChain { lba: u64 },
    /// An EBR link points past the end of the device.
    LinkOutOfRange { lba: u64 },
    /// More EBRs than `MAX_CHAIN_LENGTH`.
    ChainTooLong,
    /// More partitions than a `PartitionList` holds.
    TableFull,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError => write!(f, "block I/O error"),
            Self::NoBootSignature => write!(f, "no boot signature in sector 0"),
            Self::BrokenChain { lba } => write!(f, "no EBR at LBA {}", lba),
            Self::LinkOutOfRange { lba } => write!(f, "EBR link to LBA {} beyond device", lba),
            Self::ChainTooLong => write!(f, "EBR chain too long"),
            Self::TableFull => write!(f, "partition list full"),
        }
    }
}

fn read_boot_sector<B: BlockIo>(block_io: &mut B, lba: u64) -> Result<BootSector, ScanError> {
    let mut sector = [0u8; BOOT_RECORD_SIZE];
    block_io
        .read_blocks(Lba(lba), &mut sector)
        .map_err(|_| ScanError::IoError)?;
    Ok(sector)
}

fn push(list: &mut PartitionList, info: PartitionInfo) -> Result<(), ScanError> {
    list.add_partition(info).map_err(|_| ScanError::TableFull)
}

/// Read the MBR and follow the EBR chain of its extended partition.
///
/// Primary slots are reported as partitions 1-4 (the extended container
/// included), logical partitions from 5 on with disk-absolute LBAs.
pub fn scan_partitions<B: BlockIo>(block_io: &mut B) -> Result<PartitionList, ScanError> {
    let num_blocks = block_io.num_blocks().map_err(|_| ScanError::IoError)?;

    let mbr = read_boot_sector(block_io, 0)?;
    if !has_boot_signature(&mbr) {
        return Err(ScanError::NoBootSignature);
    }

    let mut list = PartitionList::new();
    let mut extended: Option<PartitionEntry> = None;

    for (slot, entry) in read_partition_table(&mbr).used() {
        push(
            &mut list,
            PartitionInfo {
                index: slot as u32 + 1,
                partition_type: entry.kind(),
                start_lba: entry.lba_start as u64,
                sector_count: entry.sector_count as u64,
                logical: false,
            },
        )?;
        if entry.kind().is_extended() && extended.is_none() {
            extended = Some(*entry);
        }
    }

    if let Some(container) = extended {
        walk_chain(block_io, &container, num_blocks, &mut list)?;
    }

    Ok(list)
}

fn walk_chain<B: BlockIo>(
    block_io: &mut B,
    container: &PartitionEntry,
    num_blocks: u64,
    list: &mut PartitionList,
) -> Result<(), ScanError> {
    let base = container.lba_start as u64;
    let mut ebr_lba = base;
    let mut next_index = FIRST_LOGICAL_INDEX;

    for _ in 0..MAX_CHAIN_LENGTH {
        if ebr_lba >= num_blocks {
            return Err(ScanError::LinkOutOfRange { lba: ebr_lba });
        }

        let ebr = read_boot_sector(block_io, ebr_lba)?;
        if !has_boot_signature(&ebr) {
            return Err(ScanError::BrokenChain { lba: ebr_lba });
        }

        let table = read_partition_table(&ebr);
        let logical = table.entries[0];
        if logical.is_used() {
            push(
                list,
                PartitionInfo {
                    index: next_index,
                    partition_type: logical.kind(),
                    start_lba: ebr_lba + logical.lba_start as u64,
                    sector_count: logical.sector_count as u64,
                    logical: true,
                },
            )?;
            next_index += 1;
        } else {
            log_warn!("scan: EBR at LBA {} has no logical partition", ebr_lba);
        }

        let link = table.entries[1];
        if !(link.is_used() && link.kind().is_extended()) {
            return Ok(());
        }
        ebr_lba = base + link.lba_start as u64;
    }

    Err(ScanError::ChainTooLong)
}
