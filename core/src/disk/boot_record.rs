//! Boot sector images (MBR and EBRs) for the fixed layout.
//!
//! Every boot sector shares one byte layout:
//!
//! ```text
//! 220      original physical drive
//! 221..224 creation time: second, minute, hour
//! 440..444 disk signature (LE)
//! 446..510 partition table
//! 510..512 0xAA55 (LE: 55 AA)
//! ```

use core::fmt;

use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

use super::entry::{PartitionTable, TABLE_SIZE};
use super::geometry::{cylinder_byte_offset, cylinder_lba, SECTOR_SIZE};
use super::layout::{self, EBR_CYLINDERS, LOGICAL_PARTITIONS, LOGICAL_TABLES, PRIMARY_TABLE};
use crate::{log_debug, log_error, log_info};

pub const BOOT_RECORD_SIZE: usize = SECTOR_SIZE;

pub const DRIVE_MARKER_OFFSET: usize = 220;
pub const SECOND_OFFSET: usize = 221;
pub const MINUTE_OFFSET: usize = 222;
pub const HOUR_OFFSET: usize = 223;
pub const DISK_SIGNATURE_OFFSET: usize = 440;
pub const PARTITION_TABLE_OFFSET: usize = 446;
pub const BOOT_SIGNATURE_OFFSET: usize = 510;

pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Static disk signature stamped into every boot sector.
pub const DISK_SIGNATURE: u32 = 0x0999_9999;

/// Original physical drive number (first hard disk beyond the BIOS ones).
pub const ORIGINAL_DRIVE: u8 = 0x85;

pub type BootSector = [u8; BOOT_RECORD_SIZE];

/// Creation time stamped into boot sectors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
}

impl Timestamp {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            second,
            minute,
            hour,
        }
    }

    /// Split seconds since the epoch into second/minute/hour, shifting the
    /// hour by `utc_offset_hours` and wrapping it back into 0..24.
    pub fn from_unix_seconds(seconds: u64, utc_offset_hours: i8) -> Self {
        let second = (seconds % 60) as u8;
        let minutes = seconds / 60;
        let minute = (minutes % 60) as u8;
        let hours = (minutes / 60) % 24;
        let hour = (hours as i64 + utc_offset_hours as i64).rem_euclid(24) as u8;
        Self {
            second,
            minute,
            hour,
        }
    }

    #[cfg(any(test, feature = "std"))]
    pub fn now(utc_offset_hours: i8) -> Self {
        let seconds = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix_seconds(seconds, utc_offset_hours)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Render one boot sector around `table`.
pub fn build_boot_sector(table: &PartitionTable, timestamp: Timestamp) -> BootSector {
    let mut sector = [0u8; BOOT_RECORD_SIZE];

    sector[DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4]
        .copy_from_slice(&DISK_SIGNATURE.to_le_bytes());

    sector[PARTITION_TABLE_OFFSET..PARTITION_TABLE_OFFSET + TABLE_SIZE]
        .copy_from_slice(&table.to_bytes());

    sector[DRIVE_MARKER_OFFSET] = ORIGINAL_DRIVE;
    sector[SECOND_OFFSET] = timestamp.second;
    sector[MINUTE_OFFSET] = timestamp.minute;
    sector[HOUR_OFFSET] = timestamp.hour;

    sector[BOOT_SIGNATURE_OFFSET..BOOT_SIGNATURE_OFFSET + 2]
        .copy_from_slice(&BOOT_SIGNATURE.to_le_bytes());

    sector
}

/// Whether `sector` carries the 0xAA55 boot signature.
pub fn has_boot_signature(sector: &[u8]) -> bool {
    sector.len() >= BOOT_RECORD_SIZE
        && u16::from_le_bytes([
            sector[BOOT_SIGNATURE_OFFSET],
            sector[BOOT_SIGNATURE_OFFSET + 1],
        ]) == BOOT_SIGNATURE
}

/// Partition table of a boot sector.
pub fn read_partition_table(sector: &BootSector) -> PartitionTable {
    let mut raw = [0u8; TABLE_SIZE];
    raw.copy_from_slice(&sector[PARTITION_TABLE_OFFSET..PARTITION_TABLE_OFFSET + TABLE_SIZE]);
    PartitionTable::from_bytes(&raw)
}

/// An EBR image and the cylinder it is placed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ebr {
    pub cylinder: u32,
    pub image: BootSector,
}

impl Ebr {
    pub fn lba(&self) -> u64 {
        cylinder_lba(self.cylinder)
    }

    pub fn byte_offset(&self) -> u64 {
        cylinder_byte_offset(self.cylinder)
    }
}

/// MBR plus one EBR per logical partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootRecords {
    pub mbr: BootSector,
    pub ebrs: [Ebr; LOGICAL_PARTITIONS],
}

impl BootRecords {
    /// Every image with its target LBA, MBR first.
    pub fn placements(&self) -> impl Iterator<Item = (u64, &BootSector)> {
        core::iter::once((0u64, &self.mbr)).chain(self.ebrs.iter().map(|e| (e.lba(), &e.image)))
    }
}

pub fn build_mbr(timestamp: Timestamp) -> BootSector {
    build_boot_sector(&PRIMARY_TABLE, timestamp)
}

pub fn build_ebrs(timestamp: Timestamp) -> [Ebr; LOGICAL_PARTITIONS] {
    core::array::from_fn(|i| Ebr {
        cylinder: EBR_CYLINDERS[i],
        image: build_boot_sector(&LOGICAL_TABLES[i], timestamp),
    })
}

pub fn build_boot_records(timestamp: Timestamp) -> BootRecords {
    BootRecords {
        mbr: build_mbr(timestamp),
        ebrs: build_ebrs(timestamp),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootRecordError {
    /// Device cannot hold the whole layout; nothing was written.
    DeviceTooSmall { required: u64, available: u64 },
    /// Block device has a sector size other than 512 bytes.
    InvalidBlockSize,
    /// Block I/O operation failed
    IoError,
}

impl BootRecordError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceTooSmall { .. } => "Device too small for partition layout",
            Self::InvalidBlockSize => "Unsupported block size",
            Self::IoError => "Block I/O operation failed",
        }
    }
}

impl fmt::Display for BootRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceTooSmall {
                required,
                available,
            } => write!(
                f,
                "{} ({} sectors needed, {} available)",
                self.as_str(),
                required,
                available
            ),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Write the MBR at LBA 0 and every EBR on its cylinder.
///
/// Capacity is checked against the whole layout before the first write, so
/// a device that is too small is left untouched.
pub fn write_boot_records<B: BlockIo>(
    block_io: &mut B,
    timestamp: Timestamp,
) -> Result<BootRecords, BootRecordError> {
    if block_io.block_size().to_u32() != BOOT_RECORD_SIZE as u32 {
        return Err(BootRecordError::InvalidBlockSize);
    }

    let available = block_io
        .num_blocks()
        .map_err(|_| BootRecordError::IoError)?;
    let required = layout::required_sectors();
    if available < required {
        log_error!(
            "boot records: device has {} sectors, layout needs {}",
            available,
            required
        );
        return Err(BootRecordError::DeviceTooSmall {
            required,
            available,
        });
    }

    let records = build_boot_records(timestamp);
    for (lba, image) in records.placements() {
        block_io
            .write_blocks(Lba(lba), image)
            .map_err(|_| BootRecordError::IoError)?;
        log_debug!("boot records: wrote boot sector at LBA {}", lba);
    }
    block_io.flush().map_err(|_| BootRecordError::IoError)?;

    log_info!(
        "boot records: MBR + {} EBRs written, stamped {}",
        records.ebrs.len(),
        timestamp
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: Timestamp = Timestamp::new(13, 45, 7);

    #[test]
    fn test_mbr_fixed_fields() {
        let mbr = build_mbr(STAMP);
        assert_eq!(mbr.len(), 512);
        assert_eq!(&mbr[510..512], &[0x55, 0xAA]);
        assert_eq!(&mbr[440..444], &[0x99, 0x99, 0x99, 0x09]);
        assert_eq!(mbr[220], ORIGINAL_DRIVE);
        assert_eq!(&mbr[221..224], &[7, 45, 13]);
        assert_eq!(&mbr[446..510], &PRIMARY_TABLE.to_bytes()[..]);
    }

    #[test]
    fn test_untouched_bytes_stay_zero() {
        let mbr = build_mbr(STAMP);
        let written = [
            220..224,
            DISK_SIGNATURE_OFFSET..DISK_SIGNATURE_OFFSET + 4,
            PARTITION_TABLE_OFFSET..BOOT_RECORD_SIZE,
        ];
        for (i, &b) in mbr.iter().enumerate() {
            if !written.iter().any(|r| r.contains(&i)) {
                assert_eq!(b, 0, "byte {} not zero", i);
            }
        }
    }

    #[test]
    fn test_mbr_has_four_entries() {
        let mbr = build_mbr(STAMP);
        let table = read_partition_table(&mbr);
        assert_eq!(table.entries.len(), 4);
        assert_eq!(table, PRIMARY_TABLE);
        assert_eq!(table.used().count(), 4);
    }

    #[test]
    fn test_ebr_placement_and_fields() {
        let ebrs = build_ebrs(STAMP);
        let offsets: Vec<u64> = ebrs.iter().map(|e| e.byte_offset()).collect();
        assert_eq!(offsets, vec![163_840, 229_376, 294_912]);

        for (i, ebr) in ebrs.iter().enumerate() {
            assert_eq!(ebr.cylinder, EBR_CYLINDERS[i]);
            assert_eq!(ebr.lba() * 512, ebr.byte_offset());
            assert!(has_boot_signature(&ebr.image));
            assert_eq!(&ebr.image[221..224], &[7, 45, 13]);
            assert_eq!(read_partition_table(&ebr.image), LOGICAL_TABLES[i]);
        }
    }

    #[test]
    fn test_unused_ebr_slots_are_zero() {
        let ebrs = build_ebrs(STAMP);
        let last = &ebrs[LOGICAL_PARTITIONS - 1].image;
        assert!(last[446 + 16..510].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_timestamp_derivation() {
        // 1_700_000_000 = 2023-11-14 22:13:20 UTC
        let ts = Timestamp::from_unix_seconds(1_700_000_000, 0);
        assert_eq!(ts, Timestamp::new(22, 13, 20));

        let shifted = Timestamp::from_unix_seconds(1_700_000_000, -4);
        assert_eq!(shifted.hour, 18);
    }

    #[test]
    fn test_timestamp_hour_wraps() {
        // 02:00:00 UTC shifted back four hours is 22:00
        let ts = Timestamp::from_unix_seconds(2 * 3600, -4);
        assert_eq!(ts, Timestamp::new(22, 0, 0));

        let ts = Timestamp::from_unix_seconds(23 * 3600, 3);
        assert_eq!(ts.hour, 2);
    }

    #[test]
    fn test_timestamp_now_in_range() {
        let ts = Timestamp::now(-4);
        assert!(ts.second < 60 && ts.minute < 60 && ts.hour < 24);
    }

    #[test]
    fn test_signature_check() {
        let mut sector = [0u8; 512];
        assert!(!has_boot_signature(&sector));
        sector[510] = 0x55;
        sector[511] = 0xAA;
        assert!(has_boot_signature(&sector));
        assert!(!has_boot_signature(&sector[..511]));
    }

    #[test]
    fn test_placements_order() {
        let records = build_boot_records(STAMP);
        let lbas: Vec<u64> = records.placements().map(|(lba, _)| lba).collect();
        assert_eq!(lbas, vec![0, 320, 448, 576]);
    }
}
