//! MBR/EBR partition entries.
//!
//! A partition table is four 16-byte entries:
//!
//! ```text
//! 0      boot flag (0x00 inactive, 0x80 active)
//! 1..4   start CHS (packed)
//! 4      partition type
//! 5..8   end CHS (packed)
//! 8..12  first LBA, little-endian
//! 12..16 sector count, little-endian
//! ```
//!
//! Entries are serialized field by field; the in-memory struct layout is
//! never reinterpreted as bytes.

use super::chs::Chs;

pub const ENTRY_SIZE: usize = 16;
pub const TABLE_ENTRIES: usize = 4;
pub const TABLE_SIZE: usize = ENTRY_SIZE * TABLE_ENTRIES;

pub const BOOT_INACTIVE: u8 = 0x00;
pub const BOOT_ACTIVE: u8 = 0x80;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartitionType {
    Empty,
    /// 0x05, extended partition addressed by CHS.
    ExtendedChs,
    /// 0x07, NTFS/exFAT.
    Ntfs,
    /// 0x0C, FAT32 addressed by LBA.
    Fat32Lba,
    /// 0x0F, extended partition addressed by LBA.
    ExtendedLba,
    Unknown(u8),
}

impl PartitionType {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Empty,
            0x05 => Self::ExtendedChs,
            0x07 => Self::Ntfs,
            0x0C => Self::Fat32Lba,
            0x0F => Self::ExtendedLba,
            other => Self::Unknown(other),
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            Self::Empty => 0x00,
            Self::ExtendedChs => 0x05,
            Self::Ntfs => 0x07,
            Self::Fat32Lba => 0x0C,
            Self::ExtendedLba => 0x0F,
            Self::Unknown(code) => *code,
        }
    }

    pub const fn is_extended(&self) -> bool {
        matches!(self, Self::ExtendedChs | Self::ExtendedLba)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::ExtendedChs => "Extended (CHS)",
            Self::Ntfs => "NTFS/exFAT",
            Self::Fat32Lba => "FAT32 (LBA)",
            Self::ExtendedLba => "Extended (LBA)",
            Self::Unknown(_) => "Unknown",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartitionEntry {
    pub boot_flag: u8,
    pub start: Chs,
    pub partition_type: u8,
    pub end: Chs,
    pub lba_start: u32,
    pub sector_count: u32,
}

impl Default for PartitionEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartitionEntry {
    pub const EMPTY: Self = Self {
        boot_flag: BOOT_INACTIVE,
        start: Chs::ZERO,
        partition_type: 0,
        end: Chs::ZERO,
        lba_start: 0,
        sector_count: 0,
    };

    /// Inactive entry.
    pub const fn new(
        kind: PartitionType,
        start: Chs,
        end: Chs,
        lba_start: u32,
        sector_count: u32,
    ) -> Self {
        Self {
            boot_flag: BOOT_INACTIVE,
            start,
            partition_type: kind.code(),
            end,
            lba_start,
            sector_count,
        }
    }

    pub const fn kind(&self) -> PartitionType {
        PartitionType::from_code(self.partition_type)
    }

    pub const fn is_used(&self) -> bool {
        self.partition_type != 0 && self.sector_count > 0
    }

    pub const fn is_active(&self) -> bool {
        self.boot_flag == BOOT_ACTIVE
    }

    /// Last sector covered, relative to the same base as `lba_start`.
    pub const fn lba_end(&self) -> u64 {
        self.lba_start as u64 + self.sector_count.saturating_sub(1) as u64
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut bytes = [0u8; ENTRY_SIZE];
        bytes[0] = self.boot_flag;
        bytes[1..4].copy_from_slice(&self.start.encode());
        bytes[4] = self.partition_type;
        bytes[5..8].copy_from_slice(&self.end.encode());
        bytes[8..12].copy_from_slice(&self.lba_start.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.sector_count.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; ENTRY_SIZE]) -> Self {
        Self {
            boot_flag: bytes[0],
            start: Chs::decode([bytes[1], bytes[2], bytes[3]]),
            partition_type: bytes[4],
            end: Chs::decode([bytes[5], bytes[6], bytes[7]]),
            lba_start: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            sector_count: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }

    /// Check the CHS fields against the LBA fields. `base` is the sector the
    /// entry's `lba_start` is relative to (0 for the MBR).
    pub fn chs_matches_lba(&self, base: u32) -> bool {
        if !self.is_used() {
            return *self == Self::EMPTY;
        }
        let first = base.checked_add(self.lba_start);
        let last = u32::try_from(base as u64 + self.lba_end()).ok();
        match (first, last) {
            (Some(first), Some(last)) => {
                self.start.to_lba() == Some(first) && self.end.to_lba() == Some(last)
            }
            _ => false,
        }
    }
}

/// The four-slot table stored at offset 446 of every boot sector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionTable {
    pub entries: [PartitionEntry; TABLE_ENTRIES],
}

impl PartitionTable {
    pub const EMPTY: Self = Self {
        entries: [PartitionEntry::EMPTY; TABLE_ENTRIES],
    };

    pub const fn new(entries: [PartitionEntry; TABLE_ENTRIES]) -> Self {
        Self { entries }
    }

    pub fn used(&self) -> impl Iterator<Item = (usize, &PartitionEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| e.is_used())
    }

    pub fn to_bytes(&self) -> [u8; TABLE_SIZE] {
        let mut bytes = [0u8; TABLE_SIZE];
        for (slot, entry) in self.entries.iter().enumerate() {
            let offset = slot * ENTRY_SIZE;
            bytes[offset..offset + ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8; TABLE_SIZE]) -> Self {
        let mut table = Self::EMPTY;
        for (slot, chunk) in bytes.chunks_exact(ENTRY_SIZE).enumerate() {
            let mut raw = [0u8; ENTRY_SIZE];
            raw.copy_from_slice(chunk);
            table.entries[slot] = PartitionEntry::from_bytes(&raw);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_byte_layout() {
        let entry = PartitionEntry::new(
            PartitionType::ExtendedLba,
            Chs::new(10, 0, 1),
            Chs::new(19, 0, 32),
            0x140,
            0x140,
        );
        assert_eq!(
            entry.to_bytes(),
            [
                0x00, 0x00, 0x01, 0x0A, 0x0F, 0x00, 0x20, 0x13, 0x40, 0x01, 0x00, 0x00, 0x40,
                0x01, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn test_active_flag_and_high_cylinder() {
        let mut entry = PartitionEntry::new(
            PartitionType::Fat32Lba,
            Chs::new(0x300, 0, 1),
            Chs::new(0x3FF, 0, 32),
            0x0001_8000,
            0x2000,
        );
        entry.boot_flag = BOOT_ACTIVE;
        let bytes = entry.to_bytes();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(bytes[2], 0xC1);
        assert_eq!(bytes[3], 0x00);
        assert_eq!(bytes[6], 0xE0);
        assert_eq!(bytes[7], 0xFF);
        assert!(PartitionEntry::from_bytes(&bytes).is_active());
        assert_eq!(PartitionEntry::from_bytes(&bytes), entry);
    }

    #[test]
    fn test_empty_entry_is_all_zero() {
        assert_eq!(PartitionEntry::EMPTY.to_bytes(), [0u8; ENTRY_SIZE]);
        assert!(!PartitionEntry::EMPTY.is_used());
        assert!(PartitionEntry::EMPTY.chs_matches_lba(0));
    }

    #[test]
    fn test_type_codes() {
        for code in [0x00, 0x05, 0x07, 0x0C, 0x0F, 0x83] {
            assert_eq!(PartitionType::from_code(code).code(), code);
        }
        assert!(PartitionType::from_code(0x05).is_extended());
        assert!(PartitionType::from_code(0x0F).is_extended());
        assert!(!PartitionType::from_code(0x0C).is_extended());
        assert_eq!(PartitionType::from_code(0x83), PartitionType::Unknown(0x83));
    }

    #[test]
    fn test_chs_consistency_check() {
        let good = PartitionEntry::new(
            PartitionType::Ntfs,
            Chs::new(10, 0, 2),
            Chs::new(13, 0, 32),
            1,
            127,
        );
        assert!(good.chs_matches_lba(320));
        assert!(!good.chs_matches_lba(0));

        let short = PartitionEntry { sector_count: 100, ..good };
        assert!(!short.chs_matches_lba(320));
    }

    #[test]
    fn test_extents_near_u32_max() {
        let mut raw = [0u8; ENTRY_SIZE];
        raw[4] = 0x07;
        raw[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        raw[12..16].copy_from_slice(&2u32.to_le_bytes());
        let entry = PartitionEntry::from_bytes(&raw);

        assert_eq!(entry.lba_end(), u32::MAX as u64 + 1);
        assert!(!entry.chs_matches_lba(0));
        assert!(!entry.chs_matches_lba(u32::MAX));
    }

    #[test]
    fn test_table_places_entries_in_slot_order() {
        let mut table = PartitionTable::EMPTY;
        table.entries[2] = PartitionEntry::new(
            PartitionType::Fat32Lba,
            Chs::new(20, 0, 1),
            Chs::new(23, 0, 32),
            640,
            128,
        );
        let bytes = table.to_bytes();
        assert!(bytes[..32].iter().all(|&b| b == 0));
        assert_eq!(bytes[32 + 4], 0x0C);
        assert!(bytes[48..].iter().all(|&b| b == 0));
        assert_eq!(PartitionTable::from_bytes(&bytes), table);
        assert_eq!(table.used().map(|(slot, _)| slot).collect::<Vec<_>>(), vec![2]);
    }
}
