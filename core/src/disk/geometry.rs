// Fixed disk geometry: 512-byte sectors, 32 sectors per track, 1 head

pub const SECTOR_SIZE: usize = 512;
pub const SECTORS_PER_TRACK: u32 = 32;
pub const HEADS: u32 = 1;
pub const SECTORS_PER_CYLINDER: u32 = SECTORS_PER_TRACK * HEADS;

/// Geometry reported to the host when it asks for one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub heads: u8,
    pub sectors: u8,
    pub cylinders: u16,
    pub start: u64,
}

impl Geometry {
    /// Geometry for a device of `total_sectors`, cylinder count saturating
    /// at `u16::MAX`.
    pub fn for_capacity(total_sectors: u64) -> Self {
        let cylinders = total_sectors / SECTORS_PER_CYLINDER as u64;
        Self {
            heads: HEADS as u8,
            sectors: SECTORS_PER_TRACK as u8,
            cylinders: u16::try_from(cylinders).unwrap_or(u16::MAX),
            start: 0,
        }
    }

    pub fn total_sectors(&self) -> u64 {
        self.cylinders as u64 * self.heads as u64 * self.sectors as u64
    }
}

/// First sector of a cylinder.
pub const fn cylinder_lba(cylinder: u32) -> u64 {
    cylinder as u64 * SECTORS_PER_CYLINDER as u64
}

/// Byte offset of a cylinder from the start of the device.
pub const fn cylinder_byte_offset(cylinder: u32) -> u64 {
    cylinder_lba(cylinder) * SECTOR_SIZE as u64
}
