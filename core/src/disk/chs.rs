//! Packed CHS (cylinder/head/sector) addresses.
//!
//! On disk a CHS address takes three bytes:
//!
//! ```text
//! byte 0: head
//! byte 1: sector (bits 0-5) | cylinder bits 8-9 (bits 6-7)
//! byte 2: cylinder bits 0-7
//! ```
//!
//! Conversions to and from LBA use the fixed geometry in `geometry`.

use super::geometry::{SECTORS_PER_CYLINDER, SECTORS_PER_TRACK};

const SECTOR_MASK: u8 = 0x3F;
const CYLINDER_HIGH_MASK: u16 = 0x0300;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Chs {
    pub cylinder: u16,
    pub head: u8,
    /// 1-based; 0 only appears in an unused entry.
    pub sector: u8,
}

impl Chs {
    pub const MAX_CYLINDER: u16 = 1023;
    pub const MAX_SECTOR: u8 = 63;

    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(cylinder: u16, head: u8, sector: u8) -> Self {
        Self {
            cylinder,
            head,
            sector,
        }
    }

    pub const fn encode(self) -> [u8; 3] {
        let cyl_high = ((self.cylinder & CYLINDER_HIGH_MASK) >> 8) as u8;
        [
            self.head,
            (self.sector & SECTOR_MASK) | (cyl_high << 6),
            (self.cylinder & 0xFF) as u8,
        ]
    }

    pub const fn decode(bytes: [u8; 3]) -> Self {
        let cyl_high = ((bytes[1] >> 6) as u16) << 8;
        Self {
            cylinder: cyl_high | bytes[2] as u16,
            head: bytes[0],
            sector: bytes[1] & SECTOR_MASK,
        }
    }

    /// CHS for a disk-absolute LBA, or `None` past cylinder 1023.
    pub const fn from_lba(lba: u32) -> Option<Self> {
        let cylinder = lba / SECTORS_PER_CYLINDER;
        if cylinder > Self::MAX_CYLINDER as u32 {
            return None;
        }
        let within = lba % SECTORS_PER_CYLINDER;
        Some(Self {
            cylinder: cylinder as u16,
            head: (within / SECTORS_PER_TRACK) as u8,
            sector: (within % SECTORS_PER_TRACK) as u8 + 1,
        })
    }

    /// Disk-absolute LBA, or `None` when the address is not valid for the
    /// geometry.
    pub const fn to_lba(self) -> Option<u32> {
        if self.sector == 0 || self.sector as u32 > SECTORS_PER_TRACK {
            return None;
        }
        if self.head as u32 >= SECTORS_PER_CYLINDER / SECTORS_PER_TRACK {
            return None;
        }
        Some(
            self.cylinder as u32 * SECTORS_PER_CYLINDER
                + self.head as u32 * SECTORS_PER_TRACK
                + (self.sector as u32 - 1),
        )
    }
}
