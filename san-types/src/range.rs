// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::VolumeAddress;
use crate::volume::VolumeFormat;

/// Contiguous run of allocated volume numbers inside one LSS.
///
/// Members of a range are assumed to share format and capacity, so the
/// capacity is stored per volume rather than summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub lss: u8,

    /// First volume number (inclusive)
    pub start_vol: u8,

    /// Last volume number (inclusive), never below `start_vol`
    pub end_vol: u8,

    pub format: VolumeFormat,
    pub capacity_bytes_per_volume: u64,
}

impl VolumeRange {
    /// Number of volumes in the range (1-256).
    pub fn len(&self) -> u32 {
        u32::from(self.end_vol) - u32::from(self.start_vol) + 1
    }

    pub fn contains(&self, volume_number: u8) -> bool {
        (self.start_vol..=self.end_vol).contains(&volume_number)
    }

    pub fn start_address(&self) -> VolumeAddress {
        VolumeAddress::new(self.lss, self.start_vol)
    }

    pub fn end_address(&self) -> VolumeAddress {
        VolumeAddress::new(self.lss, self.end_vol)
    }

    pub fn total_capacity_bytes(&self) -> u64 {
        self.capacity_bytes_per_volume
            .saturating_mul(u64::from(self.len()))
    }
}

impl fmt::Display for VolumeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_vol == self.end_vol {
            write!(f, "{}", self.start_address())
        } else {
            write!(f, "{}-{}", self.start_address(), self.end_address())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start_vol: u8, end_vol: u8) -> VolumeRange {
        VolumeRange {
            lss: 0x10,
            start_vol,
            end_vol,
            format: VolumeFormat::Fb,
            capacity_bytes_per_volume: 1024,
        }
    }

    #[test]
    fn display_collapses_single_volume() {
        assert_eq!(range(0, 3).to_string(), "1000-1003");
        assert_eq!(range(6, 6).to_string(), "1006");
    }

    #[test]
    fn len_and_capacity() {
        let full = range(0x00, 0xff);
        assert_eq!(full.len(), 256);
        assert_eq!(full.total_capacity_bytes(), 256 * 1024);
        assert!(full.contains(0x80));
        assert!(!range(2, 4).contains(5));
    }
}
