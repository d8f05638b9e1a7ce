// SPDX-License-Identifier: GPL-3.0-only

//! Two-level volume addressing (LSS x volume number)
//!
//! A volume ID is the concatenation of two 2-hex-digit fields: the logical
//! subsystem (LSS) and the volume number inside it. `"1005"` is volume `05`
//! of LSS `10`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of volume numbers addressable inside one LSS (00-FF).
pub const VOLUMES_PER_LSS: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid volume address format: {0:?}")]
    InvalidFormat(String),
}

/// Address of one volume in the storage system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolumeAddress {
    pub lss: u8,
    pub volume_number: u8,
}

impl VolumeAddress {
    pub fn new(lss: u8, volume_number: u8) -> Self {
        Self { lss, volume_number }
    }

    /// Canonical 4-digit uppercase form.
    pub fn canonical(&self) -> String {
        encode(self.lss, self.volume_number)
    }
}

impl fmt::Display for VolumeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.lss, self.volume_number)
    }
}

impl FromStr for VolumeAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

// Volume IDs travel as their canonical string, matching the backend records.
impl Serialize for VolumeAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VolumeAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode(&raw).map_err(serde::de::Error::custom)
    }
}

/// Encode an LSS and volume number as 4 uppercase hex digits.
pub fn encode(lss: u8, volume_number: u8) -> String {
    format!("{lss:02X}{volume_number:02X}")
}

/// Decode a 4-hex-digit volume ID. Hex is case-insensitive; no padding or
/// trimming is performed.
pub fn decode(text: &str) -> Result<VolumeAddress, AddressError> {
    let invalid = || AddressError::InvalidFormat(text.to_string());

    // Length is checked in bytes, so non-ASCII input can never be split
    // inside a character below.
    if text.len() != 4 || !text.is_ascii() {
        return Err(invalid());
    }

    let (lss, volume) = text.split_at(2);
    let lss = parse_hex2(lss).map_err(|_| invalid())?;
    let volume_number = parse_hex2(volume).map_err(|_| invalid())?;

    Ok(VolumeAddress { lss, volume_number })
}

/// True iff `s` is exactly two hex characters (00-FF, either case).
pub fn is_valid_hex2(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse one 2-hex-digit field.
pub fn parse_hex2(s: &str) -> Result<u8, AddressError> {
    if !is_valid_hex2(s) {
        return Err(AddressError::InvalidFormat(s.to_string()));
    }

    u8::from_str_radix(s, 16).map_err(|_| AddressError::InvalidFormat(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_pads_and_uppercases() {
        assert_eq!(encode(0x10, 0x05), "1005");
        assert_eq!(encode(0, 0), "0000");
        assert_eq!(encode(0xab, 0xcd), "ABCD");
    }

    #[test]
    fn decode_accepts_lowercase() {
        assert_eq!(decode("abcd").unwrap(), VolumeAddress::new(0xab, 0xcd));
        assert_eq!(decode("10Ff").unwrap(), VolumeAddress::new(0x10, 0xff));
    }

    #[test]
    fn decode_rejects_malformed_ids() {
        for bad in ["", "100", "10050", "G005", "10 5", " 1005", "+F05", "1é5"] {
            assert!(decode(bad).is_err(), "{bad:?} should not decode");
        }
    }

    #[test]
    fn every_address_roundtrips() {
        for lss in 0..=u8::MAX {
            for vol in 0..=u8::MAX {
                let decoded = decode(&encode(lss, vol)).unwrap();
                assert_eq!(decoded, VolumeAddress::new(lss, vol));
            }
        }
    }

    #[test]
    fn hex2_validation() {
        assert!(is_valid_hex2("00"));
        assert!(is_valid_hex2("fF"));
        assert!(!is_valid_hex2(""));
        assert!(!is_valid_hex2("0"));
        assert!(!is_valid_hex2("100"));
        assert!(!is_valid_hex2("G0"));
        assert!(!is_valid_hex2("+F"));
        assert_eq!(parse_hex2("1a").unwrap(), 0x1a);
        assert!(parse_hex2("-1").is_err());
    }

    #[test]
    fn serde_uses_canonical_form() {
        let json = serde_json::to_string(&VolumeAddress::new(0x10, 0x0a)).expect("serialize");
        assert_eq!(json, "\"100A\"");
        let parsed: VolumeAddress = serde_json::from_str("\"100a\"").expect("deserialize");
        assert_eq!(parsed, VolumeAddress::new(0x10, 0x0a));
        assert!(serde_json::from_str::<VolumeAddress>("\"XYZ\"").is_err());
    }
}
