// SPDX-License-Identifier: GPL-3.0-only

//! Allocated volume records
//!
//! `RawVolumeRecord` is the shape the inventory backend returns;
//! `AllocatedVolume` is the validated form the allocator works on.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::{AddressError, VolumeAddress, decode};

/// Volume format. All volumes of one LSS share one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeFormat {
    /// Fixed Block (open systems)
    #[serde(rename = "FB", alias = "fb")]
    Fb,

    /// Count-Key-Data (mainframe)
    #[serde(rename = "CKD", alias = "ckd")]
    Ckd,
}

impl VolumeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fb => "FB",
            Self::Ckd => "CKD",
        }
    }

    /// Parse the backend string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "FB" => Some(Self::Fb),
            "CKD" => Some(Self::Ckd),
            _ => None,
        }
    }
}

impl fmt::Display for VolumeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One already-allocated volume in a registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedVolume {
    pub address: VolumeAddress,
    pub pool_name: Option<String>,
    pub format: VolumeFormat,
    pub capacity_bytes: u64,
}

/// Volume record as delivered by the inventory backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawVolumeRecord {
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub pool_name: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub capacity_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has no volume_id")]
    MissingVolumeId,

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("unknown volume format {0:?}")]
    UnknownFormat(String),
}

impl TryFrom<RawVolumeRecord> for AllocatedVolume {
    type Error = RecordError;

    fn try_from(record: RawVolumeRecord) -> Result<Self, Self::Error> {
        let volume_id = record.volume_id.ok_or(RecordError::MissingVolumeId)?;
        let address = decode(&volume_id)?;
        let format = match record.format {
            Some(format) => {
                VolumeFormat::parse(&format).ok_or(RecordError::UnknownFormat(format))?
            }
            None => return Err(RecordError::UnknownFormat(String::new())),
        };

        Ok(Self {
            address,
            pool_name: record.pool_name,
            format,
            capacity_bytes: record.capacity_bytes.unwrap_or(0),
        })
    }
}
