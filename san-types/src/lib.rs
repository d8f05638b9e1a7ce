// SPDX-License-Identifier: GPL-3.0-only

//! Domain models for the SAN volume address-space allocator
//!
//! These types are shared by every layer of the stack:
//!
//! - **san-contracts**: registry sources return `RawVolumeRecord` batches
//! - **san-allocator**: derives policies, ranges and plans from `AllocatedVolume` snapshots
//! - **san-console**: reads requests and prints plans as JSON
//!
//! ## Addressing
//!
//! A DS8000 volume ID is `LLVV`: a 2-hex-digit logical subsystem (LSS)
//! followed by a 2-hex-digit volume number, giving 256 x 256 addresses per
//! storage system.

pub mod address;
pub mod allocation;
pub mod common;
pub mod range;
pub mod volume;

pub use address::{
    AddressError, VOLUMES_PER_LSS, VolumeAddress, decode, encode, is_valid_hex2, parse_hex2,
};
pub use allocation::{AllocationRequest, LssPolicy, ValidatedPlan};
pub use common::{bytes_to_pretty, pretty_to_bytes};
pub use range::VolumeRange;
pub use volume::{AllocatedVolume, RawVolumeRecord, RecordError, VolumeFormat};
