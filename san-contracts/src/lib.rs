// SPDX-License-Identifier: GPL-3.0-only

pub mod protocol;
pub mod traits;

pub use protocol::{InventoryError, InventoryErrorKind, SnapshotId};
pub use traits::{StaticRegistrySource, VolumeRegistrySource};
