// SPDX-License-Identifier: GPL-3.0-only

//! Volume address-space allocator for DS8000 range provisioning
//!
//! Everything here derives from an immutable [`VolumeRegistry`] snapshot:
//!
//! - [`lss_policy`]: pool/format locked by an LSS that already holds volumes
//! - [`compact_ranges`]: allocated volume numbers merged into display ranges
//! - [`find_conflicts`]: already-allocated addresses inside a proposed range
//! - [`validate`]: the ordered checks a creation request must pass
//!
//! The derivations are synchronous and hold no state. [`PlanningSession`]
//! layers snapshot refresh and stale-result rejection on top of them.

pub mod compactor;
pub mod conflicts;
pub mod policy;
pub mod registry;
pub mod session;
pub mod validator;

pub use compactor::{compact_ranges, first_free_run, free_ranges};
pub use conflicts::find_conflicts;
pub use policy::lss_policy;
pub use registry::VolumeRegistry;
pub use session::{PlanningSession, StampedValidation};
pub use validator::{ValidationError, ValidationErrorKind, validate};
