// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]

//! CONTEXT: Memory access validation for buffers handed across the secure/non-secure boundary
//! OWNERS: @security
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests per module + property tests (tests_prop.rs) + tests/layout.rs
//! PUBLIC API: MemoryRegion, SecurityAttr, MemAttr, MemoryLayout, RegionAttributes,
//!             contains(), AccessFlags, check_access(), has_access()
//! DEPENDS_ON: bitflags
//! INVARIANTS: Pure functions of static tables; overflow fails closed; partial overlap is
//!             a classification failure; no logging on the denial path

pub mod access;
pub mod layout;
pub mod range;
pub mod region;

pub use access::{check_access, has_access, AccessCheck, AccessDenied, AccessFlags, Side};
pub use layout::{MemoryLayout, Partition, PermissionRegion, RegionAttributes, RegionPerms};
pub use range::contains;
pub use region::{MemAttr, MemoryRegion, SecurityAttr};

#[cfg(test)]
mod tests_prop;
