// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]

//! CONTEXT: Non-secure client identity registry and translator for multi-core dispatch
//! OWNERS: @security @runtime
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests per module + property tests (tests_prop.rs) + tests/registry.rs
//! PUBLIC API: Owner, OwnerId, IrqSource, ClientId, ClientIdRange, IdMapping,
//!             ClientIdRegistry::{new, register, translate}
//! DEPENDS_ON: alloc, spin (registration lock), log, thiserror
//! INVARIANTS: Range bounds are immutable; each range's owner is written at most once;
//!             an owner holds at most one range; translation is read-only, total and
//!             injective over the bound range; output id images never overlap
//!
//! Ranges are provisioned by platform configuration. Registration only binds an
//! owner to an existing range keyed by its mailbox interrupt source; it never
//! creates ranges. All registrations are expected to finish during early boot,
//! before mailbox interrupts are unmasked, after which the table is read-only.

extern crate alloc;

mod owner;
mod range;
mod registry;
mod translate;

pub use owner::{ClientId, IrqSource, Owner, OwnerId, OWNER_MAGIC};
pub use range::{ClientIdRange, IdMapping, RangeError};
pub use registry::{ClientIdRegistry, RegisterError, RegistryError};
pub use translate::TranslateError;
