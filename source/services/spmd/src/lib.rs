// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]

//! CONTEXT: Secure partition manager service: platform tables, mailbox bring-up and
//!          the boundary surface used by partition dispatch
//! OWNERS: @security @runtime
//! STATUS: Functional (host backend)
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests per module + property tests + tests/config_file.rs
//!
//! PUBLIC API: SecurePartitionManager, PlatformConfig, Status, MailboxTransport,
//!             LoopbackMailbox, MultiCoreComm
//! DEPENDS_ON: spm-memcheck, spm-clientid, serde/toml (config), log, parking_lot
//!
//! SECURITY INVARIANTS:
//!   - Raw client ids are never logged
//!   - Access denials are silent and fail closed
//!   - The mailbox channel is never re-initialised once live

mod config;
mod mailbox;
mod manager;
mod status;

pub use config::{BootBinding, ConfigError, PlatformConfig, CONFIG_ENV};
pub use mailbox::{CommError, LoopbackError, LoopbackMailbox, MailboxTransport, MultiCoreComm};
pub use manager::{BootError, BootReport, SecurePartitionManager, SpmError};
pub use status::Status;

#[cfg(test)]
mod tests_prop;
