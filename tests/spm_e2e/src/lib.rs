//! CONTEXT: Secure partition manager end-to-end test harness library
//! INTENT: Boot a manager over a two-core platform and drive the boundary surface
//! DEPS: spmd (manager, config), spm-memcheck (flags), spm-clientid (owners)
//! READINESS: Host backend (loopback mailbox)
//! TESTS: Boot ordering; registration and translation; buffer checks; config from env
// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use spmd::{LoopbackMailbox, PlatformConfig, SecurePartitionManager};
use tempfile::NamedTempFile;

/// Owner identity used for the first non-secure client.
pub const OWNER_A: u32 = 0x0000_00a1;
/// Owner identity used for the second non-secure client.
pub const OWNER_B: u32 = 0x0000_00b2;

/// Mailbox interrupt source provisioned with ids `[0, 63]`.
pub const IRQ_MAILBOX: u32 = 5;
/// Mailbox interrupt source provisioned with ids `[100, 199]`.
pub const IRQ_LEGACY: u32 = 1;

/// Shared RAM window visible to both cores.
pub const SHARED_BASE: usize = 0x2800_0000;
/// Secure-only RAM.
pub const SECURE_RAM_BASE: usize = 0x3800_0000;

/// Two-core platform used by the scenarios; no boot bindings.
pub const TWO_CORE_PLATFORM: &str = r#"
[[partition]]
base = 0x2800_0000
limit = 0x2810_0000
secure = false

[[partition]]
base = 0x3800_0000
limit = 0x3810_0000
secure = true

[[secure_region]]
base = 0x2800_0000
limit = 0x2810_0000
access = ["priv_read", "priv_write", "unpriv_read", "unpriv_write"]
execute_never = true

[[secure_region]]
base = 0x3800_0000
limit = 0x3810_0000
access = ["priv_read", "priv_write"]
execute_never = true

[[nonsecure_region]]
base = 0x2800_0000
limit = 0x2808_0000
access = ["priv_read", "priv_write", "unpriv_read", "unpriv_write"]
execute_never = true

[[client_id_range]]
irq_source = 5
id_lo = 0
id_hi = 63

[[client_id_range]]
irq_source = 1
id_lo = 100
id_hi = 199
"#;

/// Manager over [`TWO_CORE_PLATFORM`] with a healthy loopback mailbox.
pub fn two_core_manager() -> Result<SecurePartitionManager<LoopbackMailbox>> {
    manager_with(LoopbackMailbox::new())
}

/// Manager over [`TWO_CORE_PLATFORM`] with the given transport.
pub fn manager_with(
    transport: LoopbackMailbox,
) -> Result<SecurePartitionManager<LoopbackMailbox>> {
    let config =
        PlatformConfig::from_toml_str(TWO_CORE_PLATFORM).context("parse two-core platform")?;
    SecurePartitionManager::new(config, transport).context("build manager")
}

/// Writes platform TOML to a temporary file that lives as long as the handle.
pub fn write_platform(text: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("create platform file")?;
    file.write_all(text.as_bytes()).context("write platform file")?;
    Ok(file)
}

/// Loads a platform file and builds a manager over it.
pub fn manager_from_file(path: &Path) -> Result<SecurePartitionManager<LoopbackMailbox>> {
    let config = PlatformConfig::load(path)
        .with_context(|| format!("load platform {}", path.display()))?;
    SecurePartitionManager::new(config, LoopbackMailbox::new()).context("build manager")
}
