// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Platform tables for the partition manager (TOML)
//! OWNERS: @security @runtime
//! PUBLIC API: PlatformConfig::{from_env, load, from_toml_str, reference}, BootBinding, ConfigError
//! DEPENDS_ON: serde, toml, spm-memcheck (layout tables), spm-clientid (range table)
//! INVARIANTS: Every table is validated before a PlatformConfig exists; a built
//!             config is never mutated

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use spm_clientid::{
    ClientIdRange, ClientIdRegistry, IdMapping, IrqSource, OwnerId, RangeError, RegistryError,
};
use spm_memcheck::{MemoryLayout, Partition, PermissionRegion, RegionPerms};

/// Environment variable naming the platform TOML file.
pub const CONFIG_ENV: &str = "SPM_PLATFORM_CONFIG";

const REFERENCE_PLATFORM: &str = include_str!("../platform/reference.toml");

/// Errors raised while loading or validating platform tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read platform config {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML for the schema.
    #[error("failed to parse platform config {path}: {source}")]
    ParseFile {
        /// File that was parsed.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml::de::Error,
    },
    /// In-memory config text is not valid TOML for the schema.
    #[error("failed to parse platform config: {0}")]
    Parse(#[from] toml::de::Error),
    /// An address table entry has `base >= limit`.
    #[error("{table} entry [{base:#x}, {limit:#x}) is empty or inverted")]
    EmptyRange {
        /// Table holding the entry.
        table: &'static str,
        /// Entry base.
        base: usize,
        /// Entry limit.
        limit: usize,
    },
    /// Two entries of the same address table overlap.
    #[error("{table} entries at {first:#x} and {second:#x} overlap")]
    Overlap {
        /// Table holding the entries.
        table: &'static str,
        /// Base of the lower entry.
        first: usize,
        /// Base of the entry overlapping it.
        second: usize,
    },
    /// A client-id range is malformed.
    #[error("client id range for irq{irq}: {source}")]
    ClientIdRange {
        /// Interrupt source of the range.
        irq: u32,
        /// Range validation failure.
        #[source]
        source: RangeError,
    },
    /// The range table as a whole is inconsistent.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A boot binding names a reserved owner value.
    #[error("boot binding for irq{irq} names reserved owner {owner:#x}")]
    ReservedOwner {
        /// Raw owner value.
        owner: u32,
        /// Interrupt source of the binding.
        irq: u32,
    },
    /// A boot binding names an interrupt source with no provisioned range.
    #[error("boot binding names unprovisioned irq{irq}")]
    UnknownBootIrq {
        /// Interrupt source of the binding.
        irq: u32,
    },
}

/// Registration performed by the secure core during early boot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BootBinding {
    /// Owner to bind.
    pub owner: OwnerId,
    /// Interrupt source whose range is claimed.
    pub irq_source: IrqSource,
}

/// Validated, immutable platform tables.
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    partitions: Vec<Partition>,
    secure_map: Vec<PermissionRegion>,
    nonsecure_map: Vec<PermissionRegion>,
    client_id_ranges: Vec<ClientIdRange>,
    boot_bindings: Vec<BootBinding>,
}

impl PlatformConfig {
    /// Loads the file named by [`CONFIG_ENV`], or the reference platform when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                info!(target: "spm::boot", "{CONFIG_ENV} unset; using reference platform");
                Self::reference()
            }
        }
    }

    /// Loads and validates a platform TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let raw: RawPlatform = toml::from_str(&data)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })?;
        let config = Self::build(raw)?;
        info!(target: "spm::boot", "platform config loaded from {}", path.display());
        Ok(config)
    }

    /// Parses and validates platform TOML held in memory.
    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        let raw: RawPlatform = toml::from_str(data)?;
        Self::build(raw)
    }

    /// The compiled-in reference platform.
    pub fn reference() -> Result<Self, ConfigError> {
        Self::from_toml_str(REFERENCE_PLATFORM)
    }

    /// Static secure/non-secure partitioning.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Secure-side permission map.
    pub fn secure_map(&self) -> &[PermissionRegion] {
        &self.secure_map
    }

    /// Non-secure-side permission map.
    pub fn nonsecure_map(&self) -> &[PermissionRegion] {
        &self.nonsecure_map
    }

    /// Provisioned client-id ranges in table order.
    pub fn client_id_ranges(&self) -> &[ClientIdRange] {
        &self.client_id_ranges
    }

    /// Registrations to perform during boot, in order.
    pub fn boot_bindings(&self) -> &[BootBinding] {
        &self.boot_bindings
    }

    /// Borrows the address tables as a resolver.
    pub fn layout(&self) -> MemoryLayout<'_> {
        MemoryLayout::new(&self.partitions, &self.secure_map, &self.nonsecure_map)
    }

    /// Builds a fresh, unbound registry over the provisioned ranges.
    pub fn registry(&self) -> Result<ClientIdRegistry, RegistryError> {
        ClientIdRegistry::new(self.client_id_ranges.iter().copied())
    }

    fn build(raw: RawPlatform) -> Result<Self, ConfigError> {
        let partitions: Vec<Partition> = raw
            .partitions
            .iter()
            .map(|p| Partition::new(p.base, p.limit, p.secure))
            .collect();
        check_table("partition", partitions.iter().map(|p| (p.base, p.limit)))?;

        let secure_map: Vec<PermissionRegion> =
            raw.secure_regions.iter().map(RawRegion::to_region).collect();
        check_table("secure_region", secure_map.iter().map(|r| (r.base, r.limit)))?;

        let nonsecure_map: Vec<PermissionRegion> =
            raw.nonsecure_regions.iter().map(RawRegion::to_region).collect();
        check_table("nonsecure_region", nonsecure_map.iter().map(|r| (r.base, r.limit)))?;

        let client_id_ranges = raw
            .client_id_ranges
            .iter()
            .map(RawClientIdRange::to_range)
            .collect::<Result<Vec<_>, _>>()?;

        let mut boot_bindings = Vec::with_capacity(raw.boot_bindings.len());
        for binding in &raw.boot_bindings {
            let owner = OwnerId::new(binding.owner).ok_or(ConfigError::ReservedOwner {
                owner: binding.owner,
                irq: binding.irq_source,
            })?;
            let irq_source = IrqSource::from_raw(binding.irq_source);
            if !client_id_ranges.iter().any(|range| range.irq_source() == irq_source) {
                return Err(ConfigError::UnknownBootIrq { irq: binding.irq_source });
            }
            boot_bindings.push(BootBinding { owner, irq_source });
        }

        let config =
            Self { partitions, secure_map, nonsecure_map, client_id_ranges, boot_bindings };
        config.registry()?;
        Ok(config)
    }
}

fn check_table<I>(table: &'static str, entries: I) -> Result<(), ConfigError>
where
    I: Iterator<Item = (usize, usize)>,
{
    let mut sorted: Vec<(usize, usize)> = Vec::new();
    for (base, limit) in entries {
        if base >= limit {
            return Err(ConfigError::EmptyRange { table, base, limit });
        }
        sorted.push((base, limit));
    }
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        let (first, first_limit) = pair[0];
        let (second, _) = pair[1];
        if first_limit > second {
            return Err(ConfigError::Overlap { table, first, second });
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlatform {
    #[serde(default, rename = "partition")]
    partitions: Vec<RawPartition>,
    #[serde(default, rename = "secure_region")]
    secure_regions: Vec<RawRegion>,
    #[serde(default, rename = "nonsecure_region")]
    nonsecure_regions: Vec<RawRegion>,
    #[serde(default, rename = "client_id_range")]
    client_id_ranges: Vec<RawClientIdRange>,
    #[serde(default, rename = "boot_binding")]
    boot_bindings: Vec<RawBootBinding>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPartition {
    base: usize,
    limit: usize,
    secure: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegion {
    base: usize,
    limit: usize,
    #[serde(default)]
    access: Vec<Access>,
    #[serde(default)]
    execute_never: bool,
}

impl RawRegion {
    fn to_region(&self) -> PermissionRegion {
        let mut perms = self.access.iter().fold(RegionPerms::empty(), |acc, a| acc | a.perms());
        perms.set(RegionPerms::EXECUTE_NEVER, self.execute_never);
        PermissionRegion::new(self.base, self.limit, perms)
    }
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Access {
    PrivRead,
    PrivWrite,
    UnprivRead,
    UnprivWrite,
}

impl Access {
    fn perms(self) -> RegionPerms {
        match self {
            Access::PrivRead => RegionPerms::PRIV_READ,
            Access::PrivWrite => RegionPerms::PRIV_WRITE,
            Access::UnprivRead => RegionPerms::UNPRIV_READ,
            Access::UnprivWrite => RegionPerms::UNPRIV_WRITE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientIdRange {
    irq_source: u32,
    id_lo: i32,
    id_hi: i32,
    #[serde(default)]
    out_base: Option<i32>,
}

impl RawClientIdRange {
    fn to_range(&self) -> Result<ClientIdRange, ConfigError> {
        let mapping = match self.out_base {
            Some(out_base) => IdMapping::Offset { out_base },
            None => IdMapping::Identity,
        };
        ClientIdRange::new(IrqSource::from_raw(self.irq_source), self.id_lo, self.id_hi, mapping)
            .map_err(|source| ConfigError::ClientIdRange { irq: self.irq_source, source })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBootBinding {
    owner: u32,
    irq_source: u32,
}
