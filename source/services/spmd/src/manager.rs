// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Boundary facade consumed by partition dispatch logic
//! OWNERS: @security @runtime
//! PUBLIC API: SecurePartitionManager::{new, boot, has_access, check_address_range,
//!             register_client_id_range, translate_client_id, init_multi_core_comm}
//! DEPENDS_ON: spm-memcheck, spm-clientid, mailbox::MultiCoreComm, parking_lot
//! INVARIANTS: Registration and translation require a live mailbox channel;
//!             access checks never log and never take a lock
//!
//! The raw-integer methods are the boundary surface and return [`Status`]. The
//! `*_typed` methods return component errors for callers that want detail.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use log::{error, info};
use parking_lot::Mutex;
use thiserror::Error;

use spm_clientid::{
    ClientId, ClientIdRegistry, IrqSource, Owner, OwnerId, RegisterError, RegistryError,
    TranslateError,
};
use spm_memcheck::{check_access, contains, AccessDenied, AccessFlags, MemoryRegion};

use crate::config::PlatformConfig;
use crate::mailbox::{CommError, MailboxTransport, MultiCoreComm};
use crate::status::Status;

/// Typed failures of the facade operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpmError {
    /// The mailbox channel is not up yet.
    #[error("mailbox channel not initialised")]
    NotInitialised,
    /// Registration rejected.
    #[error(transparent)]
    Register(#[from] RegisterError),
    /// Translation rejected.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Fatal early-boot failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BootError {
    /// The mailbox channel did not come up.
    #[error("mailbox bring-up failed: {0}")]
    Comm(#[source] CommError),
    /// A configured boot binding was rejected.
    #[error("boot binding {owner} -> {irq_source} failed: {source}")]
    Binding {
        /// Owner of the binding.
        owner: OwnerId,
        /// Interrupt source of the binding.
        irq_source: IrqSource,
        /// Registry verdict.
        #[source]
        source: RegisterError,
    },
}

/// Counts reported after a successful boot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BootReport {
    /// Static partitions in the layout.
    pub partitions: usize,
    /// Provisioned client-id ranges.
    pub ranges: usize,
    /// Ranges bound by boot bindings.
    pub bound: usize,
}

impl fmt::Display for BootReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partitions={} ranges={} bound={}", self.partitions, self.ranges, self.bound)
    }
}

/// Secure partition manager core: static tables, client-id registry and mailbox channel.
pub struct SecurePartitionManager<T> {
    config: PlatformConfig,
    registry: ClientIdRegistry,
    comm: Mutex<MultiCoreComm<T>>,
    live: AtomicBool,
}

impl<T: MailboxTransport> SecurePartitionManager<T> {
    /// Builds the manager over validated platform tables; the channel starts down.
    pub fn new(config: PlatformConfig, transport: T) -> Result<Self, RegistryError> {
        let registry = config.registry()?;
        Ok(Self {
            config,
            registry,
            comm: Mutex::new(MultiCoreComm::new(transport)),
            live: AtomicBool::new(false),
        })
    }

    /// Platform tables the manager was built from.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Client-id registry (read-only view).
    pub fn registry(&self) -> &ClientIdRegistry {
        &self.registry
    }

    /// Returns true once the mailbox channel is up.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Runs `f` against the transport.
    pub fn with_transport<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(self.comm.lock().transport())
    }

    /// Early-boot sequence: bring the channel up, then apply every boot binding in order.
    pub fn boot(&self) -> Result<BootReport, BootError> {
        self.init_multi_core_comm_typed().map_err(BootError::Comm)?;
        for binding in self.config.boot_bindings() {
            self.registry.register(Owner::from(binding.owner), binding.irq_source).map_err(
                |source| BootError::Binding {
                    owner: binding.owner,
                    irq_source: binding.irq_source,
                    source,
                },
            )?;
        }
        let report = BootReport {
            partitions: self.config.partitions().len(),
            ranges: self.registry.len(),
            bound: self.config.boot_bindings().len(),
        };
        info!(target: "spm::boot", "boot complete: {report}");
        Ok(report)
    }

    /// Returns true when `[base, base + size)` satisfies every bit of `flags`.
    ///
    /// Raw flag words carrying unknown bits are denied.
    pub fn has_access(&self, base: usize, size: usize, flags: u32) -> bool {
        match AccessFlags::from_raw(flags) {
            Some(flags) => self.has_access_typed(&MemoryRegion::new(base, size), flags).is_ok(),
            None => false,
        }
    }

    /// Typed access check explaining the first failed requirement.
    pub fn has_access_typed(
        &self,
        region: &MemoryRegion,
        flags: AccessFlags,
    ) -> Result<(), AccessDenied> {
        check_access(&self.config.layout(), region, flags)
    }

    /// Overflow-safe containment of `[p, p + s)` in `[region_start, region_limit)`.
    pub fn check_address_range(
        &self,
        p: usize,
        s: usize,
        region_start: usize,
        region_limit: usize,
    ) -> bool {
        contains(p, s, region_start, region_limit)
    }

    /// Boundary form of [`Self::register_client_id_range_typed`].
    pub fn register_client_id_range(&self, owner: u32, irq_source: u32) -> Result<(), Status> {
        self.register_client_id_range_typed(Owner::from_raw(owner), IrqSource::from_raw(irq_source))
            .map_err(Status::from)
    }

    /// Binds `owner` to the range provisioned for `irq_source`.
    pub fn register_client_id_range_typed(
        &self,
        owner: Owner,
        irq_source: IrqSource,
    ) -> Result<(), SpmError> {
        self.ensure_live("registration")?;
        self.registry.register(owner, irq_source)?;
        Ok(())
    }

    /// Boundary form of [`Self::translate_client_id_typed`].
    pub fn translate_client_id(&self, owner: u32, client_id_in: ClientId) -> Result<ClientId, Status> {
        self.translate_client_id_typed(Owner::from_raw(owner), client_id_in).map_err(Status::from)
    }

    /// Maps a caller-supplied client id to the internal one.
    pub fn translate_client_id_typed(
        &self,
        owner: Owner,
        client_id_in: ClientId,
    ) -> Result<ClientId, SpmError> {
        self.ensure_live("translation")?;
        Ok(self.registry.translate(owner, client_id_in)?)
    }

    /// Boundary form of [`Self::init_multi_core_comm_typed`].
    pub fn init_multi_core_comm(&self) -> Result<(), Status> {
        self.init_multi_core_comm_typed().map_err(Status::from)
    }

    /// Brings the mailbox channel up. A second call is rejected.
    pub fn init_multi_core_comm_typed(&self) -> Result<(), CommError> {
        let mut comm = self.comm.lock();
        comm.init()?;
        self.live.store(true, Ordering::Release);
        Ok(())
    }

    fn ensure_live(&self, operation: &str) -> Result<(), SpmError> {
        if self.is_live() {
            return Ok(());
        }
        error!(target: "spm::clientid", "client id {operation} before mailbox init");
        Err(SpmError::NotInitialised)
    }
}
