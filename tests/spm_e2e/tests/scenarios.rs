// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Early boot followed by mailbox traffic against the boundary surface.

use anyhow::{ensure, Context, Result};
use spm_clientid::OWNER_MAGIC;
use spm_e2e::{
    manager_from_file, manager_with, two_core_manager, write_platform, IRQ_LEGACY, IRQ_MAILBOX,
    OWNER_A, OWNER_B, SECURE_RAM_BASE, SHARED_BASE, TWO_CORE_PLATFORM,
};
use spm_memcheck::AccessFlags;
use spmd::{LoopbackMailbox, PlatformConfig, Status, CONFIG_ENV};

#[test]
fn boot_register_translate() -> Result<()> {
    let spm = two_core_manager()?;

    spm.init_multi_core_comm().map_err(|s| anyhow::anyhow!("init: {s}"))?;
    spm.register_client_id_range(OWNER_A, IRQ_MAILBOX)
        .map_err(|s| anyhow::anyhow!("register: {s}"))?;

    let first = spm.translate_client_id(OWNER_A, 40).map_err(|s| anyhow::anyhow!("{s}"))?;
    let again = spm.translate_client_id(OWNER_A, 40).map_err(|s| anyhow::anyhow!("{s}"))?;
    ensure!(first == again, "translation must be deterministic");
    ensure!(first == 40, "identity mapping expected, got {first}");

    assert_eq!(spm.init_multi_core_comm(), Err(Status::AlreadyDone));
    assert_eq!(spm.with_transport(LoopbackMailbox::init_calls), 1);
    Ok(())
}

#[test]
fn registration_states() -> Result<()> {
    let spm = two_core_manager()?;
    spm.init_multi_core_comm().map_err(|s| anyhow::anyhow!("init: {s}"))?;

    assert_eq!(spm.register_client_id_range(OWNER_A, IRQ_LEGACY), Ok(()));
    assert_eq!(spm.register_client_id_range(OWNER_B, IRQ_LEGACY), Err(Status::AlreadyDone));
    assert_eq!(spm.register_client_id_range(OWNER_A, IRQ_LEGACY), Err(Status::AlreadyDone));
    assert_eq!(spm.register_client_id_range(OWNER_MAGIC, IRQ_LEGACY), Err(Status::BadParameters));
    assert_eq!(spm.register_client_id_range(0, IRQ_MAILBOX), Err(Status::BadParameters));
    assert_eq!(spm.register_client_id_range(OWNER_B, 99), Err(Status::NotFound));

    assert_eq!(spm.translate_client_id(OWNER_A, 150), Ok(150));
    assert_eq!(spm.translate_client_id(OWNER_A, 200), Err(Status::BadParameters));
    assert_eq!(spm.translate_client_id(OWNER_B, 150), Err(Status::NotFound));
    assert_eq!(Status::code_of(&spm.translate_client_id(OWNER_B, 150)), -2);
    Ok(())
}

#[test]
fn translation_is_injective_over_bound_range() -> Result<()> {
    let spm = two_core_manager()?;
    spm.init_multi_core_comm().map_err(|s| anyhow::anyhow!("init: {s}"))?;
    spm.register_client_id_range(OWNER_B, IRQ_LEGACY)
        .map_err(|s| anyhow::anyhow!("register: {s}"))?;

    let mut seen = std::collections::BTreeSet::new();
    for id in 100..=199 {
        let out = spm
            .translate_client_id(OWNER_B, id)
            .map_err(|s| anyhow::anyhow!("translate {id}: {s}"))?;
        ensure!(seen.insert(out), "id {id} collided on {out}");
    }
    Ok(())
}

#[test]
fn failed_bring_up_keeps_registry_closed() -> Result<()> {
    let spm = manager_with(LoopbackMailbox::failing(1))?;
    assert_eq!(spm.init_multi_core_comm(), Err(Status::Generic));
    assert_eq!(spm.register_client_id_range(OWNER_A, IRQ_MAILBOX), Err(Status::Generic));

    assert_eq!(spm.init_multi_core_comm(), Ok(()));
    assert_eq!(spm.register_client_id_range(OWNER_A, IRQ_MAILBOX), Ok(()));
    Ok(())
}

#[test]
fn caller_buffers_are_checked_before_use() -> Result<()> {
    let spm = two_core_manager()?;
    let ns_rw = (AccessFlags::NONSECURE | AccessFlags::MPU_READWRITE | AccessFlags::MPU_UNPRIV).bits();

    ensure!(spm.has_access(SHARED_BASE, 0x400, ns_rw), "shared window must be usable");
    ensure!(
        !spm.has_access(SHARED_BASE + 0x7_ff00, 0x200, ns_rw),
        "buffer leaving the non-secure mapping must be denied"
    );
    ensure!(
        !spm.has_access(SECURE_RAM_BASE, 0x10, AccessFlags::AU_NONSECURE.bits()),
        "secure RAM is never non-secure memory"
    );
    ensure!(
        !spm.has_access(usize::MAX - 4, 0x10, AccessFlags::MPU_READ.bits()),
        "overflowing buffer must fail closed"
    );
    ensure!(
        spm.check_address_range(SHARED_BASE, 0x100, SHARED_BASE, SHARED_BASE + 0x100),
        "exact fit is contained"
    );
    Ok(())
}

#[test]
fn platform_file_from_environment() -> Result<()> {
    let file = write_platform(TWO_CORE_PLATFORM)?;
    std::env::set_var(CONFIG_ENV, file.path());
    let loaded = PlatformConfig::from_env();
    std::env::remove_var(CONFIG_ENV);

    let config = loaded.context("load platform from environment")?;
    ensure!(config.client_id_ranges().len() == 2, "both ranges provisioned");

    let spm = manager_from_file(file.path())?;
    let report = spm.boot().context("boot")?;
    ensure!(report.bound == 0, "two-core platform has no boot bindings");
    Ok(())
}
