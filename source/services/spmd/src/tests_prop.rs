// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;

use spm_memcheck::AccessFlags;

use crate::{LoopbackMailbox, PlatformConfig, SecurePartitionManager, Status};

fn manager() -> SecurePartitionManager<LoopbackMailbox> {
    let config = PlatformConfig::reference().expect("reference platform");
    SecurePartitionManager::new(config, LoopbackMailbox::new()).expect("manager")
}

fn address() -> impl Strategy<Value = usize> {
    prop_oneof![
        0x1000_0000usize..0x1010_0000,
        0x1fff_0000usize..0x2005_0000,
        0x3000_0000usize..0x3004_0000,
        any::<usize>(),
    ]
}

proptest! {
    #[test]
    fn unknown_flag_bits_always_deny(
        base in address(),
        size in 0usize..0x2000,
        known in 0u32..32,
        extra in 5u32..32,
    ) {
        let spm = manager();
        let raw = known | (1 << extra);
        prop_assert!(AccessFlags::from_raw(raw).is_none());
        prop_assert!(!spm.has_access(base, size, raw));
    }

    #[test]
    fn raw_flags_are_monotone(
        base in address(),
        size in 0usize..0x2000,
        a in 0u32..32,
        b in 0u32..32,
    ) {
        let spm = manager();
        if spm.has_access(base, size, a | b) {
            prop_assert!(spm.has_access(base, size, a));
        }
    }

    #[test]
    fn client_id_calls_before_init_are_generic(owner in any::<u32>(), irq in 0u32..16, id in any::<i32>()) {
        let spm = manager();
        prop_assert_eq!(spm.register_client_id_range(owner, irq), Err(Status::Generic));
        prop_assert_eq!(spm.translate_client_id(owner, id), Err(Status::Generic));
    }
}
