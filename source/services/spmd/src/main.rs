// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: spmd entry point wiring platform config and the loopback mailbox to the manager

#![forbid(unsafe_code)]

use std::process;

use spmd::{LoopbackMailbox, PlatformConfig, SecurePartitionManager};

fn run() -> Result<String, Box<dyn std::error::Error>> {
    let config = PlatformConfig::from_env()?;
    let manager = SecurePartitionManager::new(config, LoopbackMailbox::new())?;
    let report = manager.boot()?;
    Ok(report.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(summary) => println!("spmd: ready ({summary})"),
        Err(err) => {
            eprintln!("spmd: fatal: {err}");
            process::exit(1);
        }
    }
}
