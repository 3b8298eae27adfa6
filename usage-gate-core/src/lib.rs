#![doc = "usage-gate-core: core logic library for usage-gate."]

//! This crate contains all open-source logic, data models and policy for usage-gate.
//! Service-specific storage clients are not included here.
//! Begin new modules as submodules below.
//!
//! # Usage
//! Add this as a dependency for shared actor, policy, config, and storage-port code.

pub mod actor;
pub mod config;
pub mod contract;
pub mod gate;
pub mod local_store;
