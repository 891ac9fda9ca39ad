//! Still-position detector firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod gate;
pub mod motion;
pub mod scheduler;

pub mod pins;

// Hardware-facing modules; on host builds the drivers fall back to
// in-memory simulation stubs.
pub mod adapters;
pub mod drivers;
