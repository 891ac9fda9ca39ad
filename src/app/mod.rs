//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the still-position
//! detector: FSM orchestration, press debouncing, transmit rate limiting
//! and the battery telemetry relay.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;
