//! Peripheral drivers and one-shot hardware initialisation.

pub mod accelerometer;
pub mod battery;
pub mod button;
pub mod hw_init;
pub mod status_led;
pub mod watchdog;
