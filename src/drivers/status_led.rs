//! Single-colour status LED driver.
//!
//! Two layers: a steady mode (on/off) and a timed pulse overlay.  While a
//! pulse is running the LED is lit regardless of mode; when it expires the
//! LED falls back to the mode.  The main loop advances the pulse with
//! [`StatusLed::tick`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LED GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::LedMode;
use crate::drivers::hw_init;

pub struct StatusLed {
    gpio: i32,
    mode: LedMode,
    pulse_remaining_ms: u32,
    lit: bool,
}

impl StatusLed {
    pub fn new(gpio: i32) -> Self {
        let mut led = Self {
            gpio,
            mode: LedMode::Off,
            pulse_remaining_ms: 0,
            lit: true,
        };
        led.refresh();
        led
    }

    pub fn set_mode(&mut self, mode: LedMode) {
        self.mode = mode;
        self.refresh();
    }

    /// Start (or restart) a pulse.  A new pulse replaces a running one.
    pub fn pulse(&mut self, duration_ms: u32) {
        self.pulse_remaining_ms = duration_ms;
        self.refresh();
    }

    /// Advance the pulse by `delta_ms`.
    pub fn tick(&mut self, delta_ms: u32) {
        if self.pulse_remaining_ms == 0 {
            return;
        }
        self.pulse_remaining_ms = self.pulse_remaining_ms.saturating_sub(delta_ms);
        self.refresh();
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn mode(&self) -> LedMode {
        self.mode
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse_remaining_ms > 0
    }

    fn refresh(&mut self) {
        let lit = self.pulse_remaining_ms > 0 || self.mode == LedMode::On;
        if lit != self.lit {
            hw_init::gpio_write(self.gpio, lit);
            self.lit = lit;
        }
    }
}
