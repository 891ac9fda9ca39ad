//! ISR-fed button driver.
//!
//! ## Hardware
//!
//! Momentary switch with pull-down; GPIO fires on the rising edge.  The
//! ISR records the press timestamp into an atomic, and [`ButtonDriver::poll`]
//! (called from the main loop) turns each new timestamp into exactly one
//! press.
//!
//! Contact bounce and repeated presses are not filtered here: the state
//! machine's debounce gate decides which presses count.

use core::sync::atomic::{AtomicU32, Ordering};

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
/// Written by the ISR, read by the main loop.  0 = never pressed.
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

pub struct ButtonDriver {
    last_isr_ms: u32,
}

impl Default for ButtonDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonDriver {
    pub fn new() -> Self {
        Self {
            // Anything latched before the driver existed is not a press.
            last_isr_ms: BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire),
        }
    }

    /// Returns the ISR timestamp of a press not yet seen, if any.
    ///
    /// Presses closer together than one loop iteration collapse into one;
    /// the debounce window is far longer than a loop pass, so nothing the
    /// state machine would accept is lost.
    pub fn poll(&mut self) -> Option<u32> {
        let isr_ms = BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire);
        if isr_ms == 0 || isr_ms == self.last_isr_ms {
            return None;
        }
        self.last_isr_ms = isr_ms;
        Some(isr_ms)
    }
}

/// ISR handler. Register this on the button GPIO rising edge.
/// Safe to call from interrupt context (lock-free atomic store).
pub fn button_isr_handler(now_ms: u32) {
    // 0 is the "never pressed" sentinel.
    BUTTON_ISR_TIMESTAMP.store(now_ms.max(1), Ordering::Release);
}
