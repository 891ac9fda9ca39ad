//! Monotonic time gate used for both press debounce and publish cooldown.
//!
//! ```text
//!   now < next_allowed   → reject, gate unchanged
//!   now >= next_allowed  → accept, next_allowed = now + window
//! ```
//!
//! The two users (button debounce and radio cooldown) each own a separate
//! instance; they are never shared.

/// A fixed-window rate gate over millisecond ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateGate {
    window_ms: u64,
    next_allowed_ms: u64,
}

impl RateGate {
    /// A gate that is open from tick 0.
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            next_allowed_ms: 0,
        }
    }

    /// Whether an attempt at `now_ms` would be accepted. Does not mutate.
    pub fn is_open(&self, now_ms: u64) -> bool {
        now_ms >= self.next_allowed_ms
    }

    /// Accept and push the gate forward, or reject without side effects.
    pub fn try_pass(&mut self, now_ms: u64) -> bool {
        if !self.is_open(now_ms) {
            return false;
        }
        self.next_allowed_ms = now_ms.saturating_add(self.window_ms);
        true
    }

    pub fn next_allowed_ms(&self) -> u64 {
        self.next_allowed_ms
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
