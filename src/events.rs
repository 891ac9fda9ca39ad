//! Event queue feeding the single-threaded main loop.
//!
//! Events are produced by:
//! - the button driver (press stamped by the GPIO ISR, picked up by the loop)
//! - the scheduler (sampling cadence, battery interval, radio housekeeping)
//!
//! and consumed by the main loop one at a time, strictly in arrival order,
//! via [`AppService::dispatch`](crate::app::service::AppService::dispatch).
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button ISR  │────▶│              │     │              │
//! │ Scheduler   │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ (timers)    │────▶│  (FIFO)      │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::motion::Sample;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Everything the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Button pressed (debouncing happens in the state machine).
    ButtonPress,
    /// Accelerometer produced a reading.
    SampleReady(Sample),
    /// Battery report interval elapsed.
    BatteryUpdate,
    /// Radio/pairing housekeeping interval elapsed.
    Housekeeping,
}

/// Fixed-capacity FIFO of pending events.  Owned by the main loop.
pub struct EventQueue {
    pending: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
            dropped: 0,
        }
    }

    /// Enqueue an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        if self.pending.push_back(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("event queue full, dropped {:?} ({} total)", event, self.dropped);
            return false;
        }
        true
    }

    /// Pop the oldest pending event.
    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Events lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
