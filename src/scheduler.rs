//! Periodic timer engine.
//!
//! Three software timers drive everything that is not a button press:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Sampling (40 ms, only while armed)                          │
//! │  Battery  (1 h)                                              │
//! │  Housekeeping (1 s)                                          │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  TimerDelegate::on_timer_fired ──▶ main loop pushes Event    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler knows nothing about events or hardware: it only tracks
//! due times and calls the delegate.  A timer that is late fires once and
//! is rescheduled from `now`; missed periods are not replayed.

use crate::app::ports::{SampleInterval, TimerDelegate, TimerId};
use crate::config::DetectorConfig;
use log::debug;

// ═══════════════════════════════════════════════════════════════
//  Single timer
// ═══════════════════════════════════════════════════════════════

/// One periodic timer. `interval_ms == None` means stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    interval_ms: Option<u64>,
    next_due_ms: u64,
}

impl PeriodicTimer {
    pub const fn stopped() -> Self {
        Self {
            interval_ms: None,
            next_due_ms: 0,
        }
    }

    /// Start (or restart) with the first fire one interval after `now_ms`.
    pub fn start(&mut self, interval_ms: u64, now_ms: u64) {
        self.interval_ms = Some(interval_ms);
        self.next_due_ms = now_ms.saturating_add(interval_ms);
    }

    pub fn stop(&mut self) {
        self.interval_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval_ms.is_some()
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.interval_ms.map(|_| self.next_due_ms)
    }

    /// Returns `true` if the timer fired at `now_ms`.
    fn poll(&mut self, now_ms: u64) -> bool {
        let Some(interval) = self.interval_ms else {
            return false;
        };
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(interval);
        true
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Fire order within one tick when several timers are due.
const FIRE_ORDER: [TimerId; 3] = [TimerId::Sampling, TimerId::Battery, TimerId::Housekeeping];

pub struct Scheduler {
    sampling: PeriodicTimer,
    battery: PeriodicTimer,
    housekeeping: PeriodicTimer,
}

impl Scheduler {
    /// Battery and housekeeping run from boot; sampling starts stopped.
    pub fn new(config: &DetectorConfig, now_ms: u64) -> Self {
        let mut battery = PeriodicTimer::stopped();
        battery.start(u64::from(config.battery_update_interval_ms), now_ms);
        let mut housekeeping = PeriodicTimer::stopped();
        housekeeping.start(u64::from(config.housekeeping_interval_ms), now_ms);

        Self {
            sampling: PeriodicTimer::stopped(),
            battery,
            housekeeping,
        }
    }

    pub fn timer(&self, id: TimerId) -> &PeriodicTimer {
        match id {
            TimerId::Sampling => &self.sampling,
            TimerId::Battery => &self.battery,
            TimerId::Housekeeping => &self.housekeeping,
        }
    }

    fn timer_mut(&mut self, id: TimerId) -> &mut PeriodicTimer {
        match id {
            TimerId::Sampling => &mut self.sampling,
            TimerId::Battery => &mut self.battery,
            TimerId::Housekeeping => &mut self.housekeeping,
        }
    }

    /// Follow the accelerometer cadence.  Re-applying the same interval
    /// to a running timer keeps its phase.
    pub fn set_sampling(&mut self, interval: SampleInterval, now_ms: u64) {
        match interval {
            SampleInterval::Every(ms) => {
                let ms = u64::from(ms);
                if self.sampling.interval_ms() != Some(ms) {
                    debug!("scheduler: sampling every {}ms", ms);
                    self.sampling.start(ms, now_ms);
                }
            }
            SampleInterval::Disabled => {
                if self.sampling.is_running() {
                    debug!("scheduler: sampling stopped");
                }
                self.sampling.stop();
            }
        }
    }

    /// Fire every due timer once.  Returns how many fired.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut impl TimerDelegate) -> usize {
        let mut fired = 0;
        for id in FIRE_ORDER {
            if self.timer_mut(id).poll(now_ms) {
                delegate.on_timer_fired(id);
                fired += 1;
            }
        }
        fired
    }

    /// Earliest due time across running timers, for sleeping until then.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        FIRE_ORDER
            .iter()
            .filter_map(|&id| self.timer(id).next_due_ms())
            .min()
    }
}
