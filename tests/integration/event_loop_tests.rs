//! Host-side replica of the firmware event loop.
//!
//! Wires the real [`Scheduler`], [`EventQueue`] and [`AppService`] together
//! the way `main` does, with a scripted motion profile standing in for the
//! accelerometer.  Time advances in fixed loop steps.

use super::mock_hw::{LogSink, MockHardware, PortCall};

use stillpos::app::ports::{HOLD_TIME_TOPIC, TimerDelegate, TimerId};
use stillpos::app::service::AppService;
use stillpos::config::DetectorConfig;
use stillpos::events::{Event, EventQueue};
use stillpos::fsm::StateId;
use stillpos::motion::Sample;
use stillpos::scheduler::Scheduler;

const STILL: Sample = Sample::new(0.0, 0.0, 1.0);
const JOLT: Sample = Sample::new(0.0, 0.9, 1.2);

/// Pushes timer events, sampling the scripted motion profile.
struct ScriptedTimers<'a> {
    queue: &'a mut EventQueue,
    sample: Sample,
    samples_taken: &'a mut u32,
}

impl TimerDelegate for ScriptedTimers<'_> {
    fn on_timer_fired(&mut self, timer: TimerId) {
        let event = match timer {
            TimerId::Sampling => {
                *self.samples_taken += 1;
                Event::SampleReady(self.sample)
            }
            TimerId::Battery => Event::BatteryUpdate,
            TimerId::Housekeeping => Event::Housekeeping,
        };
        self.queue.push(event);
    }
}

struct Rig {
    app: AppService,
    hw: MockHardware,
    sink: LogSink,
    sched: Scheduler,
    queue: EventQueue,
    now: u64,
    motion: fn(u64) -> Sample,
    samples_taken: u32,
}

impl Rig {
    fn new(motion: fn(u64) -> Sample) -> Self {
        let config = DetectorConfig::default();
        let sched = Scheduler::new(&config, 0);
        let mut app = AppService::new(config);
        let mut hw = MockHardware::new();
        let mut sink = LogSink::new();
        app.start(0, &mut hw, &mut sink);
        Self {
            app,
            hw,
            sink,
            sched,
            queue: EventQueue::new(),
            now: 0,
            motion,
            samples_taken: 0,
        }
    }

    /// One loop pass at the current time.
    fn pass(&mut self, pressed: bool) {
        let Self {
            app,
            hw,
            sink,
            sched,
            queue,
            now,
            motion,
            samples_taken,
        } = self;
        let now = *now;

        if pressed {
            queue.push(Event::ButtonPress);
        }
        sched.tick(
            now,
            &mut ScriptedTimers {
                queue: &mut *queue,
                sample: (*motion)(now),
                samples_taken: &mut *samples_taken,
            },
        );
        queue.drain(|event| app.dispatch(event, now, hw, sink));
        sched.set_sampling(app.sample_interval(), now);
    }

    fn press(&mut self) {
        self.pass(true);
    }

    fn run_until(&mut self, until_ms: u64, step_ms: u64) {
        while self.now < until_ms {
            self.now = (self.now + step_ms).min(until_ms);
            self.pass(false);
        }
    }
}

fn jolt_at_2s(t: u64) -> Sample {
    if t >= 2000 { JOLT } else { STILL }
}

#[test]
fn timed_session_publishes_hold_time() {
    let mut rig = Rig::new(jolt_at_2s);
    rig.press();
    assert_eq!(rig.app.state(), StateId::Armed);

    rig.run_until(2000, 10);

    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.hw.published(HOLD_TIME_TOPIC), vec![2.0]);
    // 40, 80, ... 2000
    assert_eq!(rig.samples_taken, 50);
}

#[test]
fn sampling_stops_after_detection() {
    let mut rig = Rig::new(jolt_at_2s);
    rig.press();
    rig.run_until(2000, 10);
    let taken = rig.samples_taken;

    rig.run_until(5000, 10);
    assert_eq!(rig.samples_taken, taken);
    assert!(rig.sched.timer(TimerId::Sampling).next_due_ms().is_none());
}

#[test]
fn no_samples_before_arming() {
    let mut rig = Rig::new(|_| JOLT);
    rig.run_until(3000, 10);
    assert_eq!(rig.samples_taken, 0);
    assert_eq!(rig.app.state(), StateId::Idle);
}

#[test]
fn rearm_inside_cooldown_ends_quietly() {
    let mut rig = Rig::new(jolt_at_2s);
    rig.press();
    rig.run_until(2000, 10);
    rig.run_until(2500, 10);

    rig.press();
    rig.run_until(2600, 10);

    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.hw.published(HOLD_TIME_TOPIC), vec![2.0]);
    assert_eq!(rig.app.transmit_next_allowed_ms(), 12_000);
    let holds = rig.sink.holds();
    assert_eq!(holds.len(), 2);
    assert!(!holds[1].published);
}

#[test]
fn housekeeping_runs_every_second() {
    let mut rig = Rig::new(|_| STILL);
    rig.run_until(5000, 10);
    let polls = rig
        .hw
        .calls
        .iter()
        .filter(|c| **c == PortCall::RadioPoll)
        .count();
    assert_eq!(polls, 5);
}

#[test]
fn battery_reported_hourly() {
    let mut rig = Rig::new(|_| STILL);
    rig.run_until(3_599_000, 1000);
    assert!(!rig.hw.calls.contains(&PortCall::Battery(3.85)));

    rig.run_until(3_600_000, 1000);
    assert!(rig.hw.calls.contains(&PortCall::Battery(3.85)));
}
