//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!          ┌──[press, debounce open]──┐
//!          │                          ▼
//!        IDLE                       ARMED ──[press, debounce open]──▶ ARMED
//!          ▲                          │        (session restarted)
//!          │                          │
//!          └──[|a| outside band]──────┘
//!               publish if transmit gate open
//! ```

use super::context::{FsmContext, LedMode, Outcome, SampleInterval, Session};
use super::{Input, StateDescriptor, StateId};
use crate::motion::Sample;
use log::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_input: idle_input,
        },
        // Index 1 — Armed
        StateDescriptor {
            name: "Armed",
            on_enter: Some(armed_enter),
            on_exit: Some(armed_exit),
            on_input: armed_input,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — sampling off, waiting for a press
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands.sample_interval = SampleInterval::Disabled;
    ctx.commands.led_mode = LedMode::Off;
    info!("IDLE: sampling stopped, waiting for button");
}

fn idle_input(ctx: &mut FsmContext, input: &Input) -> Option<StateId> {
    match input {
        Input::Press => {
            if accept_press(ctx) {
                Some(StateId::Armed)
            } else {
                None
            }
        }
        Input::Sample(_) => {
            // Sampling is disabled while idle; a late delivery from the
            // driver must not touch the session or the gates.
            debug!("IDLE: stray sample at {}ms ignored", ctx.now_ms);
            ctx.outcome = Some(Outcome::StraySample);
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED state — session running, sampling at fixed cadence
// ═══════════════════════════════════════════════════════════════════════════

fn armed_enter(ctx: &mut FsmContext) {
    ctx.session = Some(Session::begin(ctx.now_ms));
    ctx.commands.sample_interval = SampleInterval::Every(ctx.config.sample_interval_ms);
    ctx.commands.led_mode = LedMode::On;
    info!(
        "ARMED: session started at {}ms, sampling every {}ms",
        ctx.now_ms, ctx.config.sample_interval_ms
    );
}

fn armed_exit(ctx: &mut FsmContext) {
    // The detection path already consumed the session; this only matters
    // for forced transitions.
    ctx.session = None;
}

fn armed_input(ctx: &mut FsmContext, input: &Input) -> Option<StateId> {
    match input {
        Input::Press => {
            if accept_press(ctx) {
                // Same as a fresh arm: new start time, re-assert outputs.
                armed_enter(ctx);
                ctx.outcome = Some(Outcome::Rearmed {
                    start_ms: ctx.now_ms,
                });
            }
            None
        }
        Input::Sample(sample) => evaluate_sample(ctx, sample),
    }
}

fn evaluate_sample(ctx: &mut FsmContext, sample: &Sample) -> Option<StateId> {
    if sample.has_nan() {
        warn!("ARMED: NaN sample {:?} ignored", sample);
        ctx.outcome = Some(Outcome::InvalidSample);
        return None;
    }

    let magnitude = sample.magnitude();
    ctx.last_magnitude = magnitude;

    if !ctx.band.is_crossing(magnitude) {
        return None;
    }

    let now = ctx.now_ms;
    let hold_time_secs = match ctx.session.take() {
        Some(mut session) => session.finish(now),
        None => {
            // Unreachable through the table: armed_enter always opens one.
            warn!("ARMED: crossing without a session");
            0.0
        }
    };

    let published = ctx.transmit.try_pass(now);
    if published {
        ctx.commands.pulse_ms = Some(ctx.config.transmit_pulse_ms);
        ctx.commands.publish_hold_time = Some(hold_time_secs);
        info!(
            "ARMED: |a|={:.3}g after {:.3}s, publishing",
            magnitude, hold_time_secs
        );
    } else {
        info!(
            "ARMED: |a|={:.3}g after {:.3}s, radio cooling down until {}ms",
            magnitude,
            hold_time_secs,
            ctx.transmit.next_allowed_ms()
        );
    }

    ctx.outcome = Some(Outcome::HoldMeasured {
        hold_time_secs,
        magnitude,
        published,
    });
    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared
// ═══════════════════════════════════════════════════════════════════════════

fn accept_press(ctx: &mut FsmContext) -> bool {
    if ctx.debounce.try_pass(ctx.now_ms) {
        return true;
    }
    debug!(
        "press at {}ms inside debounce window (open at {}ms)",
        ctx.now_ms,
        ctx.debounce.next_allowed_ms()
    );
    ctx.outcome = Some(Outcome::PressIgnored {
        next_allowed_ms: ctx.debounce.next_allowed_ms(),
    });
    false
}
