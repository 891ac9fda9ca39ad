//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern expressed in safe Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                      │
//! │  ┌─────────┬───────────┬──────────┬────────────────────────────┐ │
//! │  │ StateId │ on_enter  │ on_exit  │ on_input                   │ │
//! │  ├─────────┼───────────┼──────────┼────────────────────────────┤ │
//! │  │ Idle    │ fn(ctx)   │ fn(ctx)  │ fn(ctx, &Input)->Option<>  │ │
//! │  │ Armed   │ fn(ctx)   │ fn(ctx)  │ fn(ctx, &Input)->Option<>  │ │
//! │  └─────────┴───────────┴──────────┴────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions are driven by inputs, not ticks: for every button press or
//! accelerometer sample the engine calls `on_input` for the **current**
//! state.  If it returns `Some(next_id)`, the engine runs `on_exit` for
//! the current state, then `on_enter` for the next.  All functions
//! receive `&mut FsmContext`, which holds the session, gates, config and
//! output commands.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::motion::Sample;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Measurement lifecycle states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Armed = 1,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a table index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Armed,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Inputs the state machine reacts to.  `ctx.now_ms` carries the time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Press,
    Sample(Sample),
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-input handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateInputFn = fn(&mut FsmContext, &Input) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_input: StateInputFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Completed transitions since start.
    transition_count: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            transition_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `handle()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one input to the current state and apply any transition.
    /// Returns the state after handling.
    pub fn handle(&mut self, input: &Input, ctx: &mut FsmContext) -> StateId {
        ctx.outcome = None;

        let next = (self.table[self.current].on_input)(ctx, input);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
        self.current_state()
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    #[cfg(test)]
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition #{}: {} -> {}",
            self.transition_count + 1,
            self.table[self.current].name,
            self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transition_count += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
