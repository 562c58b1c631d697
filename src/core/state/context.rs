//=========================================================================
// State Context & Transition Queue
//=========================================================================
//
// The view a game state gets of its scheduler for the duration of one
// callback, plus the queue that carries structural requests (push/pop)
// out of that callback.
//
// Tag changes through the context are synchronous: the scheduler reads
// the written tag as soon as the callback returns. Push and pop are
// deferred: they enqueue transitions the scheduler applies after the
// current dispatch completes, so the stack never mutates under an
// in-flight iteration.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;
use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::display::Display;

use super::{GameState, StateStatus};

//=== StateTransition =====================================================

/// A structural stack mutation requested from inside a callback.
///
/// Applied in request order once the current dispatch finishes: at the
/// end of `route_event` for event callbacks, at the end of `advance` for
/// tick callbacks.
pub enum StateTransition {
    /// Push a new state; it activates through the usual `on_start`
    /// protocol. With no caller to hand a refused state back to, a
    /// failed deferred push is logged and dropped.
    Push(Box<dyn GameState>),

    /// Pop whatever is on top of the stack when the queue is applied.
    Pop,
}

impl fmt::Debug for StateTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(_) => f.write_str("Push(..)"),
            Self::Pop => f.write_str("Pop"),
        }
    }
}

//=== TransitionQueue =====================================================

/// FIFO queue of pending transitions.
///
/// Drained front-to-back by the scheduler; transitions enqueued while
/// the queue is being applied (e.g. from a freshly pushed state's
/// `on_start`) are picked up in the same drain.
pub(crate) struct TransitionQueue {
    queue: VecDeque<StateTransition>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub(crate) fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Queues a transition for the next application point.
    pub(crate) fn push(&mut self, transition: StateTransition) {
        self.queue.push_back(transition);
    }

    /// Removes and returns the oldest pending transition.
    pub(crate) fn pop_front(&mut self) -> Option<StateTransition> {
        self.queue.pop_front()
    }

    /// Number of pending transitions.
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is pending.
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every transition queued after the first `len`, newest
    /// first. The scheduler uses this to unwind requests made by an
    /// `on_start` that then refused the push.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.queue.truncate(len);
    }

    /// Discards all pending transitions.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }
}

impl Default for TransitionQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=== StateContext ========================================================

/// The scheduler-side capabilities handed to a state callback.
///
/// Borrowed for exactly the duration of one callback; states cannot
/// retain it. Through the context a state can:
///
/// - read and write its own lifecycle tag ([`status`](Self::status) /
///   [`set_status`](Self::set_status)), which is how it pauses itself or
///   requests shutdown,
/// - query the shared [`Display`] for resolution and liveness,
/// - read the duration of the current scheduler tick,
/// - request deferred structural changes
///   ([`push_state`](Self::push_state) / [`pop_state`](Self::pop_state)).
pub struct StateContext<'a> {
    status: &'a mut StateStatus,
    transitions: &'a mut TransitionQueue,
    display: &'a dyn Display,
    tick_ms: f32,
}

impl<'a> StateContext<'a> {
    pub(crate) fn new(
        status: &'a mut StateStatus,
        transitions: &'a mut TransitionQueue,
        display: &'a dyn Display,
        tick_ms: f32,
    ) -> Self {
        Self { status, transitions, display, tick_ms }
    }

    //--- Lifecycle Tag ----------------------------------------------------

    /// This state's current lifecycle tag.
    pub fn status(&self) -> StateStatus {
        *self.status
    }

    /// Rewrites this state's lifecycle tag.
    ///
    /// Idempotent, and never invokes callbacks by itself. Setting
    /// [`Stopped`](StateStatus::Stopped) requests teardown; the
    /// scheduler honors it when it next examines the entry (within the
    /// same `advance` call for a state stopping itself mid-tick).
    pub fn set_status(&mut self, status: StateStatus) {
        *self.status = status;
    }

    //--- Shared Resources -------------------------------------------------

    /// The display this runtime presents to.
    pub fn display(&self) -> &'a dyn Display {
        self.display
    }

    /// Duration of the current scheduler tick in milliseconds.
    ///
    /// Zero while no tick is in flight (e.g. during a push from
    /// application code before the first frame).
    pub fn tick_ms(&self) -> f32 {
        self.tick_ms
    }

    //--- Deferred Transitions ---------------------------------------------

    /// Requests a push of `state` once the current dispatch finishes.
    ///
    /// Requested from an event callback, the new state is resident (and
    /// this one paused) before the same frame's `advance`.
    pub fn push_state<T: GameState + 'static>(&mut self, state: T) {
        self.push_boxed(Box::new(state));
    }

    /// Boxed form of [`push_state`](Self::push_state).
    pub fn push_boxed(&mut self, state: Box<dyn GameState>) {
        self.transitions.push(StateTransition::Push(state));
    }

    /// Requests a pop of the top entry once the current dispatch
    /// finishes.
    ///
    /// The usual self-removal path is `set_status(Stopped)`; `pop_state`
    /// exists for states that manage companions above themselves (e.g. a
    /// menu dismissing the dialog it spawned).
    pub fn pop_state(&mut self) {
        self.transitions.push(StateTransition::Pop);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
