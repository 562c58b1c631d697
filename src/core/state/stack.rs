//=========================================================================
// State Stack Scheduler
//=========================================================================
//
// An ordered stack of exclusively-owned game states and the scheduler
// that drives them. The stack owns every state pushed into it, tags each
// one with a lifecycle status, and upholds a single activity invariant:
// when the stack is non-empty and healthy, exactly one state is RUNNING
// and it is the top.
//
// Structural mutation is never reentrant. Callbacks request pushes and
// pops through their `StateContext`; the requests queue up and are
// applied after the current dispatch finishes, so the entry vector never
// shifts under an in-flight iteration.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;

//=== External Dependencies ===============================================

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::display::Display;
use crate::core::event::Event;

use super::{GameState, StateContext, StateStatus, StateTransition, TransitionQueue};

//=== RejectedState =======================================================

/// Error returned by [`StateStack::push`] when the new state declines to
/// start.
///
/// Carries the boxed state back out, in the manner of
/// [`std::sync::mpsc::SendError`]: the stack never keeps, retries, or
/// silently drops a state it did not activate. The caller decides
/// whether to fix the cause and push again or to discard the state.
pub struct RejectedState(pub Box<dyn GameState>);

impl RejectedState {
    /// Recovers the state whose `on_start` returned `false`.
    pub fn into_inner(self) -> Box<dyn GameState> {
        self.0
    }
}

impl fmt::Debug for RejectedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RejectedState(..)")
    }
}

impl fmt::Display for RejectedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("state declined to start and was rejected from the stack")
    }
}

impl std::error::Error for RejectedState {}

//=== Stack Entries =======================================================

/// One resident state together with its scheduler-owned lifecycle tag.
struct Entry {
    status: StateStatus,
    state: Box<dyn GameState>,
}

//=== StateStack ==========================================================

/// The ordered collection of live game states and their scheduler.
///
/// States stack bottom-to-top in push order. The top state is the active
/// one: it alone receives hardware events and `on_run` ticks, while the
/// states beneath it sit [`Paused`](StateStatus::Paused) and receive
/// `on_pause` ticks so they can keep background work alive.
///
/// The stack owns its states outright. A state enters through a
/// successful [`push`](StateStack::push) and leaves through exactly one
/// `on_stop` call, whether it stopped itself, was popped, or went down
/// with the stack in [`terminate`](StateStack::terminate).
pub struct StateStack {
    entries: Vec<Entry>,
    transitions: TransitionQueue,
    tick_ms: f32,
}

impl StateStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            transitions: TransitionQueue::new(),
            tick_ms: 0.0,
        }
    }

    //--- Introspection ----------------------------------------------------

    /// Number of resident states, including stopped ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no states are resident.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lifecycle tag of the state at `index`, bottom of the stack first.
    pub fn status_at(&self, index: usize) -> Option<StateStatus> {
        self.entries.get(index).map(|entry| entry.status)
    }

    /// Lifecycle tag of the top state, if any.
    pub fn top_status(&self) -> Option<StateStatus> {
        self.entries.last().map(|entry| entry.status)
    }

    //--- Push & Pop -------------------------------------------------------

    /// Pushes `state` onto the stack and makes it the active state.
    ///
    /// The new state's `on_start` runs first, before the stack changes at
    /// all. If it returns `false` the push is rejected: the stack is left
    /// exactly as it was, push and pop requests queued by the refusing
    /// `on_start` are discarded, and the state comes back in the error. On
    /// success the previous top (if any) is forced to
    /// [`Paused`](StateStatus::Paused) and the new state enters as
    /// [`Running`](StateStatus::Running), whatever tag its `on_start`
    /// may have written.
    pub fn push(
        &mut self,
        display: &dyn Display,
        state: Box<dyn GameState>,
    ) -> Result<(), RejectedState> {
        let result = self.push_now(display, state);
        self.apply_transitions(display);
        result
    }

    /// Pops the top state, running its `on_stop` and dropping it.
    ///
    /// If the state uncovered by the pop is tagged
    /// [`Paused`](StateStatus::Paused) it is promoted back to
    /// [`Running`](StateStatus::Running); any other tag is left alone.
    /// Returns `false` when the stack is empty.
    pub fn pop(&mut self) -> bool {
        if self.entries.is_empty() {
            warn!("Attempted to pop from an empty state stack");
            return false;
        }
        self.remove_at(self.entries.len() - 1);
        true
    }

    /// Pops the state at `index`, counting from the bottom of the stack.
    ///
    /// Follows the same teardown and resume rules as
    /// [`pop`](StateStack::pop). Returns `false` when `index` is out of
    /// range.
    pub fn pop_at(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            warn!(
                "Attempted to pop state index {} but the stack holds {}",
                index,
                self.entries.len()
            );
            return false;
        }
        self.remove_at(index);
        true
    }

    //--- Event Routing ----------------------------------------------------

    /// Delivers one hardware event.
    ///
    /// [`Event::Quit`] is consumed here: it stops every resident state
    /// and is never forwarded. Every other event goes to the top state
    /// alone, unless the top is already tagged
    /// [`Stopped`](StateStatus::Stopped) or the stack is empty, in which
    /// case the event is dropped. Pushes and pops requested by the
    /// callback are applied before this method returns.
    pub fn route_event(&mut self, display: &dyn Display, event: &Event) {
        if matches!(event, Event::Quit) {
            debug!("Quit event received, stopping all states");
            self.stop();
            return;
        }
        match self.entries.last_mut() {
            Some(entry) => {
                let Entry { status, state } = entry;
                if *status == StateStatus::Stopped {
                    trace!("Discarding {:?}: top state is stopped", event);
                } else {
                    let mut ctx =
                        StateContext::new(status, &mut self.transitions, display, self.tick_ms);
                    dispatch(state.as_mut(), &mut ctx, event);
                }
            }
            None => trace!("Discarding {:?}: state stack is empty", event),
        }
        self.apply_transitions(display);
    }

    //--- Advancing --------------------------------------------------------

    /// Advances every resident state by `dt_ms` milliseconds.
    ///
    /// Scans bottom-to-top, dispatching each state once according to the
    /// tag it holds when visited: [`Running`](StateStatus::Running) gets
    /// `on_run`, [`Paused`](StateStatus::Paused) gets `on_pause`,
    /// [`Init`](StateStatus::Init) and [`Invalid`](StateStatus::Invalid)
    /// are skipped. A state tagged [`Stopped`](StateStatus::Stopped) at
    /// its visit, or that stops itself during its own callback, is torn
    /// down within this same call; the states above it slide down one
    /// slot and are still visited exactly once. Pushes and pops queued
    /// by callbacks are applied after the scan.
    pub fn advance(&mut self, display: &dyn Display, dt_ms: f32) {
        self.tick_ms = dt_ms;
        let mut index = 0;
        while index < self.entries.len() {
            let visited = self.entries[index].status;
            if visited == StateStatus::Running || visited == StateStatus::Paused {
                let Entry { status, state } = &mut self.entries[index];
                let mut ctx = StateContext::new(status, &mut self.transitions, display, dt_ms);
                if visited == StateStatus::Running {
                    state.on_run(&mut ctx, dt_ms);
                } else {
                    state.on_pause(&mut ctx, dt_ms);
                }
            }
            if self.entries[index].status == StateStatus::Stopped {
                // The next entry slides into this slot, so the scan
                // index stays put.
                self.remove_at(index);
            } else {
                index += 1;
            }
        }
        self.apply_transitions(display);
    }

    //--- Shutdown ---------------------------------------------------------

    /// Marks every resident state [`Stopped`](StateStatus::Stopped),
    /// bottom state included.
    ///
    /// Teardown is deferred: the next [`advance`](StateStack::advance)
    /// removes the marked states in bottom-to-top order, running each
    /// `on_stop` as it goes, and leaves the stack empty.
    pub fn stop(&mut self) {
        debug!("Stopping all {} resident states", self.entries.len());
        self.tick_ms = 0.0;
        for entry in &mut self.entries {
            entry.status = StateStatus::Stopped;
        }
    }

    /// Tears the whole stack down immediately.
    ///
    /// Every resident state, bottom state included, is marked
    /// [`Stopped`](StateStatus::Stopped) and then removed top-down with
    /// its `on_stop` run. Pending transition requests are discarded.
    /// The stack is empty when this returns.
    pub fn terminate(&mut self) {
        if self.entries.is_empty() && self.transitions.is_empty() {
            return;
        }
        debug!(
            "Terminating state stack with {} states resident",
            self.entries.len()
        );
        self.transitions.clear();
        for entry in &mut self.entries {
            entry.status = StateStatus::Stopped;
        }
        while let Some(entry) = self.entries.pop() {
            let mut state = entry.state;
            state.on_stop();
        }
        self.tick_ms = 0.0;
    }

    //--- Internals --------------------------------------------------------

    /// The push protocol, without the trailing transition drain.
    fn push_now(
        &mut self,
        display: &dyn Display,
        mut state: Box<dyn GameState>,
    ) -> Result<(), RejectedState> {
        // The candidate runs on_start against a scratch tag. Whatever it
        // writes there is discarded: a started state always enters as
        // Running.
        let mut scratch = StateStatus::Init;
        let pending = self.transitions.len();
        let started = {
            let mut ctx =
                StateContext::new(&mut scratch, &mut self.transitions, display, self.tick_ms);
            state.on_start(&mut ctx)
        };
        if !started {
            // Requests the refusing on_start queued go with it; a failed
            // push leaves nothing behind, transitions included.
            self.transitions.truncate(pending);
            warn!("State declined to start, rejecting push");
            return Err(RejectedState(state));
        }
        if let Some(top) = self.entries.last_mut() {
            top.status = StateStatus::Paused;
        }
        debug!("Pushing state onto stack at index {}", self.entries.len());
        self.entries.push(Entry {
            status: StateStatus::Running,
            state,
        });
        Ok(())
    }

    /// Removes the entry at `index`, runs its `on_stop`, and promotes a
    /// paused top if one is uncovered.
    fn remove_at(&mut self, index: usize) {
        debug!("Removing state from stack at position {}", index);
        let entry = self.entries.remove(index);
        let mut state = entry.state;
        state.on_stop();
        drop(state);
        if let Some(top) = self.entries.last_mut() {
            if top.status == StateStatus::Paused {
                debug!("Resuming paused state at top of stack");
                top.status = StateStatus::Running;
            }
        }
    }

    /// Applies queued transitions in request order. Requests queued while
    /// draining, such as a push made from a deferred state's `on_start`,
    /// are applied in the same drain.
    fn apply_transitions(&mut self, display: &dyn Display) {
        while let Some(transition) = self.transitions.pop_front() {
            match transition {
                StateTransition::Push(state) => {
                    if self.push_now(display, state).is_err() {
                        warn!("Deferred push rejected, dropping the state");
                    }
                }
                StateTransition::Pop => {
                    self.pop();
                }
            }
        }
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Resident states go down with the stack: each still gets its `on_stop`.
impl Drop for StateStack {
    fn drop(&mut self) {
        self.terminate();
    }
}

//=== Event Dispatch ======================================================

/// Routes one event to the matching [`GameState`] callback.
fn dispatch(state: &mut dyn GameState, ctx: &mut StateContext<'_>, event: &Event) {
    match event {
        // Consumed by route_event before dispatch.
        Event::Quit => {}
        Event::Window(e) => state.on_window_event(ctx, e),
        Event::KeyUp(e) => state.on_key_up(ctx, e),
        Event::KeyDown(e) => state.on_key_down(ctx, e),
        Event::TextInput(e) => state.on_text_input(ctx, e),
        Event::MouseMove(e) => state.on_mouse_move(ctx, e),
        Event::MouseButtonUp(e) => state.on_mouse_button_up(ctx, e),
        Event::MouseButtonDown(e) => state.on_mouse_button_down(ctx, e),
        Event::MouseWheel(e) => state.on_mouse_wheel(ctx, e),
        Event::ControllerAdded(e) => state.on_controller_added(ctx, e),
        Event::ControllerRemoved(e) => state.on_controller_removed(ctx, e),
        Event::ControllerRemapped(e) => state.on_controller_remapped(ctx, e),
        Event::ControllerAxis(e) => state.on_controller_axis(ctx, e),
        Event::ControllerButtonUp(e) => state.on_controller_button_up(ctx, e),
        Event::ControllerButtonDown(e) => state.on_controller_button_down(ctx, e),
        Event::JoystickAdded(e) => state.on_joystick_added(ctx, e),
        Event::JoystickRemoved(e) => state.on_joystick_removed(ctx, e),
        Event::JoystickAxis(e) => state.on_joystick_axis(ctx, e),
        Event::JoystickBall(e) => state.on_joystick_ball(ctx, e),
        Event::JoystickButtonUp(e) => state.on_joystick_button_up(ctx, e),
        Event::JoystickButtonDown(e) => state.on_joystick_button_down(ctx, e),
        Event::JoystickHat(e) => state.on_joystick_hat(ctx, e),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::display::FullscreenMode;
    use crate::core::event::{
        ControllerAxis, ControllerAxisEvent, ControllerButton, ControllerButtonEvent,
        ControllerDeviceEvent, HatPosition, JoystickAxisEvent, JoystickBallEvent,
        JoystickButtonEvent, JoystickDeviceEvent, JoystickHatEvent, KeyCode, KeyboardEvent,
        Modifiers, MouseButton, MouseButtonEvent, MouseMoveEvent, MouseWheelEvent,
        TextInputEvent, WindowEvent,
    };

    //--- Test Fixtures ----------------------------------------------------

    type CallLog = Rc<RefCell<Vec<String>>>;

    fn call_log() -> CallLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn taken(log: &CallLog) -> Vec<String> {
        log.borrow_mut().drain(..).collect()
    }

    fn key_down() -> Event {
        Event::KeyDown(KeyboardEvent {
            key: KeyCode::Space,
            modifiers: Modifiers::NONE,
            repeat: false,
        })
    }

    struct BareDisplay;

    impl Display for BareDisplay {
        fn resolution(&self) -> (u32, u32) {
            (640, 480)
        }

        fn is_running(&self) -> bool {
            true
        }

        fn set_fullscreen_mode(&mut self, _mode: FullscreenMode) {}

        fn fullscreen_mode(&self) -> FullscreenMode {
            FullscreenMode::Windowed
        }
    }

    type Hook = Box<dyn FnMut(&mut StateContext<'_>)>;

    /// Scriptable state that records each lifecycle callback it handles.
    struct ScriptedState {
        name: &'static str,
        log: CallLog,
        start_ok: bool,
        start_hook: Option<Hook>,
        run_hook: Option<Hook>,
        pause_hook: Option<Hook>,
        key_down_hook: Option<Hook>,
    }

    impl ScriptedState {
        fn new(name: &'static str, log: &CallLog) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                start_ok: true,
                start_hook: None,
                run_hook: None,
                pause_hook: None,
                key_down_hook: None,
            }
        }

        fn failing(name: &'static str, log: &CallLog) -> Self {
            Self {
                start_ok: false,
                ..Self::new(name, log)
            }
        }

        fn with_start_hook(mut self, hook: impl FnMut(&mut StateContext<'_>) + 'static) -> Self {
            self.start_hook = Some(Box::new(hook));
            self
        }

        fn with_run_hook(mut self, hook: impl FnMut(&mut StateContext<'_>) + 'static) -> Self {
            self.run_hook = Some(Box::new(hook));
            self
        }

        fn with_pause_hook(mut self, hook: impl FnMut(&mut StateContext<'_>) + 'static) -> Self {
            self.pause_hook = Some(Box::new(hook));
            self
        }

        fn with_key_down_hook(
            mut self,
            hook: impl FnMut(&mut StateContext<'_>) + 'static,
        ) -> Self {
            self.key_down_hook = Some(Box::new(hook));
            self
        }

        fn record(&self, call: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, call));
        }
    }

    impl GameState for ScriptedState {
        fn on_start(&mut self, ctx: &mut StateContext<'_>) -> bool {
            self.record("start");
            if let Some(hook) = self.start_hook.as_mut() {
                hook(ctx);
            }
            self.start_ok
        }

        fn on_stop(&mut self) {
            self.record("stop");
        }

        fn on_run(&mut self, ctx: &mut StateContext<'_>, _dt_ms: f32) {
            self.record("run");
            if let Some(hook) = self.run_hook.as_mut() {
                hook(ctx);
            }
        }

        fn on_pause(&mut self, ctx: &mut StateContext<'_>, _dt_ms: f32) {
            self.record("pause");
            if let Some(hook) = self.pause_hook.as_mut() {
                hook(ctx);
            }
        }

        fn on_key_down(&mut self, ctx: &mut StateContext<'_>, _event: &KeyboardEvent) {
            self.record("key_down");
            if let Some(hook) = self.key_down_hook.as_mut() {
                hook(ctx);
            }
        }
    }

    fn push_scripted(
        stack: &mut StateStack,
        display: &dyn Display,
        name: &'static str,
        log: &CallLog,
    ) {
        stack
            .push(display, Box::new(ScriptedState::new(name, log)))
            .unwrap_or_else(|_| panic!("scripted state {name} should start"));
    }

    //--- Push Tests -------------------------------------------------------

    /// Pushing activates the new state and pauses the previous top.
    #[test]
    fn push_activates_the_new_state_and_pauses_the_old_top() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();

        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);

        assert_eq!(taken(&log), ["a:start", "b:start"]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.status_at(0), Some(StateStatus::Paused));
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// A push whose on_start returns false leaves the stack untouched and
    /// hands the state back.
    #[test]
    fn failed_on_start_rejects_the_push_and_returns_the_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);

        let result = stack.push(&display, Box::new(ScriptedState::failing("b", &log)));

        let rejected = result.err().expect("push should be rejected");
        assert_eq!(taken(&log), ["a:start", "b:start"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));

        // Ownership comes back; on_stop was never run on the reject.
        let _state = rejected.into_inner();
        assert!(taken(&log).is_empty());
    }

    /// A rejected push against an empty stack leaves it empty.
    #[test]
    fn failed_on_start_leaves_an_empty_stack_empty() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();

        let result = stack.push(&display, Box::new(ScriptedState::failing("a", &log)));

        assert!(result.is_err());
        assert!(stack.is_empty());
        assert_eq!(stack.top_status(), None);
    }

    /// Push and pop requests queued by a refusing on_start are discarded
    /// with it: neither the queued state nor the queued pop touches the
    /// stack.
    #[test]
    fn a_rejected_push_discards_the_transitions_it_queued() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        taken(&log);

        let inner_log = Rc::clone(&log);
        let result = stack.push(
            &display,
            Box::new(ScriptedState::failing("b", &log).with_start_hook(move |ctx| {
                ctx.push_state(ScriptedState::new("c", &inner_log));
                ctx.pop_state();
            })),
        );

        assert!(result.is_err());
        assert_eq!(taken(&log), ["b:start"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// A deferred push that fails to start takes its own queued requests
    /// down with it, leaving the rest of the drain unaffected.
    #[test]
    fn a_rejected_deferred_push_discards_the_transitions_it_queued() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();

        let hook_log = Rc::clone(&log);
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("a", &log).with_key_down_hook(move |ctx| {
                    let inner_log = Rc::clone(&hook_log);
                    ctx.push_state(ScriptedState::failing("b", &hook_log).with_start_hook(
                        move |ctx| {
                            ctx.push_state(ScriptedState::new("c", &inner_log));
                            ctx.pop_state();
                        },
                    ));
                })),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());

        assert_eq!(taken(&log), ["a:key_down", "b:start"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// Tag writes made during on_start are discarded; a started state
    /// always enters as Running.
    #[test]
    fn a_started_state_always_enters_as_running() {
        struct EagerPauser;

        impl GameState for EagerPauser {
            fn on_start(&mut self, ctx: &mut StateContext<'_>) -> bool {
                ctx.set_status(StateStatus::Paused);
                true
            }
        }

        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(&display, Box::new(EagerPauser))
            .expect("push should succeed");

        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    //--- Pop Tests --------------------------------------------------------

    /// Popping runs on_stop and promotes the paused state underneath.
    #[test]
    fn pop_runs_on_stop_and_resumes_the_paused_top() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        taken(&log);

        assert!(stack.pop());

        assert_eq!(taken(&log), ["b:stop"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// A pop never promotes a new top that is not tagged Paused.
    #[test]
    fn pop_does_not_resume_a_stopped_top() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        stack.stop();

        assert!(stack.pop());

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Stopped));
    }

    /// An explicit return to Init also blocks the resume-on-pop promotion.
    #[test]
    fn pop_does_not_resume_an_init_top() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("a", &log)
                        .with_pause_hook(|ctx| ctx.set_status(StateStatus::Init)),
                ),
            )
            .expect("push should succeed");
        push_scripted(&mut stack, &display, "b", &log);
        stack.advance(&display, 16.0);
        taken(&log);

        assert!(stack.pop());

        assert_eq!(taken(&log), ["b:stop"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Init));
    }

    /// Popping an empty stack reports failure without panicking.
    #[test]
    fn pop_on_an_empty_stack_is_rejected() {
        let mut stack = StateStack::new();
        assert!(!stack.pop());
        assert!(!stack.pop_at(0));
    }

    /// pop_at removes a buried state without disturbing the active top.
    #[test]
    fn pop_at_removes_mid_stack_without_touching_the_top() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        push_scripted(&mut stack, &display, "c", &log);
        taken(&log);

        assert!(stack.pop_at(1));

        assert_eq!(taken(&log), ["b:stop"]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.status_at(0), Some(StateStatus::Paused));
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// An out-of-range index is reported and changes nothing.
    #[test]
    fn pop_at_out_of_range_is_rejected() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);

        assert!(!stack.pop_at(3));
        assert_eq!(stack.len(), 1);
    }

    /// Any removal re-checks the top: a paused top is resumed even when
    /// the removed state was buried.
    #[test]
    fn removal_resumes_a_paused_top_even_for_mid_stack_pops() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("b", &log)
                        .with_key_down_hook(|ctx| ctx.set_status(StateStatus::Paused)),
                ),
            )
            .expect("push should succeed");
        stack.route_event(&display, &key_down());
        assert_eq!(stack.top_status(), Some(StateStatus::Paused));

        assert!(stack.pop_at(0));

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    //--- Event Routing Tests ----------------------------------------------

    /// Hardware events reach the top state and no other.
    #[test]
    fn route_event_reaches_only_the_top_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        taken(&log);

        stack.route_event(&display, &key_down());

        assert_eq!(taken(&log), ["b:key_down"]);
    }

    /// Every forwarded event kind lands on its own callback, and only
    /// that one.
    #[test]
    fn route_event_dispatches_each_kind_to_its_callback() {
        struct DispatchRecorder {
            log: CallLog,
        }

        impl DispatchRecorder {
            fn record(&self, call: &str) {
                self.log.borrow_mut().push(call.to_owned());
            }
        }

        impl GameState for DispatchRecorder {
            fn on_key_up(&mut self, _ctx: &mut StateContext<'_>, _event: &KeyboardEvent) {
                self.record("key_up");
            }

            fn on_key_down(&mut self, _ctx: &mut StateContext<'_>, _event: &KeyboardEvent) {
                self.record("key_down");
            }

            fn on_text_input(&mut self, _ctx: &mut StateContext<'_>, _event: &TextInputEvent) {
                self.record("text_input");
            }

            fn on_window_event(&mut self, _ctx: &mut StateContext<'_>, _event: &WindowEvent) {
                self.record("window_event");
            }

            fn on_mouse_move(&mut self, _ctx: &mut StateContext<'_>, _event: &MouseMoveEvent) {
                self.record("mouse_move");
            }

            fn on_mouse_button_up(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &MouseButtonEvent,
            ) {
                self.record("mouse_button_up");
            }

            fn on_mouse_button_down(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &MouseButtonEvent,
            ) {
                self.record("mouse_button_down");
            }

            fn on_mouse_wheel(&mut self, _ctx: &mut StateContext<'_>, _event: &MouseWheelEvent) {
                self.record("mouse_wheel");
            }

            fn on_controller_added(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &ControllerDeviceEvent,
            ) {
                self.record("controller_added");
            }

            fn on_controller_removed(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &ControllerDeviceEvent,
            ) {
                self.record("controller_removed");
            }

            fn on_controller_remapped(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &ControllerDeviceEvent,
            ) {
                self.record("controller_remapped");
            }

            fn on_controller_axis(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &ControllerAxisEvent,
            ) {
                self.record("controller_axis");
            }

            fn on_controller_button_up(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &ControllerButtonEvent,
            ) {
                self.record("controller_button_up");
            }

            fn on_controller_button_down(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &ControllerButtonEvent,
            ) {
                self.record("controller_button_down");
            }

            fn on_joystick_added(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &JoystickDeviceEvent,
            ) {
                self.record("joystick_added");
            }

            fn on_joystick_removed(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &JoystickDeviceEvent,
            ) {
                self.record("joystick_removed");
            }

            fn on_joystick_axis(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &JoystickAxisEvent,
            ) {
                self.record("joystick_axis");
            }

            fn on_joystick_ball(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &JoystickBallEvent,
            ) {
                self.record("joystick_ball");
            }

            fn on_joystick_button_up(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &JoystickButtonEvent,
            ) {
                self.record("joystick_button_up");
            }

            fn on_joystick_button_down(
                &mut self,
                _ctx: &mut StateContext<'_>,
                _event: &JoystickButtonEvent,
            ) {
                self.record("joystick_button_down");
            }

            fn on_joystick_hat(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickHatEvent) {
                self.record("joystick_hat");
            }
        }

        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(&display, Box::new(DispatchRecorder { log: Rc::clone(&log) }))
            .expect("push should succeed");

        let events = [
            Event::Window(WindowEvent::FocusGained),
            Event::KeyUp(KeyboardEvent {
                key: KeyCode::KeyQ,
                modifiers: Modifiers::NONE,
                repeat: false,
            }),
            key_down(),
            Event::TextInput(TextInputEvent { text: "q".to_owned() }),
            Event::MouseMove(MouseMoveEvent { x: 8.0, y: 6.0, dx: 1.0, dy: -1.0 }),
            Event::MouseButtonUp(MouseButtonEvent {
                button: MouseButton::Left,
                modifiers: Modifiers::NONE,
                x: 8.0,
                y: 6.0,
            }),
            Event::MouseButtonDown(MouseButtonEvent {
                button: MouseButton::Right,
                modifiers: Modifiers::NONE,
                x: 8.0,
                y: 6.0,
            }),
            Event::MouseWheel(MouseWheelEvent { dx: 0.0, dy: 1.0 }),
            Event::ControllerAdded(ControllerDeviceEvent { device: 0 }),
            Event::ControllerRemoved(ControllerDeviceEvent { device: 0 }),
            Event::ControllerRemapped(ControllerDeviceEvent { device: 0 }),
            Event::ControllerAxis(ControllerAxisEvent {
                device: 0,
                axis: ControllerAxis::LeftX,
                value: 0.5,
            }),
            Event::ControllerButtonUp(ControllerButtonEvent {
                device: 0,
                button: ControllerButton::A,
            }),
            Event::ControllerButtonDown(ControllerButtonEvent {
                device: 0,
                button: ControllerButton::B,
            }),
            Event::JoystickAdded(JoystickDeviceEvent { device: 1 }),
            Event::JoystickRemoved(JoystickDeviceEvent { device: 1 }),
            Event::JoystickAxis(JoystickAxisEvent { device: 1, axis: 0, value: -0.5 }),
            Event::JoystickBall(JoystickBallEvent { device: 1, ball: 0, dx: 3, dy: -2 }),
            Event::JoystickButtonUp(JoystickButtonEvent { device: 1, button: 4 }),
            Event::JoystickButtonDown(JoystickButtonEvent { device: 1, button: 5 }),
            Event::JoystickHat(JoystickHatEvent { device: 1, hat: 0, position: HatPosition::Up }),
        ];
        for event in &events {
            stack.route_event(&display, event);
        }

        assert_eq!(
            taken(&log),
            [
                "window_event",
                "key_up",
                "key_down",
                "text_input",
                "mouse_move",
                "mouse_button_up",
                "mouse_button_down",
                "mouse_wheel",
                "controller_added",
                "controller_removed",
                "controller_remapped",
                "controller_axis",
                "controller_button_up",
                "controller_button_down",
                "joystick_added",
                "joystick_removed",
                "joystick_axis",
                "joystick_ball",
                "joystick_button_up",
                "joystick_button_down",
                "joystick_hat",
            ]
        );
    }

    /// Events against an empty stack are dropped quietly.
    #[test]
    fn route_event_on_an_empty_stack_is_dropped() {
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack.route_event(&display, &key_down());
        assert!(stack.is_empty());
    }

    /// A stopped top no longer receives events.
    #[test]
    fn route_event_skips_a_stopped_top() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        stack.stop();
        taken(&log);

        stack.route_event(&display, &key_down());

        assert!(taken(&log).is_empty());
    }

    /// Quit stops every state and is never forwarded to a callback.
    #[test]
    fn quit_stops_every_state_without_forwarding() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        taken(&log);

        stack.route_event(&display, &Event::Quit);

        assert!(taken(&log).is_empty());
        assert_eq!(stack.status_at(0), Some(StateStatus::Stopped));
        assert_eq!(stack.status_at(1), Some(StateStatus::Stopped));
    }

    /// A push requested inside an event callback is resident before
    /// route_event returns.
    #[test]
    fn push_requested_during_an_event_lands_before_route_event_returns() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        let guest_log = Rc::clone(&log);
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("a", &log).with_key_down_hook(move |ctx| {
                    ctx.push_state(ScriptedState::new("b", &guest_log));
                })),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());

        assert_eq!(taken(&log), ["a:key_down", "b:start"]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.status_at(0), Some(StateStatus::Paused));
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// A pop requested inside an event callback lands before route_event
    /// returns, the pause-menu dismissal pattern.
    #[test]
    fn pop_requested_during_an_event_lands_before_route_event_returns() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("b", &log).with_key_down_hook(|ctx| ctx.pop_state())),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());

        assert_eq!(taken(&log), ["b:key_down", "b:stop"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// A deferred push whose on_start fails is dropped, not installed.
    #[test]
    fn deferred_push_that_fails_to_start_is_dropped() {
        struct FailingGuest {
            _marker: Rc<()>,
        }

        impl GameState for FailingGuest {
            fn on_start(&mut self, _ctx: &mut StateContext<'_>) -> bool {
                false
            }
        }

        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        let marker = Rc::new(());
        let guest_marker = Rc::clone(&marker);
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("a", &log).with_key_down_hook(move |ctx| {
                    ctx.push_state(FailingGuest {
                        _marker: Rc::clone(&guest_marker),
                    });
                })),
            )
            .expect("push should succeed");

        stack.route_event(&display, &key_down());

        // Two handles left: ours and the hook's. The guest's clone died
        // with the rejected state.
        assert_eq!(stack.len(), 1);
        assert_eq!(Rc::strong_count(&marker), 2);
        drop(stack);
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    /// A transition queued by a deferred state's on_start is applied in
    /// the same drain.
    #[test]
    fn transitions_queued_while_draining_apply_in_the_same_drain() {
        struct Chainer {
            log: CallLog,
        }

        impl GameState for Chainer {
            fn on_start(&mut self, ctx: &mut StateContext<'_>) -> bool {
                self.log.borrow_mut().push("chain:start".to_owned());
                ctx.push_state(ScriptedState::new("leaf", &self.log));
                true
            }
        }

        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        let chain_log = Rc::clone(&log);
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("a", &log).with_key_down_hook(move |ctx| {
                    ctx.push_state(Chainer {
                        log: Rc::clone(&chain_log),
                    });
                })),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());

        assert_eq!(taken(&log), ["a:key_down", "chain:start", "leaf:start"]);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.status_at(1), Some(StateStatus::Paused));
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    //--- Advance Tests ----------------------------------------------------

    /// One advance visits every state bottom-to-top, pausing the buried
    /// ones and running the top.
    #[test]
    fn advance_visits_every_state_in_index_order() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        push_scripted(&mut stack, &display, "c", &log);
        taken(&log);

        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:pause", "b:pause", "c:run"]);
    }

    /// The tick duration reaches callbacks both as the dt argument and
    /// through the context.
    #[test]
    fn advance_reports_the_tick_duration() {
        struct DtWitness {
            seen: Rc<RefCell<Vec<f32>>>,
        }

        impl GameState for DtWitness {
            fn on_run(&mut self, ctx: &mut StateContext<'_>, dt_ms: f32) {
                assert_eq!(ctx.tick_ms(), dt_ms);
                self.seen.borrow_mut().push(dt_ms);
            }
        }

        let display = BareDisplay;
        let mut stack = StateStack::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        stack
            .push(
                &display,
                Box::new(DtWitness {
                    seen: Rc::clone(&seen),
                }),
            )
            .expect("push should succeed");

        stack.advance(&display, 16.0);
        stack.advance(&display, 33.0);

        assert_eq!(*seen.borrow(), [16.0, 33.0]);
    }

    /// A state that flags itself Invalid stays resident but receives no
    /// further callbacks.
    #[test]
    fn advance_skips_an_invalid_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("a", &log)
                        .with_run_hook(|ctx| ctx.set_status(StateStatus::Invalid)),
                ),
            )
            .expect("push should succeed");
        taken(&log);

        stack.advance(&display, 16.0);
        assert_eq!(taken(&log), ["a:run"]);

        stack.advance(&display, 16.0);
        assert!(taken(&log).is_empty());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Invalid));
    }

    /// An Init-tagged state is likewise held out of the tick rotation.
    #[test]
    fn advance_skips_an_init_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("a", &log)
                        .with_key_down_hook(|ctx| ctx.set_status(StateStatus::Init)),
                ),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());
        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:key_down"]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top_status(), Some(StateStatus::Init));
    }

    /// A state that stops itself mid-run is torn down within the same
    /// advance call.
    #[test]
    fn a_state_stopping_itself_is_torn_down_in_the_same_advance() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("a", &log)
                        .with_run_hook(|ctx| ctx.set_status(StateStatus::Stopped)),
                ),
            )
            .expect("push should succeed");
        taken(&log);

        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:run", "a:stop"]);
        assert!(stack.is_empty());
    }

    /// A state that stops itself while handling a key press survives the
    /// event dispatch and is removed by the next advance.
    #[test]
    fn a_state_stopped_during_an_event_is_removed_by_the_next_advance() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("a", &log)
                        .with_key_down_hook(|ctx| ctx.set_status(StateStatus::Stopped)),
                ),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());
        assert_eq!(stack.len(), 1);

        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:key_down", "a:stop"]);
        assert!(stack.is_empty());
    }

    /// Removing a mid-scan entry slides its neighbors down without
    /// skipping or re-visiting any of them.
    #[test]
    fn mid_scan_removal_does_not_skip_the_next_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("b", &log)
                        .with_pause_hook(|ctx| ctx.set_status(StateStatus::Stopped)),
                ),
            )
            .expect("push should succeed");
        push_scripted(&mut stack, &display, "c", &log);
        taken(&log);

        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:pause", "b:pause", "b:stop", "c:run"]);
        assert_eq!(stack.len(), 2);
    }

    /// stop() marks every resident state, the bottom entry included.
    #[test]
    fn stop_marks_every_state_including_the_bottom() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);

        stack.stop();

        assert_eq!(stack.status_at(0), Some(StateStatus::Stopped));
        assert_eq!(stack.status_at(1), Some(StateStatus::Stopped));
    }

    /// After stop(), a single advance empties the stack bottom-to-top.
    #[test]
    fn one_advance_after_stop_empties_the_stack_in_index_order() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        push_scripted(&mut stack, &display, "c", &log);
        stack.stop();
        taken(&log);

        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:stop", "b:stop", "c:stop"]);
        assert!(stack.is_empty());
    }

    /// A state promoted by a same-scan teardown is not re-dispatched in
    /// that scan.
    #[test]
    fn promotion_during_teardown_does_not_redispatch_the_promoted_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        stack
            .push(
                &display,
                Box::new(
                    ScriptedState::new("b", &log)
                        .with_run_hook(|ctx| ctx.set_status(StateStatus::Stopped)),
                ),
            )
            .expect("push should succeed");
        taken(&log);

        stack.advance(&display, 16.0);

        // a was visited as Paused, then promoted when b went down. It is
        // not run a second time until the next advance.
        assert_eq!(taken(&log), ["a:pause", "b:run", "b:stop"]);
        assert_eq!(stack.top_status(), Some(StateStatus::Running));

        stack.advance(&display, 16.0);
        assert_eq!(taken(&log), ["a:run"]);
    }

    /// A push requested during the scan is applied after it, so the new
    /// state is not ticked until the next advance.
    #[test]
    fn push_requested_during_advance_lands_after_the_scan() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        let guest_log = Rc::clone(&log);
        let mut pushed = false;
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("a", &log).with_run_hook(move |ctx| {
                    if !pushed {
                        pushed = true;
                        ctx.push_state(ScriptedState::new("b", &guest_log));
                    }
                })),
            )
            .expect("push should succeed");
        taken(&log);

        stack.advance(&display, 16.0);

        assert_eq!(taken(&log), ["a:run", "b:start"]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.status_at(0), Some(StateStatus::Paused));
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
    }

    /// A top state can park itself with a tag write and later resume, the
    /// user-facing pause menu pattern.
    #[test]
    fn a_state_can_toggle_itself_between_running_and_paused() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        stack
            .push(
                &display,
                Box::new(ScriptedState::new("a", &log).with_key_down_hook(|ctx| {
                    let next = if ctx.status() == StateStatus::Running {
                        StateStatus::Paused
                    } else {
                        StateStatus::Running
                    };
                    ctx.set_status(next);
                })),
            )
            .expect("push should succeed");
        taken(&log);

        stack.route_event(&display, &key_down());
        assert_eq!(stack.top_status(), Some(StateStatus::Paused));
        stack.advance(&display, 16.0);
        assert_eq!(taken(&log), ["a:key_down", "a:pause"]);

        // Still top, still receiving events: one more toggle resumes it.
        stack.route_event(&display, &key_down());
        assert_eq!(stack.top_status(), Some(StateStatus::Running));
        stack.advance(&display, 16.0);
        assert_eq!(taken(&log), ["a:key_down", "a:run"]);
    }

    //--- Shutdown Tests ---------------------------------------------------

    /// terminate() tears every state down immediately, top first, bottom
    /// entry included.
    #[test]
    fn terminate_tears_down_every_state_top_down() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        push_scripted(&mut stack, &display, "b", &log);
        taken(&log);

        stack.terminate();

        assert_eq!(taken(&log), ["b:stop", "a:stop"]);
        assert!(stack.is_empty());
    }

    /// Dropping the stack tears down whatever is still resident.
    #[test]
    fn drop_terminates_resident_states() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        taken(&log);

        drop(stack);

        assert_eq!(taken(&log), ["a:stop"]);
    }

    /// on_stop runs exactly once per state no matter how it leaves.
    #[test]
    fn on_stop_runs_exactly_once_per_state() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        push_scripted(&mut stack, &display, "a", &log);
        stack.stop();
        stack.advance(&display, 0.0);
        drop(stack);

        let stops = log
            .borrow()
            .iter()
            .filter(|call| call.as_str() == "a:stop")
            .count();
        assert_eq!(stops, 1);
    }

    //--- Introspection Tests ----------------------------------------------

    /// Depth and tag accessors track the resident states.
    #[test]
    fn introspection_reports_depth_and_tags() {
        let log = call_log();
        let display = BareDisplay;
        let mut stack = StateStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.top_status(), None);
        assert_eq!(stack.status_at(0), None);

        push_scripted(&mut stack, &display, "a", &log);

        assert_eq!(stack.len(), 1);
        assert!(!stack.is_empty());
        assert_eq!(stack.status_at(0), Some(StateStatus::Running));
        assert_eq!(stack.status_at(1), None);
    }

    /// The rejection error formats without exposing the state.
    #[test]
    fn rejected_state_formats_opaquely() {
        let log = call_log();
        let rejected = RejectedState(Box::new(ScriptedState::failing("a", &log)));
        assert_eq!(format!("{rejected:?}"), "RejectedState(..)");
        assert!(format!("{rejected}").contains("declined to start"));
    }
}
