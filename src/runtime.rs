//=========================================================================
// Emberwake Runtime
//
// Owner of the platform seams and driver of the frame loop.
//
// Architecture:
// ```text
//     WinitPlatform ──with_platform()──> Runtime ──run()──> [frame loop]
//         │                                │
//         ├─ WinitDisplay                  └─ each tick:
//         ├─ WindowContext                     1. display liveness check
//         └─ event pump                        2. route pending events
//                                              3. advance the state stack
//                                              4. make_current + present
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::core::clock::{Clock, MonotonicClock};
use crate::core::display::{Display, RenderContext};
use crate::core::event::EventSource;
use crate::core::state::{GameState, RejectedState, StateStack};
use crate::platform::WinitPlatform;

//=== Runtime =============================================================

/// The engine runtime: one state stack wired to one display, one render
/// context, one event source, and one clock.
///
/// Every seam is a boxed trait object, so the runtime runs equally well
/// against the winit-backed platform or against test doubles. The frame
/// protocol is fixed: events are routed before the stack advances, and
/// the render context presents after, every tick, in that order.
///
/// # Examples
///
/// Quick start against the winit platform:
/// ```no_run
/// use emberwake::prelude::*;
///
/// struct Boot;
///
/// impl GameState for Boot {
///     fn on_run(&mut self, ctx: &mut StateContext, _dt_ms: f32) {
///         // One frame of glory, then leave.
///         ctx.pop_state();
///     }
/// }
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let platform = WinitPlatform::new(PlatformConfig::default())?;
///     let mut runtime = Runtime::with_platform(platform);
///     runtime.push(Box::new(Boot))?;
///     runtime.run();
///     Ok(())
/// }
/// ```
pub struct Runtime {
    display: Box<dyn Display>,
    context: Box<dyn RenderContext>,
    events: Box<dyn EventSource>,
    clock: Box<dyn Clock>,
    states: StateStack,
    prev_tick_ms: u64,
}

impl Runtime {
    //--- Construction -----------------------------------------------------

    /// Assembles a runtime from its four seams.
    ///
    /// The first tick's duration is measured from this call, so a slow
    /// setup between construction and the first [`tick`](Runtime::tick)
    /// shows up as a long first frame rather than a zero-length one.
    pub fn new(
        display: Box<dyn Display>,
        context: Box<dyn RenderContext>,
        events: Box<dyn EventSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let prev_tick_ms = clock.now_ms();
        debug!("Runtime assembled, first tick anchored at {} ms", prev_tick_ms);
        Self {
            display,
            context,
            events,
            clock,
            states: StateStack::new(),
            prev_tick_ms,
        }
    }

    /// Assembles a runtime on top of a [`WinitPlatform`], wiring its
    /// window in as the display and render context, its event pump as
    /// the event source, and a [`MonotonicClock`] as the time base.
    pub fn with_platform(platform: WinitPlatform) -> Self {
        let display = Box::new(platform.display());
        let context = Box::new(platform.context());
        Self::new(display, context, Box::new(platform), Box::new(MonotonicClock::new()))
    }

    //--- State Stack Access -----------------------------------------------

    /// Pushes a state onto the stack, activating it immediately.
    ///
    /// See [`StateStack::push`] for the activation protocol. On rejection
    /// the state comes back to the caller untouched.
    pub fn push(&mut self, state: Box<dyn GameState>) -> Result<(), RejectedState> {
        self.states.push(self.display.as_ref(), state)
    }

    /// Pops the top state. Returns `false` when the stack is empty.
    pub fn pop(&mut self) -> bool {
        self.states.pop()
    }

    /// Marks every resident state stopped; the next tick unwinds them.
    pub fn stop(&mut self) {
        self.states.stop()
    }

    /// Read access to the state stack for depth and tag queries.
    pub fn states(&self) -> &StateStack {
        &self.states
    }

    //--- Platform Access --------------------------------------------------

    /// The display this runtime drives.
    pub fn display(&self) -> &dyn Display {
        self.display.as_ref()
    }

    /// Mutable display access, for fullscreen switches and the like.
    pub fn display_mut(&mut self) -> &mut dyn Display {
        self.display.as_mut()
    }

    //--- Execution --------------------------------------------------------

    /// Runs one frame.
    ///
    /// # Frame Protocol
    ///
    /// 1. Checks display liveness; a dead display is reported but the
    ///    frame still runs, leaving shutdown policy to the states.
    /// 2. Drains the event source, routing each event through the stack.
    /// 3. Measures the time since the previous tick and advances every
    ///    state by it.
    /// 4. Binds the render context and presents the frame.
    pub fn tick(&mut self) {
        if !self.display.is_running() {
            error!("Display is no longer running");
        }

        while let Some(event) = self.events.poll_event() {
            self.states.route_event(self.display.as_ref(), &event);
        }

        let now = self.clock.now_ms();
        let dt_ms = now.saturating_sub(self.prev_tick_ms) as f32;
        self.prev_tick_ms = now;
        self.states.advance(self.display.as_ref(), dt_ms);

        self.context.make_current(self.display.as_ref());
        self.context.present(self.display.as_ref());
    }

    /// Runs frames until the state stack is empty.
    ///
    /// The stack empties when every state has stopped itself, popped
    /// itself, or been stopped wholesale by [`stop`](Runtime::stop) or a
    /// quit event. An empty stack at call time returns immediately.
    pub fn run(&mut self) {
        info!("Starting the frame loop");
        while !self.states.is_empty() {
            self.tick();
        }
        info!("Frame loop finished: state stack is empty");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
