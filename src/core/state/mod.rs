//=========================================================================
// Game State System
//=========================================================================
//
// Stack-based application states and their lifecycle.
//
// Architecture:
//   StateStack
//     ├─ entries: Vec<{ StateStatus, Box<dyn GameState> }>
//     └─ transitions: TransitionQueue (deferred push/pop from callbacks)
//
// Flow:
//   route_event() → top state's event callback
//   advance(dt)   → on_run / on_pause per entry, by tag, in index order
//
// Exactly one state is RUNNING at a time and it is always the top of the
// stack; everything beneath it is PAUSED (or parked in INIT/INVALID).
// States request their own shutdown by setting their tag to STOPPED; the
// scheduler tears them down, never the other way around.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::event::{
    ControllerAxisEvent, ControllerButtonEvent, ControllerDeviceEvent, JoystickAxisEvent,
    JoystickBallEvent, JoystickButtonEvent, JoystickDeviceEvent, JoystickHatEvent, KeyboardEvent,
    MouseButtonEvent, MouseMoveEvent, MouseWheelEvent, TextInputEvent, WindowEvent,
};

//=== Module Declarations =================================================

mod context;
mod stack;

//=== Public API ==========================================================

pub use context::{StateContext, StateTransition};
pub use stack::{RejectedState, StateStack};

pub(crate) use context::TransitionQueue;

//=== StateStatus =========================================================

/// Lifecycle tag of a scheduled state.
///
/// Every stack entry carries exactly one tag. The scheduler mutates tags
/// through its push/pop/stop protocols; a state mutates its own through
/// [`StateContext::set_status`], which is how it pauses itself or
/// requests shutdown. Setting a tag is idempotent and never invokes
/// callbacks by itself: the consequences land on the next `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateStatus {
    /// Constructed but not yet scheduled. The scheduler skips it.
    Init,

    /// Receiving `on_run` every tick. At most one entry is running and
    /// it is always the top of the stack.
    Running,

    /// Resident but inactive; receives `on_pause` every tick.
    Paused,

    /// Marked for teardown. The scheduler removes the entry and invokes
    /// `on_stop` during the current or next `advance`.
    Stopped,

    /// Unschedulable sentinel. Skipped like `Init`; never produced by
    /// the scheduler itself.
    Invalid,
}

//=== GameState Trait =====================================================

/// A unit of application behavior scheduled on the [`StateStack`].
///
/// States own their resources exclusively and cooperate through the
/// stack discipline: the top state receives hardware events and runs,
/// lower states tick in the background through `on_pause`. Every
/// callback has a default implementation, so a state overrides only
/// what it needs; the empty impl is a valid (if idle) state.
///
/// All callbacks except [`on_stop`](GameState::on_stop) receive a
/// [`StateContext`] for tag control, display queries and deferred
/// push/pop requests. `on_stop` takes no context because teardown must
/// remain callable while the platform is already being dismantled.
///
/// # Examples
///
/// A state that pauses on Space and shuts itself down on Escape:
///
/// ```
/// use emberwake::prelude::*;
///
/// struct Gameplay {
///     elapsed_ms: f32,
/// }
///
/// impl GameState for Gameplay {
///     fn on_run(&mut self, _ctx: &mut StateContext, dt_ms: f32) {
///         self.elapsed_ms += dt_ms;
///     }
///
///     fn on_key_down(&mut self, ctx: &mut StateContext, event: &KeyboardEvent) {
///         match event.key {
///             KeyCode::Escape => ctx.set_status(StateStatus::Stopped),
///             KeyCode::Space if ctx.status() == StateStatus::Running => {
///                 ctx.set_status(StateStatus::Paused);
///             }
///             KeyCode::Space => ctx.set_status(StateStatus::Running),
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait GameState {
    //--- Lifecycle --------------------------------------------------------

    /// Acquires the state's resources before it enters the stack.
    ///
    /// Returning `false` signals that initialization failed; the push is
    /// abandoned, the stack is left unchanged, and ownership of the
    /// state returns to the caller (see [`StateStack::push`]). Anything
    /// written to the context's tag here is discarded: a successfully
    /// started state always enters the stack as
    /// [`Running`](StateStatus::Running).
    fn on_start(&mut self, _ctx: &mut StateContext<'_>) -> bool {
        true
    }

    /// Releases everything acquired in `on_start`.
    ///
    /// Invoked exactly once, after the state has been removed from
    /// scheduling and before it is dropped. This includes teardown via
    /// [`StateStack::terminate`] and dropping the stack itself.
    fn on_stop(&mut self) {}

    /// Advances the state by `dt_ms` milliseconds while it is the
    /// active (top, running) state.
    fn on_run(&mut self, _ctx: &mut StateContext<'_>, _dt_ms: f32) {}

    /// Ticks the state while it is resident but paused.
    ///
    /// Typically used to keep presenting a frozen frame or to run
    /// background work that must survive being covered by another
    /// state.
    fn on_pause(&mut self, _ctx: &mut StateContext<'_>, _dt_ms: f32) {}

    //--- Keyboard Events --------------------------------------------------

    /// A key was released while this state was on top.
    fn on_key_up(&mut self, _ctx: &mut StateContext<'_>, _event: &KeyboardEvent) {}

    /// A key was pressed (or OS-repeated) while this state was on top.
    fn on_key_down(&mut self, _ctx: &mut StateContext<'_>, _event: &KeyboardEvent) {}

    /// Committed text input arrived while this state was on top.
    fn on_text_input(&mut self, _ctx: &mut StateContext<'_>, _event: &TextInputEvent) {}

    //--- Window Events ----------------------------------------------------

    /// The hosting window changed (resize, focus, close request, ...).
    fn on_window_event(&mut self, _ctx: &mut StateContext<'_>, _event: &WindowEvent) {}

    //--- Mouse Events -----------------------------------------------------

    /// The pointer moved.
    fn on_mouse_move(&mut self, _ctx: &mut StateContext<'_>, _event: &MouseMoveEvent) {}

    /// A mouse button was released.
    fn on_mouse_button_up(&mut self, _ctx: &mut StateContext<'_>, _event: &MouseButtonEvent) {}

    /// A mouse button was pressed.
    fn on_mouse_button_down(&mut self, _ctx: &mut StateContext<'_>, _event: &MouseButtonEvent) {}

    /// The scroll wheel moved.
    fn on_mouse_wheel(&mut self, _ctx: &mut StateContext<'_>, _event: &MouseWheelEvent) {}

    //--- Controller Events ------------------------------------------------

    /// A controller was connected.
    fn on_controller_added(&mut self, _ctx: &mut StateContext<'_>, _event: &ControllerDeviceEvent) {}

    /// A controller was disconnected.
    fn on_controller_removed(&mut self, _ctx: &mut StateContext<'_>, _event: &ControllerDeviceEvent) {}

    /// A controller's button mapping was reloaded.
    fn on_controller_remapped(&mut self, _ctx: &mut StateContext<'_>, _event: &ControllerDeviceEvent) {}

    /// A controller axis moved.
    fn on_controller_axis(&mut self, _ctx: &mut StateContext<'_>, _event: &ControllerAxisEvent) {}

    /// A controller button was released.
    fn on_controller_button_up(&mut self, _ctx: &mut StateContext<'_>, _event: &ControllerButtonEvent) {}

    /// A controller button was pressed.
    fn on_controller_button_down(&mut self, _ctx: &mut StateContext<'_>, _event: &ControllerButtonEvent) {}

    //--- Joystick Events --------------------------------------------------

    /// A raw joystick was connected.
    fn on_joystick_added(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickDeviceEvent) {}

    /// A raw joystick was disconnected.
    fn on_joystick_removed(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickDeviceEvent) {}

    /// A raw joystick axis moved.
    fn on_joystick_axis(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickAxisEvent) {}

    /// A joystick trackball moved.
    fn on_joystick_ball(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickBallEvent) {}

    /// A raw joystick button was released.
    fn on_joystick_button_up(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickButtonEvent) {}

    /// A raw joystick button was pressed.
    fn on_joystick_button_down(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickButtonEvent) {}

    /// A joystick hat switch changed position.
    fn on_joystick_hat(&mut self, _ctx: &mut StateContext<'_>, _event: &JoystickHatEvent) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
