//=========================================================================
// Hardware Event Types
//
// Defines the portable representation of hardware events routed to game
// states, and the source contract the run loop drains them from.
//
// This module abstracts away platform-specific input (e.g. Winit, SDL)
// into a unified, engine-friendly format. The scheduler dispatches each
// event kind to the matching callback on the state at the top of the
// stack; states never see platform types.
//
// Responsibilities:
// - Represent keyboard, mouse, window, controller and joystick events in
//   a stable, portable way
// - Carry each kind's payload as a small struct the callbacks receive by
//   reference
// - Define the non-blocking `EventSource` contract
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    Event (this module)
//         ↓
//    StateStack::route_event
//         ↓
//    GameState callbacks (top of stack only)
// ```
//
// Controller and joystick kinds are part of the portable contract; the
// winit backend never produces them, but other backends can, and states
// can be exercised with them directly through `route_event`.
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts platform-specific button representations (e.g., Winit's
/// `MouseButton`, SDL's button codes) into a stable, portable enum.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY). Character input arrives
/// separately, through [`Event::TextInput`].
///
/// Coverage:
/// - Alphanumeric keys (A-Z, 0-9)
/// - Arrow keys
/// - Common special keys (Space, Enter, Escape, etc.)
///
/// Additional keys can be added as needed without breaking existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    /// Directional navigation keys
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    /// Spacebar
    Space,

    /// Return/Enter key
    Enter,

    /// Escape key
    Escape,

    /// Tab key
    Tab,

    /// Backspace key
    Backspace,

    /// Delete key
    Delete,

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Attached to keyboard and mouse button events so states can
/// distinguish combinations like Ctrl+S from plain S. The platform
/// layer tracks modifier changes and stamps every discrete event with
/// the state current at that moment.
///
/// Left/right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

//--- Modifier Constants --------------------------------------------------

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    /// All modifiers held (Shift + Ctrl + Alt).
    pub const ALL: Self = Self {
        shift: true,
        ctrl: true,
        alt: true,
    };
}

//--- Trait Implementations -----------------------------------------------

impl Default for Modifiers {
    /// Defaults to no modifiers held.
    fn default() -> Self {
        Self::NONE
    }
}

//=== Keyboard Payloads ===================================================

/// Payload of a key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Physical key that changed state.
    pub key: KeyCode,

    /// Modifier state at the moment of the event.
    pub modifiers: Modifiers,

    /// True when this is an OS key-repeat rather than a fresh press.
    /// Always false for releases.
    pub repeat: bool,
}

/// Payload of a text input event.
///
/// Produced alongside key presses that yield printable characters, after
/// layout and modifier resolution. States implementing text fields listen
/// to this instead of reconstructing characters from key codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputEvent {
    /// The committed text, usually a single grapheme.
    pub text: String,
}

//=== Window Payload ======================================================

/// A change to the window hosting the display.
///
/// Routed to the top state like any other hardware event. `Close` is the
/// per-window close request; a whole-application quit arrives as
/// [`Event::Quit`] and never reaches a state (the scheduler converts it
/// to a stack-wide stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Framebuffer size changed. Dimensions are in physical pixels.
    Resized { width: u32, height: u32 },

    /// Window moved to a new position on the desktop.
    Moved { x: i32, y: i32 },

    /// Window gained keyboard focus.
    FocusGained,

    /// Window lost keyboard focus.
    FocusLost,

    /// Window was minimized.
    Minimized,

    /// Window was maximized.
    Maximized,

    /// Window was restored from a minimized or maximized state.
    Restored,

    /// Pointer entered the window area.
    Entered,

    /// Pointer left the window area.
    Left,

    /// The user asked this window to close.
    Close,
}

//=== Mouse Payloads ======================================================

/// Payload of a pointer motion event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoveEvent {
    /// Cursor position in window space (pixels, top-left origin).
    pub x: f32,
    /// Cursor position in window space (pixels, top-left origin).
    pub y: f32,

    /// Motion since the previous event.
    pub dx: f32,
    /// Motion since the previous event.
    pub dy: f32,
}

/// Payload of a mouse button press or release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    /// Button that changed state.
    pub button: MouseButton,

    /// Modifier state at the moment of the event.
    pub modifiers: Modifiers,

    /// Cursor position when the button changed, in window space.
    pub x: f32,
    /// Cursor position when the button changed, in window space.
    pub y: f32,
}

/// Payload of a scroll wheel event, in line units.
///
/// Pixel-granular scrolls (trackpads) are normalized to fractional
/// lines by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseWheelEvent {
    /// Horizontal scroll amount. Positive is right.
    pub dx: f32,

    /// Vertical scroll amount. Positive is away from the user.
    pub dy: f32,
}

//=== Controller Payloads =================================================

/// Named controller axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

/// Named controller button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerButton {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Other,
}

/// A controller was added, removed, or had its mapping reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerDeviceEvent {
    /// Backend-assigned device id.
    pub device: u32,
}

/// A controller axis moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerAxisEvent {
    /// Backend-assigned device id.
    pub device: u32,

    /// Which axis moved.
    pub axis: ControllerAxis,

    /// Axis position normalized to [-1, 1]; triggers use [0, 1].
    pub value: f32,
}

/// A controller button changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerButtonEvent {
    /// Backend-assigned device id.
    pub device: u32,

    /// Which button changed.
    pub button: ControllerButton,
}

//=== Joystick Payloads ===================================================

// Raw joystick events mirror the controller family but use bare indices,
// for devices without a recognized button mapping.

/// A raw joystick was connected or disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickDeviceEvent {
    /// Backend-assigned device id.
    pub device: u32,
}

/// A raw joystick axis moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickAxisEvent {
    /// Backend-assigned device id.
    pub device: u32,

    /// Axis index on the device.
    pub axis: u8,

    /// Axis position normalized to [-1, 1].
    pub value: f32,
}

/// A trackball on a raw joystick moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickBallEvent {
    /// Backend-assigned device id.
    pub device: u32,

    /// Ball index on the device.
    pub ball: u8,

    /// Relative motion since the last event.
    pub dx: i32,
    /// Relative motion since the last event.
    pub dy: i32,
}

/// A raw joystick button changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickButtonEvent {
    /// Backend-assigned device id.
    pub device: u32,

    /// Button index on the device.
    pub button: u8,
}

/// Position of a joystick hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatPosition {
    Centered,
    Up,
    Right,
    Down,
    Left,
    RightUp,
    RightDown,
    LeftUp,
    LeftDown,
}

/// A joystick hat switch changed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickHatEvent {
    /// Backend-assigned device id.
    pub device: u32,

    /// Hat index on the device.
    pub hat: u8,

    /// New hat position.
    pub position: HatPosition,
}

//=== Event ===============================================================

/// A single hardware event, as handed to [`StateStack::route_event`].
///
/// Each variant corresponds to exactly one callback on
/// [`GameState`](crate::core::state::GameState); the scheduler performs
/// the dispatch. `Quit` is the exception: it requests a stack-wide stop
/// and is never forwarded to a state.
///
/// [`StateStack::route_event`]: crate::core::state::StateStack::route_event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Application-level quit request (last window closed, SIGINT, ...).
    Quit,

    /// Window state change.
    Window(WindowEvent),

    /// Key released.
    KeyUp(KeyboardEvent),

    /// Key pressed.
    KeyDown(KeyboardEvent),

    /// Committed text input.
    TextInput(TextInputEvent),

    /// Pointer motion.
    MouseMove(MouseMoveEvent),

    /// Mouse button released.
    MouseButtonUp(MouseButtonEvent),

    /// Mouse button pressed.
    MouseButtonDown(MouseButtonEvent),

    /// Scroll wheel motion.
    MouseWheel(MouseWheelEvent),

    /// Controller connected.
    ControllerAdded(ControllerDeviceEvent),

    /// Controller disconnected.
    ControllerRemoved(ControllerDeviceEvent),

    /// Controller mapping reloaded.
    ControllerRemapped(ControllerDeviceEvent),

    /// Controller axis motion.
    ControllerAxis(ControllerAxisEvent),

    /// Controller button released.
    ControllerButtonUp(ControllerButtonEvent),

    /// Controller button pressed.
    ControllerButtonDown(ControllerButtonEvent),

    /// Raw joystick connected.
    JoystickAdded(JoystickDeviceEvent),

    /// Raw joystick disconnected.
    JoystickRemoved(JoystickDeviceEvent),

    /// Raw joystick axis motion.
    JoystickAxis(JoystickAxisEvent),

    /// Raw joystick trackball motion.
    JoystickBall(JoystickBallEvent),

    /// Raw joystick button released.
    JoystickButtonUp(JoystickButtonEvent),

    /// Raw joystick button pressed.
    JoystickButtonDown(JoystickButtonEvent),

    /// Joystick hat switch moved.
    JoystickHat(JoystickHatEvent),
}

//=== EventSource =========================================================

/// Non-blocking supplier of translated hardware events.
///
/// The run loop drains the source at the start of every frame:
///
/// ```text
/// while let Some(event) = source.poll_event() {
///     stack.route_event(&display, &event);
/// }
/// ```
///
/// Implementations must never block; with nothing pending, `poll_event`
/// returns `None` immediately so the frame can proceed.
pub trait EventSource {
    /// Returns the next pending event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<Event>;
}

//=========================================================================
// Unit Tests
//=========================================================================
