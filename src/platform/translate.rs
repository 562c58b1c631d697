//=========================================================================
// Event Translation
//=========================================================================
//
// Converts platform-specific winit events into portable engine Events.
//
// Architecture:
//   winit WindowEvent → EventTranslator → Event (engine type) → channel
//
// Stateful tracking: modifier state is cached from ModifiersChanged and
// stamped onto subsequent key and mouse events; the last cursor position
// feeds per-move deltas and mouse button coordinates. Unmapped keys
// (F13-F24, exotic keyboards) are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::event::{
    Event, KeyCode, KeyboardEvent, Modifiers, MouseButton, MouseButtonEvent, MouseMoveEvent,
    MouseWheelEvent, TextInputEvent,
};

/// Pixels per wheel line when collapsing pixel deltas to lines.
const WHEEL_PIXELS_PER_LINE: f32 = 16.0;

//=== EventTranslator =====================================================

/// Converts winit events to engine [`Event`]s with stateful tracking.
///
/// Caches the modifier set and the last cursor position; both are
/// stamped onto the events that need them. Unmapped keys are filtered.
pub(crate) struct EventTranslator {
    current_modifiers: Modifiers,
    cursor: Option<(f32, f32)>,
}

impl EventTranslator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
            cursor: None,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Keyboard ---------------------------------------------------------

    /// Converts a winit KeyEvent to a key event (filters unmapped keys).
    pub(crate) fn translate_key(&self, key_event: &KeyEvent) -> Option<Event> {
        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key, KeyCode::Unidentified) {
            return None;
        }

        Some(self.create_key_event(key, key_event.state, key_event.repeat))
    }

    /// Synthesizes a text input event from the text a key press carries.
    ///
    /// Releases never produce text, and control characters are stripped;
    /// those arrive as key events instead.
    pub(crate) fn translate_text(&self, key_event: &KeyEvent) -> Option<Event> {
        if key_event.state != ElementState::Pressed {
            return None;
        }
        Self::text_event(key_event.text.as_ref()?.as_str())
    }

    //--- Mouse ------------------------------------------------------------

    /// Converts a cursor move, deriving deltas from the previous position.
    ///
    /// The first move after creation or after the cursor left the window
    /// reports zero deltas.
    pub(crate) fn translate_cursor_moved(&mut self, x: f32, y: f32) -> Event {
        let (dx, dy) = match self.cursor {
            Some((last_x, last_y)) => (x - last_x, y - last_y),
            None => (0.0, 0.0),
        };
        self.cursor = Some((x, y));
        Event::MouseMove(MouseMoveEvent { x, y, dx, dy })
    }

    /// Forgets the tracked cursor position when the cursor leaves the
    /// window, so re-entry does not report a spurious jump.
    pub(crate) fn cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Converts a winit mouse button event (with modifiers and position).
    pub(crate) fn translate_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Event {
        let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
        let payload = MouseButtonEvent {
            button: MouseButton::from(button),
            modifiers: self.current_modifiers,
            x,
            y,
        };

        match state {
            ElementState::Pressed => Event::MouseButtonDown(payload),
            ElementState::Released => Event::MouseButtonUp(payload),
        }
    }

    /// Converts a wheel event, collapsing pixel deltas to lines.
    pub(crate) fn translate_wheel(&self, delta: MouseScrollDelta) -> Event {
        let (dx, dy) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(PhysicalPosition { x, y }) => (
                x as f32 / WHEEL_PIXELS_PER_LINE,
                y as f32 / WHEEL_PIXELS_PER_LINE,
            ),
        };
        Event::MouseWheel(MouseWheelEvent { dx, dy })
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_key_event(&self, key: KeyCode, state: ElementState, repeat: bool) -> Event {
        match state {
            ElementState::Pressed => Event::KeyDown(KeyboardEvent {
                key,
                modifiers: self.current_modifiers,
                repeat,
            }),
            ElementState::Released => Event::KeyUp(KeyboardEvent {
                key,
                modifiers: self.current_modifiers,
                repeat: false,
            }),
        }
    }

    fn text_event(text: &str) -> Option<Event> {
        let printable: String = text.chars().filter(|c| !c.is_control()).collect();
        if printable.is_empty() {
            return None;
        }
        Some(Event::TextInput(TextInputEvent { text: printable }))
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts winit ModifiersState to engine Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Unmapped keys (F13-F24,
/// numpad, media keys) return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
