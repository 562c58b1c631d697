//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use emberwake::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Run loop
pub use crate::Runtime;

// State machinery
pub use crate::core::state::{
    GameState, RejectedState, StateContext, StateStack, StateStatus, StateTransition,
};

// Hardware events
pub use crate::core::event::{
    Event, EventSource, KeyCode, KeyboardEvent, Modifiers, MouseButton, MouseButtonEvent,
    MouseMoveEvent, MouseWheelEvent, TextInputEvent, WindowEvent,
};

// Display and presentation seams
pub use crate::core::display::{Display, FullscreenMode, RenderContext};

// Time sources
pub use crate::core::clock::{Clock, ManualClock, MonotonicClock};

// Winit backend
pub use crate::platform::{PlatformConfig, PlatformError, WinitPlatform};
