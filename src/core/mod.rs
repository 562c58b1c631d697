//=========================================================================
// Engine Core
//
// Platform-independent heart of the engine: the state scheduler, the
// portable event vocabulary, and the seams the run loop drives.
//
// Responsibilities:
// - Schedule game states on a stack (push, pop, pause, resume, stop)
// - Define the portable hardware event types and the source they are
//   drained from
// - Declare the display, render context and clock contracts the
//   platform layer implements
//
// Notes:
// Nothing in here touches winit. The runtime consumes these contracts
// through trait objects, so states stay testable with plain mocks and
// a different backend can slot in without touching the scheduler.
//
//=========================================================================

//=== Submodules ==========================================================
//
// `state`   - game states, the state stack scheduler, transitions
// `event`   - hardware events and the EventSource contract
// `display` - output surface and render context seams
// `clock`   - monotonic time for frame deltas
//
pub mod clock;
pub mod display;
pub mod event;
pub mod state;
