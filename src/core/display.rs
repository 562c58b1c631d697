//=========================================================================
// Display & Render Context Contracts
//
// The two platform collaborators the runtime core consumes but never
// implements itself. The run loop and game states only ever see these
// traits; the concrete window/context machinery lives behind them (the
// built-in winit backend, or whatever the embedder supplies).
//
// Kept deliberately narrow: the core needs liveness, resolution, a
// fullscreen toggle, and a way to present a finished frame. Shader,
// texture and framebuffer management belong to the renderer on the other
// side of `RenderContext`.
//
//=========================================================================

//=== FullscreenMode ======================================================

/// How the display occupies the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FullscreenMode {
    /// A regular desktop window.
    #[default]
    Windowed,

    /// A borderless window covering the monitor, sharing its video mode.
    Borderless,

    /// Exclusive fullscreen with a mode change on the monitor.
    Exclusive,
}

//=== Display =============================================================

/// A live output surface.
///
/// Game states reach this through
/// [`StateContext::display`](crate::core::state::StateContext::display)
/// to size viewports and projection matrices; the run loop checks
/// [`is_running`](Display::is_running) every frame and surfaces a dead
/// display as a log diagnostic (shutdown policy stays with the embedder).
pub trait Display {
    /// Current framebuffer size in physical pixels as `(width, height)`.
    fn resolution(&self) -> (u32, u32);

    /// Whether the underlying surface still exists and can present.
    fn is_running(&self) -> bool;

    /// Requests a fullscreen mode change.
    ///
    /// Takes effect as soon as the backend can apply it; backends without
    /// an exclusive mode may substitute borderless.
    fn set_fullscreen_mode(&mut self, mode: FullscreenMode);

    /// The most recently requested fullscreen mode.
    fn fullscreen_mode(&self) -> FullscreenMode;
}

//=== RenderContext =======================================================

/// A rendering context bound to a display.
///
/// One call pair per frame, after the scheduler has advanced every state:
/// [`make_current`](RenderContext::make_current) binds the context, then
/// [`present`](RenderContext::present) hands the finished frame to the
/// display.
pub trait RenderContext {
    /// Binds this context to `display` for the draw calls that follow.
    fn make_current(&mut self, display: &dyn Display);

    /// Presents the finished frame (buffer swap or equivalent).
    fn present(&mut self, display: &dyn Display);
}

//=========================================================================
// Unit Tests
//=========================================================================
