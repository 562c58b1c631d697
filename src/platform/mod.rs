//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS window and events) with the engine's frame loop.
//
// Architecture:
// ```text
//  WinitPlatform                          Runtime
//   ├─ EventLoop ──pump──► PumpHandler     │
//   │                       ├─ window      ├─ poll_event() ─► channel
//   │                       ├─ translator  ├─ Display      ─► WinitDisplay
//   │                       └─ sender ─┐   └─ RenderContext─► WindowContext
//   └─ receiver ◄───── event channel ──┘
// ```
//
// Key Design Decisions:
// - **Caller-driven pumping**: the frame loop owns the cadence, so the
//   event loop is pumped with a zero timeout from `poll_event` instead
//   of surrendering the thread to `run_app`
// - **Shared window cell**: the handler, display and render context all
//   view one `Rc<RefCell<SharedWindow>>`, keeping the whole platform on
//   the caller's thread
// - **Close handling**: a close request emits `Window(Close)` followed
//   by `Quit` and clears the open flag, so the top state observes the
//   closure and the scheduler unwinds the stack
// - **Sticky modifiers**: modifier state persists across events until
//   explicitly changed (matches platform behavior)
//
// Responsibilities:
// - Create the event loop and window, and report creation failures
// - Translate winit events to engine Events (see `translate`)
// - Serve `Display` and `RenderContext` views over the live window
//
// Minimize, maximize and restore notifications have no portable winit
// signal, so this backend never produces those window event kinds.
//
//=========================================================================

mod translate;

//=== External Crates =====================================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent as WinitWindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Modules ====================================================

use crate::core::display::{Display, FullscreenMode, RenderContext};
use crate::core::event::{Event, EventSource, WindowEvent};
use translate::EventTranslator;

//=== Configuration =======================================================

/// Window settings applied when [`WinitPlatform::new`] creates the
/// window.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Window title.
    pub title: String,

    /// Requested inner size in logical pixels.
    pub resolution: (u32, u32),

    /// Initial fullscreen mode.
    pub fullscreen: FullscreenMode,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Emberwake".to_owned(),
            resolution: (1280, 720),
            fullscreen: FullscreenMode::Windowed,
        }
    }
}

//=== Error Types =========================================================

/// Errors that can occur during platform initialization.
#[derive(Debug)]
pub enum PlatformError {
    /// Event loop creation failed (no display server, wrong thread).
    EventLoopCreation(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => {
                write!(f, "Failed to create event loop: {}", e)
            }
        }
    }
}

impl std::error::Error for PlatformError {}

//=== Shared Window State =================================================

/// Window state shared by the pump handler, the display view, and the
/// render context.
struct SharedWindow {
    /// The live window, populated by the first resume.
    window: Option<Window>,

    /// Framebuffer size in physical pixels (the requested size until the
    /// window exists).
    resolution: (u32, u32),

    /// False before creation and after the window goes away.
    open: bool,

    /// The fullscreen mode in effect, or requested if the window does
    /// not exist yet.
    fullscreen: FullscreenMode,
}

/// Applies a fullscreen mode to a live window, reporting what actually
/// took effect.
///
/// Exclusive mode needs a concrete video mode from the monitor; when
/// none is available the request degrades to borderless.
fn apply_fullscreen(window: &Window, mode: FullscreenMode) -> FullscreenMode {
    match mode {
        FullscreenMode::Windowed => {
            window.set_fullscreen(None);
            FullscreenMode::Windowed
        }
        FullscreenMode::Borderless => {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            FullscreenMode::Borderless
        }
        FullscreenMode::Exclusive => {
            let video_mode = window
                .current_monitor()
                .and_then(|monitor| monitor.video_modes().next());
            match video_mode {
                Some(video_mode) => {
                    debug!(
                        target: "platform",
                        "Entering exclusive fullscreen: {}x{}",
                        video_mode.size().width,
                        video_mode.size().height
                    );
                    window.set_fullscreen(Some(Fullscreen::Exclusive(video_mode)));
                    FullscreenMode::Exclusive
                }
                None => {
                    warn!(
                        target: "platform",
                        "No exclusive video mode available, falling back to borderless"
                    );
                    window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                    FullscreenMode::Borderless
                }
            }
        }
    }
}

//=== Display View ========================================================

/// [`Display`] implementation backed by the winit window.
///
/// A cheap view over the platform's shared window state; obtain one from
/// [`WinitPlatform::display`].
pub struct WinitDisplay {
    shared: Rc<RefCell<SharedWindow>>,
}

impl Display for WinitDisplay {
    fn resolution(&self) -> (u32, u32) {
        self.shared.borrow().resolution
    }

    fn is_running(&self) -> bool {
        self.shared.borrow().open
    }

    fn set_fullscreen_mode(&mut self, mode: FullscreenMode) {
        let applied = match self.shared.borrow().window.as_ref() {
            Some(window) => apply_fullscreen(window, mode),
            // No window yet: remember the request, creation applies it.
            None => mode,
        };
        self.shared.borrow_mut().fullscreen = applied;
    }

    fn fullscreen_mode(&self) -> FullscreenMode {
        self.shared.borrow().fullscreen
    }
}

//=== Render Context ======================================================

/// [`RenderContext`] implementation over the winit window.
///
/// There is no GPU surface behind it: `make_current` is the activation
/// seam and `present` asks the window for another redraw. A renderer
/// replaces this implementation to bind and swap a real surface.
pub struct WindowContext {
    shared: Rc<RefCell<SharedWindow>>,
}

impl RenderContext for WindowContext {
    fn make_current(&mut self, _display: &dyn Display) {}

    fn present(&mut self, _display: &dyn Display) {
        if let Some(window) = self.shared.borrow().window.as_ref() {
            window.request_redraw();
        }
    }
}

//=== Pump Handler ========================================================

/// The [`ApplicationHandler`] the event loop drives while being pumped.
///
/// Creates the window on resume, keeps the shared state current, and
/// forwards translated events into the channel the platform drains.
struct PumpHandler {
    shared: Rc<RefCell<SharedWindow>>,
    config: PlatformConfig,
    events: Sender<Event>,
    translator: EventTranslator,
}

impl PumpHandler {
    fn send(&self, event: Event) {
        if self.events.send(event).is_err() {
            warn!(target: "platform", "Event channel disconnected, dropping event");
        }
    }
}

impl ApplicationHandler for PumpHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Window already exists (mobile resume cycle)
        if self.shared.borrow().window.is_some() {
            debug!(target: "platform", "Window already exists, skipping creation");
            return;
        }

        info!(target: "platform", "Creating window");

        let (width, height) = self.config.resolution;
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );

                let requested = self.shared.borrow().fullscreen;
                let applied = match requested {
                    FullscreenMode::Windowed => FullscreenMode::Windowed,
                    mode => apply_fullscreen(&window, mode),
                };

                window.request_redraw();

                let size = window.inner_size();
                let mut shared = self.shared.borrow_mut();
                shared.resolution = (size.width, size.height);
                shared.fullscreen = applied;
                shared.open = true;
                shared.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Failed to create window: {}", e);
                self.shared.borrow_mut().open = false;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        match &event {
            //--- Window Lifecycle -----------------------------------------

            WinitWindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.shared.borrow_mut().open = false;
                // The top state sees the closure, then the quit stops
                // the whole stack.
                self.send(Event::Window(WindowEvent::Close));
                self.send(Event::Quit);
                event_loop.exit();
            }

            WinitWindowEvent::Destroyed => {
                debug!(target: "platform", "Window destroyed");
                self.shared.borrow_mut().open = false;
            }

            WinitWindowEvent::Resized(size) => {
                trace!(target: "platform", "Window resized: {}x{}", size.width, size.height);
                self.shared.borrow_mut().resolution = (size.width, size.height);
                self.send(Event::Window(WindowEvent::Resized {
                    width: size.width,
                    height: size.height,
                }));
            }

            WinitWindowEvent::Moved(position) => {
                self.send(Event::Window(WindowEvent::Moved {
                    x: position.x,
                    y: position.y,
                }));
            }

            WinitWindowEvent::Focused(gained) => {
                debug!(target: "platform", "Window focus: {}", gained);
                self.send(Event::Window(if *gained {
                    WindowEvent::FocusGained
                } else {
                    WindowEvent::FocusLost
                }));
            }

            WinitWindowEvent::CursorEntered { .. } => {
                self.send(Event::Window(WindowEvent::Entered));
            }

            WinitWindowEvent::CursorLeft { .. } => {
                self.translator.cursor_left();
                self.send(Event::Window(WindowEvent::Left));
            }

            //--- Input ----------------------------------------------------

            WinitWindowEvent::ModifiersChanged(modifiers) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", modifiers);
                self.translator.update_modifiers(modifiers.state());
            }

            WinitWindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                match self.translator.translate_key(key_event) {
                    Some(event) => self.send(event),
                    None => {
                        trace!(target: "platform::input", "Ignoring unmapped key");
                    }
                }
                if let Some(event) = self.translator.translate_text(key_event) {
                    self.send(event);
                }
            }

            WinitWindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .translator
                    .translate_cursor_moved(position.x as f32, position.y as f32);
                self.send(event);
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                self.send(self.translator.translate_mouse_button(*button, *state));
            }

            WinitWindowEvent::MouseWheel { delta, .. } => {
                self.send(self.translator.translate_wheel(*delta));
            }

            WinitWindowEvent::RedrawRequested => {
                // Presentation is driven by the frame loop through
                // WindowContext, not by the OS redraw callback.
            }

            // Occluded, ScaleFactorChanged, Ime and friends have no
            // portable counterpart
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Event loop exiting");
        self.shared.borrow_mut().open = false;
    }
}

//=== WinitPlatform =======================================================

/// The winit-backed platform: window, event source, display and render
/// context in one place.
///
/// Owns the event loop and pumps it with a zero timeout whenever the
/// frame loop polls for events, so the caller keeps control of the
/// thread between frames. Construction pumps once, which delivers the
/// resume that creates the window; by the time `new` returns the window
/// exists (or its creation failure has been logged and the display
/// reports not running).
///
/// Everything stays on the constructing thread. The [`WinitDisplay`]
/// and [`WindowContext`] views share the window state through an `Rc`.
///
/// # Examples
///
/// ```no_run
/// use emberwake::platform::{PlatformConfig, WinitPlatform};
/// use emberwake::Runtime;
///
/// # fn main() -> Result<(), emberwake::platform::PlatformError> {
/// let config = PlatformConfig {
///     title: "Asteroid Salvage".to_owned(),
///     resolution: (1920, 1080),
///     ..PlatformConfig::default()
/// };
///
/// let platform = WinitPlatform::new(config)?;
/// let mut runtime = Runtime::with_platform(platform);
/// # Ok(())
/// # }
/// ```
pub struct WinitPlatform {
    handler: PumpHandler,
    events: Receiver<Event>,
    shared: Rc<RefCell<SharedWindow>>,
    // Declared last: the window inside `shared` must drop before the
    // event loop it was created from.
    event_loop: EventLoop<()>,
    exited: bool,
}

impl WinitPlatform {
    //--- Construction -----------------------------------------------------

    /// Creates the event loop and window.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::EventLoopCreation`] when no display
    /// server is reachable or the platform refuses an event loop on
    /// this thread.
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        info!(target: "platform", "Initializing winit platform");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        let shared = Rc::new(RefCell::new(SharedWindow {
            window: None,
            resolution: config.resolution,
            open: false,
            fullscreen: config.fullscreen,
        }));

        let (sender, receiver) = unbounded();
        let handler = PumpHandler {
            shared: Rc::clone(&shared),
            config,
            events: sender,
            translator: EventTranslator::new(),
        };

        let mut platform = Self {
            handler,
            events: receiver,
            shared,
            event_loop,
            exited: false,
        };

        // The first pump delivers the resume that creates the window.
        platform.pump();

        Ok(platform)
    }

    //--- Views ------------------------------------------------------------

    /// Returns a [`Display`] view over the window.
    pub fn display(&self) -> WinitDisplay {
        WinitDisplay {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Returns a [`RenderContext`] view over the window.
    pub fn context(&self) -> WindowContext {
        WindowContext {
            shared: Rc::clone(&self.shared),
        }
    }

    //--- Event Pump -------------------------------------------------------

    /// Runs the event loop until the OS queue is drained, without
    /// blocking. Once the loop exits it is never pumped again.
    fn pump(&mut self) {
        if self.exited {
            return;
        }

        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            debug!(target: "platform", "Event loop exited with code {}", code);
            self.exited = true;
            self.shared.borrow_mut().open = false;
        }
    }
}

impl EventSource for WinitPlatform {
    fn poll_event(&mut self) -> Option<Event> {
        // Serve what the last pump left behind before pumping again.
        if let Ok(event) = self.events.try_recv() {
            return Some(event);
        }

        self.pump();
        self.events.try_recv().ok()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
//
// The event loop itself cannot be constructed headlessly, so these
// cover the pieces around it: configuration, the shared window state
// the views read, and channel behavior.
//
//=========================================================================
