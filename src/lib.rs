//=========================================================================
// Emberwake - Library Root
//
// This crate defines the public API surface of the Emberwake engine.
//
// Responsibilities:
// - Expose the run loop (`Runtime`) driving the game state stack
// - Expose the portable core contracts (`core`) and the winit backend
//   (`platform`) for embedders that assemble their own runtime
// - Provide a prelude for application code
//
// Typical usage:
// ```no_run
// use emberwake::prelude::*;
//
// struct Boot;
//
// impl GameState for Boot {
//     fn on_run(&mut self, ctx: &mut StateContext, _dt_ms: f32) {
//         ctx.pop_state();
//     }
// }
//
// fn main() -> Result<(), Box<dyn std::error::Error>> {
//     let platform = WinitPlatform::new(PlatformConfig::default())?;
//     let mut runtime = Runtime::with_platform(platform);
//     runtime.push(Box::new(Boot))?;
//     runtime.run();
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent machinery: the state stack
// scheduler, the portable event types, and the display/clock seams.
// Application code mostly touches it through the prelude, but the
// modules are public for embedders that implement their own seams.
//
// `platform` is the winit backend: window, event pump, and the Display
// and RenderContext implementations the default runtime runs against.
//
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `runtime` defines the frame loop that ties a state stack to a
// platform; only the `Runtime` type itself is part of the API.
//
mod runtime;

//--- Public Exports ------------------------------------------------------
//
// Re-exports `Runtime` as the main entry point so applications can
// simply `use emberwake::Runtime;` without knowing the internal module
// structure.
//
pub use runtime::Runtime;
