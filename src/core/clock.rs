//=========================================================================
// Frame Clock
//
// Millisecond time sources for frame delta computation.
//
// The run loop samples its clock once per frame and hands the difference
// to the scheduler as that frame's dt. Two implementations are provided:
// `MonotonicClock` for real operation and `ManualClock` for tests and
// deterministic embedders (replays, lockstep captures).
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

//=== Clock ===============================================================

/// Monotonic millisecond time source.
///
/// Implementations must be non-decreasing: a later call never returns a
/// smaller value than an earlier one. The absolute origin is arbitrary;
/// only differences between samples are meaningful.
pub trait Clock {
    /// Milliseconds elapsed since this clock's origin.
    fn now_ms(&self) -> u64;
}

//=== MonotonicClock ======================================================

/// Wall-clock time source anchored at its own construction.
///
/// Backed by [`std::time::Instant`], so it is immune to system clock
/// adjustments.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the moment of the call.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

//=== ManualClock =========================================================

/// Hand-driven time source.
///
/// Cloning yields a handle to the same underlying instant, so a test can
/// keep one handle, give the other to a runtime, and step time from the
/// outside:
///
/// ```
/// use emberwake::core::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
///
/// handle.advance(16);
/// assert_eq!(clock.now_ms(), 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ms: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock reading `ms`.
    pub fn starting_at(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Moves the clock forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.ms.set(self.ms.get() + ms);
    }

    /// Sets the absolute reading. Monotonicity is the caller's burden.
    pub fn set(&self, ms: u64) {
        self.ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
