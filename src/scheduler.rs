//! Switch scheduling
//!
//! Provider switches are expensive (embed teardown and reload) and UI events
//! arrive in bursts: double-clicks, keyboard repeat, rapid queue navigation.
//! This module collapses a burst of "switch to target X" requests into
//! exactly one activation carrying the most recent payload, and provides the
//! target comparator that lets redundant switches be skipped entirely.

use crate::types::PlayTarget;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Structural equality over playback targets
///
/// Returns `false` whenever either side is absent. Two "no target" states
/// are never equal: an explicit re-open while the current target is unknown
/// always counts as a change, by design.
pub fn same_target(a: Option<&PlayTarget>, b: Option<&PlayTarget>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Time source for the scheduler
///
/// Injectable so debounce logic stays deterministic under test; production
/// code uses [`SystemClock`].
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced time source for tests and simulation hosts
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock poisoned")
    }
}

struct Pending<T> {
    payload: T,
    deadline: Instant,
}

/// Trailing-edge debounce over switch payloads
///
/// Each [`request`](Self::request) records the payload and restarts the
/// delay window; [`poll`](Self::poll) delivers the payload from the last
/// request exactly once per settled burst, and only after the full delay
/// has elapsed since that request. N rapid requests within the window yield
/// one delivery with the Nth payload.
///
/// The scheduler owns no thread or timer. The host event loop polls it (via
/// [`crate::PlayerController::tick`] in the common case) and can use
/// [`fire_at`](Self::fire_at) to schedule a wakeup. A zero delay makes
/// `poll` fire immediately after `request`.
pub struct DebouncedScheduler<T, C: Clock = SystemClock> {
    delay: Duration,
    clock: C,
    pending: Option<Pending<T>>,
}

impl<T> DebouncedScheduler<T, SystemClock> {
    /// Create a scheduler on the wall clock
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, SystemClock)
    }
}

impl<T, C: Clock> DebouncedScheduler<T, C> {
    /// Create a scheduler with an injected time source
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Self {
            delay,
            clock,
            pending: None,
        }
    }

    /// Record a payload and restart the delay window
    ///
    /// Overwrites any payload from an earlier, not-yet-fired request.
    pub fn request(&mut self, payload: T) {
        let deadline = self.clock.now() + self.delay;
        self.pending = Some(Pending { payload, deadline });
    }

    /// Discard any pending payload without delivering it
    ///
    /// Returns whether a pending request was discarded.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a request is waiting for its window to settle
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending request, if any
    pub fn fire_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Deliver the settled payload, if its window has elapsed
    ///
    /// Returns `None` while no request is pending or the window is still
    /// open. A delivered payload is consumed; subsequent polls return
    /// `None` until the next request.
    pub fn poll(&mut self) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| self.clock.now() >= p.deadline);

        if due {
            self.pending.take().map(|p| p.payload)
        } else {
            None
        }
    }
}
