//! Frame scheduling seam.
//!
//! The loop never sleeps or spins; a host asks for at most one pending tick and
//! pumps [`crate::GameLoop::on_frame`] once per display refresh.

pub trait FrameScheduler {
    /// Requests a tick on the next frame. Requesting twice still yields one tick.
    fn schedule_next_tick(&mut self);
    fn cancel_scheduled_tick(&mut self);
    fn is_scheduled(&self) -> bool;
    /// Consumes the pending tick. Returns `false` when nothing was scheduled.
    fn take_due(&mut self) -> bool;
}

/// A scheduler driven by whoever calls `on_frame`: a fixed-step engine
/// schedule, a test, or a headless harness.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: bool,
    ticks_taken: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of ticks handed out so far.
    pub const fn ticks_taken(&self) -> u64 {
        self.ticks_taken
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) {
        self.pending = true;
    }

    fn cancel_scheduled_tick(&mut self) {
        self.pending = false;
    }

    fn is_scheduled(&self) -> bool {
        self.pending
    }

    fn take_due(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.ticks_taken += 1;
        true
    }
}
