//! Frame scheduling.
//!
//! The terminal has no display-synced callback, so frames are paced against
//! a fixed period and the event loop sleeps in `poll` until the next one is
//! due.

use std::time::{Duration, Instant};

/// Holds at most one pending frame deadline.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    period: Duration,
    pending: Option<Instant>,
    /// Deadline of the last frame that fired, used to keep a steady cadence.
    last_fired: Option<Instant>,
}

impl FrameScheduler {
    /// Create a scheduler targeting `fps` frames per second (clamped to 1..=240).
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self {
            period: Duration::from_secs(1) / fps,
            pending: None,
            last_fired: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the next frame.
    ///
    /// The deadline follows the previous one by one period. If the loop has
    /// fallen a whole period behind, the backlog is dropped and the next
    /// frame is one period from `now` instead.
    pub fn request(&mut self, now: Instant) {
        let deadline = match self.last_fired {
            Some(prev) if prev + self.period > now => prev + self.period,
            _ => now + self.period,
        };
        self.pending = Some(deadline);
    }

    /// Arm a frame that is due right away.
    pub fn request_immediate(&mut self, now: Instant) {
        self.pending = Some(now);
    }

    /// Drop the pending frame, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_fired = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending frame if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                self.last_fired = Some(deadline);
                true
            }
            _ => false,
        }
    }

    /// Time until the pending frame is due, `None` when nothing is pending.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
