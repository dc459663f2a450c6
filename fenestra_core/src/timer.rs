// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-shot deadline timers.
//!
//! The compositor does not own an event loop. Its timers are plain deadlines
//! that the host polls through
//! [`Compositor::next_deadline`](crate::compositor::Compositor::next_deadline)
//! and fires through
//! [`Compositor::dispatch_timers`](crate::compositor::Compositor::dispatch_timers).

use crate::time::{Duration, HostTime};

/// A single-shot timer. Starting an active timer replaces its deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeadlineTimer {
    deadline: Option<HostTime>,
    interval: Duration,
}

impl DeadlineTimer {
    /// Creates a stopped timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deadline: None,
            interval: Duration::ZERO,
        }
    }

    /// Arms the timer to fire `interval` after `now`.
    pub fn start(&mut self, now: HostTime, interval: Duration) {
        self.deadline = Some(now.saturating_add(interval));
        self.interval = interval;
    }

    /// Disarms the timer.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while armed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// The armed deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.deadline
    }

    /// The interval of the most recent [`start`](Self::start).
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Disarms the timer and returns `true` if it was due at `now`.
    pub fn fire_if_due(&mut self, now: HostTime) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
