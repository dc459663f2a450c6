// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame pacing: paint-cost tracking and next-frame delay.
//!
//! After each buffer swap the compositor waits before painting again. The
//! wait is chosen so that painting finishes shortly before the next vertical
//! blank:
//!
//! ```text
//!   delay = max(refresh − refresh / margin_divisor − worst_recent_paint, 0)
//! ```
//!
//! [`PaintDurations`] supplies `worst_recent_paint`. It keeps two slots: the
//! maximum of the previous window of frames and the running maximum of the
//! current one. Every `window` frames the running maximum moves into the
//! previous slot and restarts from zero, so one slow frame stops dominating
//! the delay after at most two windows.

use crate::time::Duration;

/// Two-slot ring of recent worst-case paint durations.
#[derive(Clone, Copy, Debug)]
pub struct PaintDurations {
    slots: [Duration; 2],
    frames: u32,
    window: u32,
}

impl PaintDurations {
    /// Creates an empty ring collapsing every `window` frames.
    #[must_use]
    pub const fn new(window: u32) -> Self {
        Self {
            slots: [Duration::ZERO; 2],
            frames: 0,
            window,
        }
    }

    /// Records the duration of one painted frame.
    pub fn record(&mut self, duration: Duration) {
        if duration > self.slots[1] {
            self.slots[1] = duration;
        }
        self.frames += 1;
        // A zero window collapses after every frame.
        if self.frames >= self.window {
            self.slots[0] = self.slots[1];
            self.slots[1] = Duration::ZERO;
            self.frames = 0;
        }
    }

    /// The worst paint duration of the previous and the current window.
    #[must_use]
    pub fn max(&self) -> Duration {
        self.slots[0].max(self.slots[1])
    }

    /// Forgets all recorded durations.
    pub fn reset(&mut self) {
        self.slots = [Duration::ZERO; 2];
        self.frames = 0;
    }
}

/// Computes the wait before the next frame after a buffer swap.
///
/// A `margin_divisor` of zero disables the vblank margin.
#[must_use]
pub fn next_frame_delay(refresh: Duration, margin_divisor: u32, max_paint: Duration) -> Duration {
    let margin = match margin_divisor {
        0 => Duration::ZERO,
        d => Duration(refresh.nanos() / u64::from(d)),
    };
    refresh.saturating_sub(margin).saturating_sub(max_paint)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn running_max_collapses_after_window() {
        let mut ring = PaintDurations::new(3);
        ring.record(Duration(5 * MS));
        ring.record(Duration(2 * MS));
        assert_eq!(ring.max(), Duration(5 * MS));

        // Third frame closes the window: slot 0 takes the running max.
        ring.record(Duration(MS));
        assert_eq!(ring.max(), Duration(5 * MS));

        // A full window of cheap frames forgets the spike.
        for _ in 0..3 {
            ring.record(Duration(MS));
        }
        assert_eq!(ring.max(), Duration(MS));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut ring = PaintDurations::new(100);
        ring.record(Duration(9 * MS));
        ring.reset();
        assert_eq!(ring.max(), Duration::ZERO);
    }

    #[test]
    fn delay_leaves_margin_and_paint_budget() {
        let refresh = Duration(16_666_666);
        // 16.67ms - 1.67ms - 4ms
        assert_eq!(
            next_frame_delay(refresh, 10, Duration(4 * MS)),
            Duration(16_666_666 - 1_666_666 - 4 * MS)
        );
    }

    #[test]
    fn delay_never_goes_negative() {
        let refresh = Duration(16_666_666);
        assert_eq!(
            next_frame_delay(refresh, 10, Duration(20 * MS)),
            Duration::ZERO
        );
        assert_eq!(next_frame_delay(refresh, 0, Duration::ZERO), refresh);
    }
}
