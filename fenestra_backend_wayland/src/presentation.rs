// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation feedback queueing.
//!
//! DRM page-flip and `wp_presentation` feedback arrive on the display
//! server's event loop, possibly several per frame and possibly after the
//! compositor stopped. They are queued here and handed to the compositor in
//! one batch per event-loop turn with [`PresentEventQueue::drain_into`].

use std::collections::VecDeque;

use fenestra_core::compositor::Compositor;
use fenestra_core::output::OutputId;
use fenestra_core::time::{Duration, HostTime};
use tracing::debug;

/// Identity of one submitted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(pub u64);

/// Presentation feedback for one submitted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentEvent {
    /// The frame reached the screen.
    Presented {
        /// Submitted frame.
        id: SubmissionId,
        /// When the frame was shown.
        presented_at: HostTime,
        /// Refresh interval observed by the display, if known.
        refresh: Option<Duration>,
        /// Output the frame was shown on, if known.
        output: Option<OutputId>,
    },
    /// The frame was superseded or dropped.
    Discarded {
        /// Submitted frame.
        id: SubmissionId,
    },
}

impl PresentEvent {
    /// Whether the frame reached the screen.
    #[must_use]
    pub const fn is_presented(&self) -> bool {
        matches!(self, Self::Presented { .. })
    }
}

/// Bounded FIFO of [`PresentEvent`]s.
///
/// When full, pushing drops the oldest event so the newest feedback survives
/// backpressure.
#[derive(Debug, Clone)]
pub struct PresentEventQueue {
    events: VecDeque<PresentEvent>,
    capacity: usize,
    dropped: u64,
}

impl PresentEventQueue {
    /// Capacity used by [`Default`].
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates a queue holding at most `capacity` events. Zero is promoted
    /// to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Enqueues one event.
    pub fn push(&mut self, event: PresentEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Pops the oldest event.
    pub fn pop(&mut self) -> Option<PresentEvent> {
        self.events.pop_front()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to overflow since creation.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Completes the compositor's pending swap with every queued event,
    /// oldest first. Returns the number of events delivered.
    pub fn drain_into(&mut self, compositor: &mut Compositor) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.pop() {
            debug!(?event, "presentation feedback");
            compositor.buffer_swap_complete(event.is_presented());
            delivered += 1;
        }
        delivered
    }
}

impl Default for PresentEventQueue {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}
