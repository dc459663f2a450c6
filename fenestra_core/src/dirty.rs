// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural dirty-tracking channels.
//!
//! Structural changes (stacking order, current desktop, a successful start)
//! invalidate whole outputs rather than individual windows. They are recorded
//! with [`understory_dirty`] keyed by [`OutputId`](crate::output::OutputId)
//! and drained into the repaint region when the next frame is built, so a
//! burst of structural events costs one full repaint per output.
//!
//! Removing an output drops its key, which keeps stale marks from turning
//! into damage on an output that no longer exists.

use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use crate::output::OutputId;

/// Output content must be repainted in full.
pub const FULL_REPAINT: Channel = Channel::new(0);

/// Per-output dirty state.
pub struct OutputDirty {
    tracker: DirtyTracker<u32>,
}

impl core::fmt::Debug for OutputDirty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OutputDirty").finish_non_exhaustive()
    }
}

impl Default for OutputDirty {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDirty {
    /// Creates a tracker with no marks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    /// Marks `output` on `channel`.
    pub fn mark(&mut self, output: OutputId, channel: Channel) {
        self.tracker.mark(output.0, channel);
    }

    /// Drains every output marked on `channel`, in deterministic order.
    pub fn drain(&mut self, channel: Channel) -> Vec<OutputId> {
        self.tracker
            .drain(channel)
            .deterministic()
            .run()
            .map(OutputId)
            .collect()
    }

    /// Forgets `output` on every channel.
    pub fn remove(&mut self, output: OutputId) {
        self.tracker.remove_key(output.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_coalesce_per_output() {
        let mut dirty = OutputDirty::new();
        dirty.mark(OutputId(1), FULL_REPAINT);
        dirty.mark(OutputId(1), FULL_REPAINT);
        dirty.mark(OutputId(0), FULL_REPAINT);

        let mut drained = dirty.drain(FULL_REPAINT);
        drained.sort();
        assert_eq!(drained, [OutputId(0), OutputId(1)]);
        assert!(dirty.drain(FULL_REPAINT).is_empty(), "drain consumes marks");
    }

    #[test]
    fn removed_output_is_not_drained() {
        let mut dirty = OutputDirty::new();
        dirty.mark(OutputId(3), FULL_REPAINT);
        dirty.remove(OutputId(3));
        assert!(dirty.drain(FULL_REPAINT).is_empty());
    }
}
