// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor lifecycle state and the suspend-reason bitset.

use bitflags::bitflags;

bitflags! {
    /// Independent reasons for compositing to be suspended.
    ///
    /// Compositing is active only while the set is empty. Each holder sets and
    /// clears its own bit; resuming with one reason never clears another.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SuspendReason: u32 {
        /// The user toggled compositing off.
        const USER = 1 << 0;
        /// A window rule blocks compositing while a matching window exists.
        const RULE = 1 << 1;
        /// A script requested suspension.
        const SCRIPT = 1 << 2;
        /// Every reason.
        const ALL = Self::USER.bits() | Self::RULE.bits() | Self::SCRIPT.bits();
    }
}

/// Lifecycle state of the compositor platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositorState {
    /// Not compositing. The initial state and the fallback after failures.
    #[default]
    Off,
    /// Inside [`start`](crate::compositor::Compositor::start).
    Starting,
    /// Compositing.
    On,
    /// Tearing down the scene.
    Stopping,
}

impl CompositorState {
    /// Returns `true` while frames may be produced.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}
