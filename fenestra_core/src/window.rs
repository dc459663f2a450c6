// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window abstraction consumed by the frame scheduler.
//!
//! Windows come from two structurally different window systems (native
//! Wayland surfaces and X11 clients). The scheduler only needs a handful of
//! questions answered about each of them, so both are hidden behind the
//! [`CompositeWindow`] trait and passed around as shared [`WindowRef`]
//! handles.

use core::fmt;
use std::rc::Rc;

use crate::region::Region;

/// Stable identity of a window for the lifetime of the process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WindowId(pub u64);

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({})", self.0)
    }
}

/// The per-window questions the compositor asks while building a frame.
pub trait CompositeWindow {
    /// Identity of this window.
    fn id(&self) -> WindowId;

    /// Whether the window has a committed buffer and may be painted.
    ///
    /// Windows that are not ready are skipped when building a frame.
    fn ready_for_painting(&self) -> bool;

    /// Whether the window has accumulated repaints of its own.
    fn has_pending_repaints(&self) -> bool;

    /// The area covered by this window's pending repaints, in global
    /// coordinates.
    ///
    /// Windows that track repaints only as a flag keep the default, in which
    /// case [`has_pending_repaints`](Self::has_pending_repaints) still forces
    /// a frame.
    fn pending_repaints(&self) -> Region {
        Region::new()
    }

    /// Drains pending damage from a native damage channel.
    ///
    /// Returns `true` if the window had damage, which means the buffer was
    /// produced by GPU work the compositor must fence before sampling it.
    /// Windows without such a channel keep the default.
    fn native_damage_reset_and_fetch(&self) -> bool {
        false
    }

    /// Whether an effect raised this window to the top of the paint order.
    fn elevated(&self) -> bool {
        false
    }

    /// Whether a window rule asks for compositing to be suspended while this
    /// window exists.
    fn is_blocking_compositing(&self) -> bool {
        false
    }

    /// Whether this is a closed window kept alive only for painting (e.g. a
    /// fade-out) that nothing references anymore.
    fn is_releasable_remnant(&self) -> bool {
        false
    }
}

/// Shared handle to a window.
pub type WindowRef = Rc<dyn CompositeWindow>;

/// Moves elevated windows to the top of the paint order, keeping the
/// relative order of both the elevated and the remaining windows.
pub fn raise_elevated(windows: &mut Vec<WindowRef>) {
    if !windows.iter().any(|w| w.elevated()) {
        return;
    }
    let (elevated, mut rest): (Vec<_>, Vec<_>) =
        windows.drain(..).partition(|w| w.elevated());
    rest.extend(elevated);
    *windows = rest;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Win {
        id: u64,
        elevated: bool,
    }

    impl CompositeWindow for Win {
        fn id(&self) -> WindowId {
            WindowId(self.id)
        }
        fn ready_for_painting(&self) -> bool {
            true
        }
        fn has_pending_repaints(&self) -> bool {
            false
        }
        fn elevated(&self) -> bool {
            self.elevated
        }
    }

    fn win(id: u64, elevated: bool) -> WindowRef {
        Rc::new(Win { id, elevated })
    }

    fn ids(windows: &[WindowRef]) -> Vec<u64> {
        windows.iter().map(|w| w.id().0).collect()
    }

    #[test]
    fn elevated_windows_move_to_top_in_order() {
        let mut windows = vec![
            win(1, false),
            win(2, true),
            win(3, false),
            win(4, true),
            win(5, false),
        ];
        raise_elevated(&mut windows);
        assert_eq!(ids(&windows), [1, 3, 5, 2, 4]);
    }

    #[test]
    fn order_is_untouched_without_elevated_windows() {
        let mut windows = vec![win(3, false), win(1, false), win(2, false)];
        raise_elevated(&mut windows);
        assert_eq!(ids(&windows), [3, 1, 2]);
    }
}
