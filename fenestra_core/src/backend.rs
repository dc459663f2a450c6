// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend, scene, and space contracts.
//!
//! Fenestra splits window-system specific work into *backend* crates. The
//! [`Compositor`](crate::compositor::Compositor) is written against three
//! narrow interfaces and receives concrete implementations by injection:
//!
//! - **[`Backend`]** — Owns the connection to the window system: the
//!   "provides compositing" selection, window redirection, the output list,
//!   the monotonic clock, and the set of [`SceneFactory`] values it can
//!   render with.
//!
//! - **[`Scene`]** — Paints one frame given a repaint region and a window
//!   list, and reports how long that took. Scenes are recreated whenever
//!   compositing (re)initializes.
//!
//! - **[`Space`]** — The window manager's view of the world: stacking order
//!   and the remnants of closed windows.
//!
//! # Crate boundaries
//!
//! `fenestra_core` owns scheduling and these contracts. Backend crates depend
//! on `fenestra_core` and provide window-system glue. The host depends on
//! both, owns the event loop, and forwards events:
//!
//! ```rust,ignore
//! let mut compositor = Compositor::new(Box::new(backend), config);
//! compositor.start(space);
//! loop {
//!     let deadline = compositor.next_deadline();
//!     match wait_for_event(deadline) {
//!         Event::Damage(region) => compositor.add_repaint(&region),
//!         Event::Stacking => compositor.handle_space_event(SpaceEvent::StackingChanged),
//!         Event::SwapDone(presented) => compositor.buffer_swap_complete(presented),
//!         Event::Timeout => compositor.dispatch_timers(backend_now()),
//!     }
//! }
//! ```

use std::rc::Rc;

use crate::config::CompositorConfig;
use crate::error::Result;
use crate::output::{Output, OutputId};
use crate::region::Region;
use crate::time::{Duration, HostTime};
use crate::window::WindowRef;

/// Frame boundaries at which the backend may insert a GPU safe point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SafePoint {
    /// Before a guarded frame is painted.
    PreFrame,
    /// After a guarded frame was painted.
    PostFrame,
    /// After the last guarded frame was painted.
    PostLastGuardedFrame,
}

/// Builds a scene. Factories are tried in order until one succeeds.
pub type SceneFactory = Box<dyn Fn(&CompositorConfig) -> Result<Box<dyn Scene>>>;

/// A scene factory a backend keeps and hands out on every start.
pub type SharedSceneFactory = Rc<dyn Fn(&CompositorConfig) -> Result<Box<dyn Scene>>>;

/// Wraps kept factories for [`Backend::scene_factories`], preserving order.
#[must_use]
pub fn share_factories(factories: &[SharedSceneFactory]) -> Vec<SceneFactory> {
    factories
        .iter()
        .map(|factory| {
            let factory = Rc::clone(factory);
            Box::new(move |config: &CompositorConfig| factory(config)) as SceneFactory
        })
        .collect()
}

/// Paints frames.
pub trait Scene {
    /// Human-readable scene name for logs.
    fn name(&self) -> &str;

    /// Paints `windows` (bottom to top) clipped to `repaints` and returns the
    /// time spent painting.
    fn paint(&mut self, repaints: &Region, windows: &[WindowRef], now: HostTime) -> Duration;

    /// Called when a frame build found nothing to paint.
    fn idle(&mut self) {}

    /// Inserts a GPU fence covering buffers produced by client GPU work.
    fn trigger_fence(&mut self) {}

    /// Whether presenting a frame produces a swap-complete notification.
    ///
    /// Scenes without one are paced by a refresh-length timer instead.
    fn has_swap_event(&self) -> bool {
        true
    }

    /// Whether the scene renders through OpenGL, which enables GPU safe
    /// points.
    fn is_opengl(&self) -> bool {
        false
    }
}

/// Window-system integration injected into the compositor.
pub trait Backend {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Whether compositing can run at all right now (e.g. required
    /// extensions are present).
    fn compositing_possible(&self) -> bool {
        true
    }

    /// Claims the compositing selection and redirects windows.
    fn prepare(&mut self) -> Result<()>;

    /// Creates backend-side rendering resources.
    fn create_renderer(&mut self) -> Result<()> {
        Ok(())
    }

    /// Scene factories in order of preference.
    fn scene_factories(&self) -> Vec<SceneFactory>;

    /// Current outputs.
    fn outputs(&self) -> Vec<Output>;

    /// Reads the monotonic clock.
    fn now(&self) -> HostTime;

    /// Stops redirecting windows and drops backend rendering resources.
    ///
    /// Keeps the compositing selection; see
    /// [`release_selection`](Self::release_selection). Must not fail.
    fn finish_compositing(&mut self);

    /// Gives up the compositing selection.
    fn release_selection(&mut self) {}

    /// Best-effort undo of everything [`prepare`](Self::prepare) and
    /// [`create_renderer`](Self::create_renderer) did.
    fn teardown(&mut self) {
        self.finish_compositing();
        self.release_selection();
    }

    /// Whether the overlay window the compositor paints into is visible.
    fn overlay_visible(&self) -> bool {
        true
    }

    /// Inserts a GPU safe point.
    fn create_safe_point(&mut self, point: SafePoint) {
        _ = point;
    }

    /// Flushes pending requests to the window system.
    fn flush(&mut self) {}
}

/// Structural changes of the window manager's space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpaceEvent {
    /// The stacking order changed.
    StackingChanged,
    /// The current virtual desktop changed.
    DesktopChanged,
    /// An output was unplugged.
    OutputRemoved(OutputId),
}

/// The window manager's view of windows.
pub trait Space {
    /// Windows in stacking order, bottom to top.
    fn stacking_order(&self) -> Vec<WindowRef>;

    /// Every managed window. Defaults to the stacking order.
    fn windows(&self) -> Vec<WindowRef> {
        self.stacking_order()
    }

    /// Takes back a closed window the compositor no longer paints.
    fn release_remnant(&self, window: &WindowRef) {
        _ = window;
    }
}

/// Observes frame boundaries.
///
/// Registered with
/// [`Compositor::add_frame_observer`](crate::compositor::Compositor::add_frame_observer).
pub trait FrameObserver {
    /// Called after frame `msc` was painted.
    fn frame_finished(&self, msc: u64);

    /// Called when compositing stops.
    fn compositing_stopped(&self) {}
}
