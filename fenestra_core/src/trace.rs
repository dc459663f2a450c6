// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Compositor`](crate::compositor::Compositor) calls at each stage of the
//! frame loop. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. Without a sink every method is a
//! single `Option` branch.
//!
//! Lifecycle decisions (suspend reasons, scene fallbacks) are logged through
//! `tracing` instead; the sink only sees the hot frame-loop events.

use crate::suspend::{CompositorState, SuspendReason};
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a frame build produced no frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The overlay window is hidden; nothing on screen would change.
    OverlayHidden,
    /// A buffer swap is still in flight.
    SwapPending,
    /// No repaint region and no window with pending repaints.
    NoDamage,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the composite timer is armed.
#[derive(Clone, Copy, Debug)]
pub struct TimerArmedEvent {
    /// Host time of arming.
    pub now: HostTime,
    /// The computed delay before clamping.
    pub delay: Duration,
    /// The wait actually armed (clamped, whole milliseconds).
    pub wait: Duration,
}

/// Emitted after a frame was built.
#[derive(Clone, Copy, Debug)]
pub struct FramePreparedEvent {
    /// Media stream counter of the frame about to be painted.
    pub msc: u64,
    /// Host time of the build.
    pub now: HostTime,
    /// Windows in the paint list.
    pub windows: usize,
    /// Windows whose native damage required a GPU fence.
    pub damaged: usize,
    /// Rectangles in the repaint region.
    pub rects: usize,
}

/// Emitted when a frame build was skipped.
#[derive(Clone, Copy, Debug)]
pub struct FrameSkippedEvent {
    /// Host time of the attempt.
    pub now: HostTime,
    /// Why no frame was built.
    pub reason: SkipReason,
}

/// Emitted after the scene painted a frame.
#[derive(Clone, Copy, Debug)]
pub struct PaintEvent {
    /// Media stream counter of the painted frame.
    pub msc: u64,
    /// Host time when painting started.
    pub start: HostTime,
    /// Paint duration reported by the scene.
    pub duration: Duration,
}

/// Emitted when a buffer swap is requested.
#[derive(Clone, Copy, Debug)]
pub struct SwapBeginEvent {
    /// Media stream counter of the swapped frame.
    pub msc: u64,
    /// Host time of the request.
    pub now: HostTime,
}

/// Emitted when a buffer swap completed.
#[derive(Clone, Copy, Debug)]
pub struct SwapCompleteEvent {
    /// Media stream counter of the swapped frame.
    pub msc: u64,
    /// Host time of completion.
    pub now: HostTime,
    /// Whether the frame reached the screen.
    pub presented: bool,
    /// Delay computed for the next frame.
    pub delay: Duration,
}

/// Emitted on every lifecycle state transition.
#[derive(Clone, Copy, Debug)]
pub struct StateChangeEvent {
    /// Previous state.
    pub from: CompositorState,
    /// New state.
    pub to: CompositorState,
    /// Suspend reasons at the time of the transition.
    pub suspended: SuspendReason,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the composite timer is armed.
    fn on_timer_armed(&mut self, e: &TimerArmedEvent) {
        _ = e;
    }

    /// Called after a frame was built.
    fn on_frame_prepared(&mut self, e: &FramePreparedEvent) {
        _ = e;
    }

    /// Called when a frame build was skipped.
    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        _ = e;
    }

    /// Called after painting.
    fn on_paint(&mut self, e: &PaintEvent) {
        _ = e;
    }

    /// Called when a buffer swap starts.
    fn on_swap_begin(&mut self, e: &SwapBeginEvent) {
        _ = e;
    }

    /// Called when a buffer swap completes.
    fn on_swap_complete(&mut self, e: &SwapCompleteEvent) {
        _ = e;
    }

    /// Called on lifecycle state transitions.
    fn on_state_change(&mut self, e: &StateChangeEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional boxed [`TraceSink`].
#[derive(Default)]
pub struct Tracer {
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Creates a tracer that discards all events.
    #[must_use]
    pub fn none() -> Self {
        Self { sink: None }
    }

    /// Replaces the sink, returning the previous one.
    pub fn replace(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        core::mem::replace(&mut self.sink, sink)
    }

    /// Emits a [`TimerArmedEvent`].
    #[inline]
    pub fn timer_armed(&mut self, e: &TimerArmedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_timer_armed(e);
        }
    }

    /// Emits a [`FramePreparedEvent`].
    #[inline]
    pub fn frame_prepared(&mut self, e: &FramePreparedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_frame_prepared(e);
        }
    }

    /// Emits a [`FrameSkippedEvent`].
    #[inline]
    pub fn frame_skipped(&mut self, e: &FrameSkippedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_frame_skipped(e);
        }
    }

    /// Emits a [`PaintEvent`].
    #[inline]
    pub fn paint(&mut self, e: &PaintEvent) {
        if let Some(s) = &mut self.sink {
            s.on_paint(e);
        }
    }

    /// Emits a [`SwapBeginEvent`].
    #[inline]
    pub fn swap_begin(&mut self, e: &SwapBeginEvent) {
        if let Some(s) = &mut self.sink {
            s.on_swap_begin(e);
        }
    }

    /// Emits a [`SwapCompleteEvent`].
    #[inline]
    pub fn swap_complete(&mut self, e: &SwapCompleteEvent) {
        if let Some(s) = &mut self.sink {
            s.on_swap_complete(e);
        }
    }

    /// Emits a [`StateChangeEvent`].
    #[inline]
    pub fn state_change(&mut self, e: &StateChangeEvent) {
        if let Some(s) = &mut self.sink {
            s.on_state_change(e);
        }
    }
}
