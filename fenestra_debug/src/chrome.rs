// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format export.
//!
//! [`ChromeTraceSink`] turns frame-loop events into [Chrome Trace Event
//! Format][spec] objects as they arrive. The sink is cheap to clone and all
//! clones share one buffer, so the host can hand one clone to the compositor
//! and keep another to call [`export`](ChromeTraceSink::export) on.
//!
//! Paints become complete (`X`) events, swaps become begin/end pairs on a
//! separate track, everything else is an instant event.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use serde_json::{Value, json};

use fenestra_core::trace::{
    FramePreparedEvent, FrameSkippedEvent, PaintEvent, StateChangeEvent, SwapBeginEvent,
    SwapCompleteEvent, TimerArmedEvent, TraceSink,
};

use crate::nanos_to_us;

const TID_FRAMES: u32 = 0;
const TID_SWAPS: u32 = 1;

/// Collects trace events for Chrome Trace Event Format export.
#[derive(Clone, Default)]
pub struct ChromeTraceSink {
    events: Rc<RefCell<Vec<Value>>>,
}

impl std::fmt::Debug for ChromeTraceSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeTraceSink")
            .field("events", &self.events.borrow().len())
            .finish()
    }
}

impl ChromeTraceSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns `true` if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Writes every collected event as one JSON array, loadable into
    /// `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
    pub fn export(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &*self.events.borrow())?;
        Ok(())
    }

    fn push(&self, event: Value) {
        self.events.borrow_mut().push(event);
    }

    fn instant(&self, name: &str, cat: &str, ts_nanos: u64, args: Value) {
        self.push(json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": nanos_to_us(ts_nanos),
            "pid": 0,
            "tid": TID_FRAMES,
            "s": "t",
            "args": args,
        }));
    }
}

impl TraceSink for ChromeTraceSink {
    fn on_timer_armed(&mut self, e: &TimerArmedEvent) {
        self.instant(
            "TimerArmed",
            "Scheduler",
            e.now.nanos(),
            json!({
                "delay_us": nanos_to_us(e.delay.nanos()),
                "wait_us": nanos_to_us(e.wait.nanos()),
            }),
        );
    }

    fn on_frame_prepared(&mut self, e: &FramePreparedEvent) {
        self.instant(
            "FramePrepared",
            "Frame",
            e.now.nanos(),
            json!({
                "msc": e.msc,
                "windows": e.windows,
                "fenced": e.damaged,
                "rects": e.rects,
            }),
        );
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        self.instant(
            "FrameSkipped",
            "Frame",
            e.now.nanos(),
            json!({ "reason": format!("{:?}", e.reason) }),
        );
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        self.push(json!({
            "ph": "X",
            "name": "Paint",
            "cat": "Frame",
            "ts": nanos_to_us(e.start.nanos()),
            "dur": nanos_to_us(e.duration.nanos()),
            "pid": 0,
            "tid": TID_FRAMES,
            "args": { "msc": e.msc },
        }));
    }

    fn on_swap_begin(&mut self, e: &SwapBeginEvent) {
        self.push(json!({
            "ph": "B",
            "name": "Swap",
            "cat": "Swap",
            "ts": nanos_to_us(e.now.nanos()),
            "pid": 0,
            "tid": TID_SWAPS,
            "args": { "msc": e.msc },
        }));
    }

    fn on_swap_complete(&mut self, e: &SwapCompleteEvent) {
        self.push(json!({
            "ph": "E",
            "name": "Swap",
            "cat": "Swap",
            "ts": nanos_to_us(e.now.nanos()),
            "pid": 0,
            "tid": TID_SWAPS,
            "args": {
                "msc": e.msc,
                "presented": e.presented,
                "next_delay_us": nanos_to_us(e.delay.nanos()),
            },
        }));
    }

    fn on_state_change(&mut self, e: &StateChangeEvent) {
        self.push(json!({
            "ph": "i",
            "name": format!("{:?}", e.to),
            "cat": "Lifecycle",
            "ts": 0,
            "pid": 0,
            "tid": TID_FRAMES,
            "s": "g",
            "args": {
                "from": format!("{:?}", e.from),
                "suspended": e.suspended.bits(),
            },
        }));
    }
}
