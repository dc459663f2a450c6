// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in microseconds.

use std::io::Write;

use fenestra_core::time::{Duration, HostTime};
use fenestra_core::trace::{
    FramePreparedEvent, FrameSkippedEvent, PaintEvent, SkipReason, StateChangeEvent,
    SwapBeginEvent, SwapCompleteEvent, TimerArmedEvent, TraceSink,
};

use crate::nanos_to_us;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn us(t: HostTime) -> f64 {
    nanos_to_us(t.nanos())
}

fn ms(d: Duration) -> f64 {
    d.nanos() as f64 / 1_000_000.0
}

fn skip_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::OverlayHidden => "overlay-hidden",
        SkipReason::SwapPending => "swap-pending",
        SkipReason::NoDamage => "no-damage",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_timer_armed(&mut self, e: &TimerArmedEvent) {
        let _ = writeln!(
            self.writer,
            "[timer] at {:.1}µs delay={:.3}ms wait={:.3}ms",
            us(e.now),
            ms(e.delay),
            ms(e.wait),
        );
    }

    fn on_frame_prepared(&mut self, e: &FramePreparedEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] msc={} at {:.1}µs windows={} fenced={} rects={}",
            e.msc,
            us(e.now),
            e.windows,
            e.damaged,
            e.rects,
        );
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] at {:.1}µs {}",
            us(e.now),
            skip_name(e.reason),
        );
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        let _ = writeln!(
            self.writer,
            "[paint] msc={} at {:.1}µs took={:.3}ms",
            e.msc,
            us(e.start),
            ms(e.duration),
        );
    }

    fn on_swap_begin(&mut self, e: &SwapBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[swap:begin] msc={} at {:.1}µs",
            e.msc,
            us(e.now),
        );
    }

    fn on_swap_complete(&mut self, e: &SwapCompleteEvent) {
        let outcome = if e.presented { "presented" } else { "discarded" };
        let _ = writeln!(
            self.writer,
            "[swap:end] msc={} at {:.1}µs {} next-delay={:.3}ms",
            e.msc,
            us(e.now),
            outcome,
            ms(e.delay),
        );
    }

    fn on_state_change(&mut self, e: &StateChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[state] {:?} -> {:?} suspended={:?}",
            e.from, e.to, e.suspended,
        );
    }
}
