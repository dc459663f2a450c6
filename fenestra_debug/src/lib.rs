// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and Chrome trace export for fenestra frame-loop
//! diagnostics.
//!
//! This crate provides [`TraceSink`](fenestra_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`chrome::ChromeTraceSink`] — collects events and writes Chrome Trace
//!   Event Format JSON.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod chrome;
pub mod pretty;

fn nanos_to_us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}
