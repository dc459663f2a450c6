// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling and damage-driven repaint for a display-server
//! compositor.
//!
//! `fenestra_core` owns the part of the compositor that decides *when* to
//! paint and *what* to repaint. Window systems, scenes, and the window
//! manager are collaborators reached through narrow traits, so the scheduler
//! runs unchanged on top of X11 and Wayland and under test with fakes.
//!
//! # Architecture
//!
//! ```text
//!   Space events / repaint requests
//!       │
//!       ▼
//!   Compositor::add_repaint ──► composite timer ──► Compositor::perform_compositing
//!                                                        │
//!                 ┌──────────────────────────────────────┘
//!                 ▼
//!   prepare_composition ──► Frame ──► Scene::paint ──► paint duration
//!                                                        │
//!                 ┌──────────────────────────────────────┘
//!                 ▼
//!   buffer_swap_complete ──► next-frame delay ──► composite timer
//! ```
//!
//! **[`compositor`]** — The [`Compositor`](compositor::Compositor) platform:
//! lifecycle state machine, suspend reasons, composite timer, repaint
//! aggregation, and buffer-swap bookkeeping.
//!
//! **[`backend`]** — The [`Backend`](backend::Backend),
//! [`Scene`](backend::Scene), and [`Space`](backend::Space) contracts that
//! window-system crates implement.
//!
//! **[`window`]** — The [`CompositeWindow`](window::CompositeWindow) trait
//! hiding backend-specific window representations.
//!
//! **[`pacing`]** — Paint-duration ring and next-frame delay computation.
//!
//! **[`dirty`]** — Structural dirty tracking per output via
//! `understory_dirty`.
//!
//! **[`region`]**, **[`output`]**, **[`time`]**, **[`timer`]** — Value types
//! the scheduler is built from.
//!
//! **[`clock`]** — [`FrameClock`](clock::FrameClock), the host clock
//! backends timestamp frames with.
//!
//! **[`config`]** — [`CompositorConfig`](config::CompositorConfig) and its
//! environment overlay.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation.
//!
//! **[`error`]** — Recoverable startup failures.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod dirty;
pub mod error;
pub mod output;
pub mod pacing;
pub mod region;
pub mod suspend;
pub mod time;
pub mod timer;
pub mod trace;
pub mod window;

pub use error::{Error, Result};
