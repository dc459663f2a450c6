// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayland backend for fenestra.
//!
//! - [`WaylandBackend`]: the [`Backend`](fenestra_core::backend::Backend)
//!   of a compositor that is itself the Wayland display server
//! - [`PresentEventQueue`]: presentation feedback feeding
//!   [`Compositor::buffer_swap_complete`](fenestra_core::compositor::Compositor::buffer_swap_complete)
//! - [`GlobalAdvertiser`]: manager globals for effect channels
//! - [`SupportLedger`]: support bookkeeping when no Xwayland root window is
//!   available

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod backend;
mod global;
mod presentation;

pub use backend::{OutputLayout, WaylandBackend};
pub use global::{GlobalAdvertiser, GlobalRegistry, SupportLedger, manager_interface};
pub use presentation::{PresentEvent, PresentEventQueue, SubmissionId};
