// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X11 backend for fenestra.
//!
//! - Ownership of the `_NET_WM_CM_S<screen>` compositing selection
//! - Subwindow redirection through the Composite extension
//! - Overlay window visibility and GPU safe points
//! - Support advertisement as atoms on the root window
//!
//! The wire protocol is reached through [`XConnection`], which the host
//! implements on top of its X client library.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod backend;
mod connection;
mod support;

pub use backend::X11Backend;
pub use connection::{Atom, RootAtoms, X11Error, XConnection};
pub use support::AtomAdvertiser;
