// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The X requests the backend needs.

use fenestra_core::backend::SafePoint;
use fenestra_core::output::Output;

/// An interned X atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Atom(pub u32);

/// X11 backend failures.
#[derive(Debug, thiserror::Error)]
pub enum X11Error {
    /// Another compositing manager owns the selection.
    #[error("selection {selection} is owned by another compositing manager")]
    SelectionOwned {
        /// Selection name.
        selection: String,
    },
    /// Redirecting the root window's subwindows failed.
    #[error("failed to redirect subwindows: {0}")]
    Redirect(String),
}

impl From<X11Error> for fenestra_core::Error {
    fn from(err: X11Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Root window atom requests used for support advertisement.
///
/// Split from [`XConnection`] so a Wayland display server can list support
/// names on its Xwayland root window without driving a full X backend.
pub trait RootAtoms {
    /// Interns `name`.
    fn intern_atom(&self, name: &str) -> Atom;

    /// Appends `atom` to the root window's supported-effects list.
    fn append_supported(&self, atom: Atom);

    /// Removes `atom` from the root window's supported-effects list.
    fn remove_supported(&self, atom: Atom);

    /// Flushes buffered requests.
    fn flush(&self) {}
}

/// Connection to an X server, as used by the backend.
///
/// Methods take `&self`; connections are shared between the backend and the
/// support advertiser.
pub trait XConnection: RootAtoms {
    /// Whether the Composite, Damage, and `XFixes` extensions are present.
    fn has_composite(&self) -> bool;

    /// Takes ownership of `selection`.
    fn claim_selection(&self, selection: &str) -> Result<(), X11Error>;

    /// Gives up ownership of `selection`.
    fn release_selection(&self, selection: &str);

    /// Redirects every subwindow of the root window.
    fn redirect_subwindows(&self) -> Result<(), X11Error>;

    /// Undoes [`redirect_subwindows`](Self::redirect_subwindows).
    fn unredirect_subwindows(&self);

    /// Outputs as reported by `RandR`.
    fn outputs(&self) -> Vec<Output>;

    /// Whether the composite overlay window is mapped and unobscured.
    fn overlay_visible(&self) -> bool {
        true
    }

    /// Writes a GPU safe-point marker.
    fn insert_safe_point(&self, point: SafePoint) {
        _ = point;
    }
}
